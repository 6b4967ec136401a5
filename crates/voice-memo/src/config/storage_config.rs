use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where recordings are written and where saved ones are delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory the recorder writes artifacts into.
    pub recordings_dir: PathBuf,
    /// Upload outbox, e.g. a folder synced by a cloud storage client.
    pub outbox_dir: PathBuf,
}
