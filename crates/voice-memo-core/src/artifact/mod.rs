mod store;

pub use store::{ARTIFACT_TIME_FORMAT, ArtifactStore};

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// Name and location reserved for a recording before it exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingArtifact {
    /// File name, e.g. `14:03:59.m4a`.
    pub id: String,
    /// Full path inside the recordings directory.
    pub path: PathBuf,
}

/// A finished recording on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// File name, e.g. `14:03:59.m4a`.
    pub id: String,
    /// Full path inside the recordings directory.
    pub path: PathBuf,
    /// Recorded length, known once capture stops.
    pub duration: Duration,
}

impl Artifact {
    /// Path as a borrowed [`Path`].
    pub fn path(&self) -> &Path {
        &self.path
    }
}
