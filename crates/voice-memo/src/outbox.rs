//! Upload client that delivers saved recordings to an outbox directory.
//!
//! The outbox is meant to be a folder picked up by a cloud storage client.
//! Files are copied under a temporary name, synced, then renamed, so a
//! partially copied recording is never visible under its final name.

use std::{
    fs,
    panic::Location,
    path::{Path, PathBuf},
};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument};
use voice_memo_core::{AudioError, CoreResult, UploadClient};

/// Artifact waiting for `save()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedUpload {
    /// Artifact name, used as the file name in the outbox.
    pub artifact_id: String,
    /// Where the recorder wrote it.
    pub local_path: PathBuf,
}

/// [`UploadClient`] writing into a local outbox directory.
pub struct OutboxUploader {
    outbox_dir: PathBuf,
    staged: Option<StagedUpload>,
}

impl OutboxUploader {
    /// Deliver into `outbox_dir`, created on first save.
    pub fn new<P: Into<PathBuf>>(outbox_dir: P) -> Self {
        Self {
            outbox_dir: outbox_dir.into(),
            staged: None,
        }
    }

    /// Artifact that the next `save()` will deliver.
    pub fn staged(&self) -> Option<&StagedUpload> {
        self.staged.as_ref()
    }

    #[track_caller]
    fn upload_error(reason: String) -> AudioError {
        AudioError::UploadFailed {
            reason,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    fn deliver(&self, staged: &StagedUpload) -> CoreResult<PathBuf> {
        fs::create_dir_all(&self.outbox_dir).map_err(|e| {
            Self::upload_error(format!("Failed to create {:?}: {}", self.outbox_dir, e))
        })?;

        let final_path = self.outbox_dir.join(&staged.artifact_id);
        let temp_path = self
            .outbox_dir
            .join(format!(".{}.tmp", staged.artifact_id));

        fs::copy(&staged.local_path, &temp_path).map_err(|e| {
            Self::upload_error(format!("Failed to copy {:?}: {}", staged.local_path, e))
        })?;

        fs::File::open(&temp_path)
            .and_then(|file| file.sync_all())
            .map_err(|e| Self::upload_error(format!("Failed to sync {:?}: {}", temp_path, e)))?;

        fs::rename(&temp_path, &final_path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            Self::upload_error(format!("Failed to rename into {:?}: {}", final_path, e))
        })?;

        Ok(final_path)
    }
}

impl UploadClient for OutboxUploader {
    #[instrument(skip(self))]
    fn stage(&mut self, artifact_id: &str, local_path: &Path) {
        if let Some(previous) = self.staged() {
            debug!(replaced = %previous.artifact_id, "Staged upload replaced");
        }
        self.staged = Some(StagedUpload {
            artifact_id: artifact_id.to_string(),
            local_path: local_path.to_path_buf(),
        });
    }

    #[track_caller]
    #[instrument(skip(self), fields(outbox_dir = ?self.outbox_dir))]
    fn save(&mut self) -> CoreResult<()> {
        let Some(staged) = self.staged.clone() else {
            return Err(Self::upload_error("Nothing staged for upload".to_string()));
        };

        let delivered = self.deliver(&staged)?;
        self.staged = None;

        info!(artifact_id = %staged.artifact_id, path = ?delivered, "Recording delivered to outbox");

        Ok(())
    }
}
