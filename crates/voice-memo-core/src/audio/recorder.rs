use crate::{
    AudioError, CoreResult,
    artifact::{Artifact, ArtifactStore, PendingArtifact},
    audio::{AudioSession, CaptureDevice, RecordingFormat, SessionHolder, SessionLease},
};

use std::{panic::Location, path::Path, time::Duration};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument};

/// One recording cycle's capture device and artifact.
///
/// Construction configures the audio session and prepares the device, so a
/// recorder that exists is ready to `record()`. A recorder lives for one
/// cycle: after save-and-reset the controller builds a new one. Recording
/// again within a cycle overwrites the same artifact.
pub struct Recorder {
    device: Box<dyn CaptureDevice>,
    session: AudioSession,
    pending: PendingArtifact,
    format: RecordingFormat,
    lease: Option<SessionLease>,
    finished: Option<Artifact>,
}

impl Recorder {
    /// Start the audio session and prepare `device` for a new artifact.
    ///
    /// # Errors
    ///
    /// - [`AudioError::SessionActivationFailed`] if the session category is refused.
    /// - [`AudioError::StorageUnavailable`] if no artifact path can be allocated.
    /// - [`AudioError::CaptureStartFailed`] if the device cannot be prepared.
    #[track_caller]
    #[instrument(skip(device, session, store))]
    pub fn new(
        mut device: Box<dyn CaptureDevice>,
        session: AudioSession,
        store: &mut ArtifactStore,
        format: RecordingFormat,
    ) -> CoreResult<Self> {
        let location = Location::caller();

        session.configure()?;

        let pending = store.allocate(format.codec)?;

        device
            .prepare(&pending.path, &format)
            .map_err(|e| AudioError::CaptureStartFailed {
                source: Box::new(e),
                location: ErrorLocation::from(location),
            })?;

        info!(artifact_id = %pending.id, "Recorder prepared");

        Ok(Self {
            device,
            session,
            pending,
            format,
            lease: None,
            finished: None,
        })
    }

    /// Acquire the audio session and start capture.
    ///
    /// On failure the session is released again and nothing changes.
    #[track_caller]
    #[instrument(skip(self), fields(artifact_id = %self.pending.id))]
    pub fn record(&mut self) -> CoreResult<()> {
        let location = Location::caller();

        let lease = self
            .session
            .acquire(SessionHolder::Recorder)
            .map_err(|e| AudioError::CaptureStartFailed {
                source: Box::new(e),
                location: ErrorLocation::from(location),
            })?;

        // `lease` drops on error, releasing the session.
        self.device
            .record()
            .map_err(|e| AudioError::CaptureStartFailed {
                source: Box::new(e),
                location: ErrorLocation::from(location),
            })?;

        self.lease = Some(lease);
        self.finished = None;

        info!("Capture started");

        Ok(())
    }

    /// Stop capture, release the audio session and return the artifact.
    ///
    /// # Errors
    ///
    /// Returns [`AudioError::CaptureStopFailed`] if the device refuses to
    /// stop; capture and the session lease are then left untouched.
    #[track_caller]
    #[instrument(skip(self), fields(artifact_id = %self.pending.id))]
    pub fn stop(&mut self) -> CoreResult<Artifact> {
        let location = Location::caller();

        let duration = self.device.current_time();

        self.device
            .stop()
            .map_err(|e| AudioError::CaptureStopFailed {
                source: Box::new(e),
                location: ErrorLocation::from(location),
            })?;

        self.lease = None;

        let artifact = Artifact {
            id: self.pending.id.clone(),
            path: self.pending.path.clone(),
            duration,
        };
        self.finished = Some(artifact.clone());

        info!(duration_ms = duration.as_millis(), "Capture stopped");

        Ok(artifact)
    }

    /// Length of the running (or last) capture.
    pub fn current_time(&self) -> Duration {
        self.device.current_time()
    }

    /// Whether capture is running.
    pub fn is_recording(&self) -> bool {
        self.device.is_recording()
    }

    /// Artifact produced by the last successful `stop()`.
    pub fn artifact(&self) -> Option<&Artifact> {
        self.finished.as_ref()
    }

    /// Name reserved for this cycle's recording.
    pub fn artifact_id(&self) -> &str {
        &self.pending.id
    }

    /// Path the device writes to.
    pub fn artifact_path(&self) -> &Path {
        &self.pending.path
    }

    /// Encoding parameters the device was prepared with.
    pub fn format(&self) -> RecordingFormat {
        self.format
    }
}

impl Drop for Recorder {
    fn drop(&mut self) {
        if self.device.is_recording() {
            debug!(artifact_id = %self.pending.id, "Recorder dropped while capturing");
            let _ = self.device.stop();
        }
    }
}
