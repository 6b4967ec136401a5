use error_location::ErrorLocation;
use thiserror::Error;

/// Recording session errors with source location tracking.
#[derive(Error, Debug)]
pub enum AudioError {
    /// Low-level audio device operation failed.
    #[error("Audio device error: {reason} {location}")]
    DeviceError {
        /// Description of the device error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The platform refused to configure or activate the audio session.
    #[error("Audio session activation failed: {source} {location}")]
    SessionActivationFailed {
        /// Underlying device error.
        #[source]
        source: Box<AudioError>,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Capture could not be prepared or started.
    #[error("Capture start failed: {source} {location}")]
    CaptureStartFailed {
        /// Underlying device error.
        #[source]
        source: Box<AudioError>,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Capture could not be stopped.
    #[error("Capture stop failed: {source} {location}")]
    CaptureStopFailed {
        /// Underlying device error.
        #[source]
        source: Box<AudioError>,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Playback could not be opened or started.
    #[error("Playback failed: {source} {location}")]
    PlaybackFailed {
        /// Underlying device error.
        #[source]
        source: Box<AudioError>,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Captured audio could not be converted to the recording sample rate.
    #[error("Resampling error: {reason} {location}")]
    ResamplingError {
        /// Description of the resampling failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The recordings directory could not be resolved or created.
    #[error("Recording storage unavailable: {reason} {location}")]
    StorageUnavailable {
        /// Description of the storage failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The upload client failed to commit the staged recording.
    #[error("Upload failed: {reason} {location}")]
    UploadFailed {
        /// Description of the upload failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl AudioError {
    /// Fixed, user-facing message shown by the alert presenter.
    pub fn alert_message(&self) -> &'static str {
        match self {
            AudioError::DeviceError { .. } => "The audio device reported an error.",
            AudioError::SessionActivationFailed { .. } => {
                "The recording session could not be started."
            }
            AudioError::CaptureStartFailed { .. } => "The recording could not be started.",
            AudioError::CaptureStopFailed { .. } => "The recording session could not be modified.",
            AudioError::PlaybackFailed { .. } => "The recording could not be played back.",
            AudioError::ResamplingError { .. } => "The audio device reported an error.",
            AudioError::StorageUnavailable { .. } => "There is no place to store recordings.",
            AudioError::UploadFailed { .. } => "The recording could not be saved.",
        }
    }
}

/// Result type alias using [`AudioError`].
pub type Result<T> = std::result::Result<T, AudioError>;
