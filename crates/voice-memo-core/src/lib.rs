//! Voice Memo Core Library
//!
//! Recording/playback session state machine for a voice-memo recorder, with
//! cpal capture and rodio playback for the desktop.
//!
//! # Example
//!
//! ```no_run
//! use voice_memo_core::{
//!     Alert, AlertPresenter, ArtifactStore, AudioCodec, DesktopBackend, DesktopSession,
//!     RecordingFormat, SessionController, SessionLimits, SessionParts, TickTimer, UploadClient,
//!     CoreResult,
//! };
//!
//! use std::path::Path;
//!
//! struct NoUpload;
//! impl UploadClient for NoUpload {
//!     fn stage(&mut self, _artifact_id: &str, _local_path: &Path) {}
//!     fn save(&mut self) -> CoreResult<()> {
//!         Ok(())
//!     }
//! }
//!
//! struct PrintAlerts;
//! impl AlertPresenter for PrintAlerts {
//!     fn present(&mut self, alert: &Alert) {
//!         println!("{}: {}", alert.title, alert.message);
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Flag(bool);
//! impl TickTimer for Flag {
//!     fn start(&mut self) {
//!         self.0 = true;
//!     }
//!     fn stop(&mut self) {
//!         self.0 = false;
//!     }
//!     fn is_running(&self) -> bool {
//!         self.0
//!     }
//! }
//!
//! let (events_tx, events_rx) = std::sync::mpsc::channel();
//! let mut controller = SessionController::new(SessionParts {
//!     backend: Box::new(DesktopBackend::new(events_tx)),
//!     session_platform: Box::new(DesktopSession::default()),
//!     store: ArtifactStore::new("recordings"),
//!     format: RecordingFormat::default().with_codec(AudioCodec::LinearPcm),
//!     limits: SessionLimits::default(),
//!     uploader: Box::new(NoUpload),
//!     alerts: Box::new(PrintAlerts),
//!     timer: Box::new(Flag::default()),
//! });
//!
//! controller.on_record_button();
//! controller.on_tick();
//! controller.on_record_button();
//! for event in events_rx.try_iter() {
//!     controller.handle_event(event);
//! }
//! ```

mod artifact;
mod audio;
mod error;
mod session;

pub use {
    artifact::{ARTIFACT_TIME_FORMAT, Artifact, ArtifactStore, PendingArtifact},
    audio::{
        AudioBackend, AudioCodec, AudioSession, CaptureDevice, CpalCaptureDevice, DesktopBackend,
        DesktopSession, PlaybackDevice, Player, Recorder, RecordingFormat, RodioPlaybackDevice,
        SessionCategory, SessionHolder, SessionLease, SessionPlatform,
    },
    error::AudioError,
    error::Result as CoreResult,
    session::{
        Alert, AlertPresenter, DEFAULT_MAX_DURATION_SECS, DisplayState, ElapsedTime,
        EventReceiver, EventSender, Mode, PlayLabel, SessionController, SessionEvent,
        SessionLimits, SessionParts, TickTimer, UploadClient, WARNING_WINDOW_SECS,
    },
};

#[cfg(test)]
mod tests;
