//! Interfaces the controller drives but does not implement.

use crate::CoreResult;

use std::path::Path;

/// Cloud upload client.
///
/// Staging remembers the most recent artifact; `save()` commits it.
pub trait UploadClient {
    /// Remember `local_path` as the next artifact to upload under `artifact_id`.
    fn stage(&mut self, artifact_id: &str, local_path: &Path);

    /// Commit the most recently staged artifact.
    fn save(&mut self) -> CoreResult<()>;
}

/// A blocking, acknowledge-only user notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Alert title.
    pub title: String,
    /// Alert body.
    pub message: String,
    /// Caption of the dismiss button.
    pub acknowledge_label: String,
}

impl Alert {
    /// Title of every error alert.
    pub const ERROR_TITLE: &'static str = "Error";

    /// Alert with the given title, message and dismiss caption.
    pub fn new(title: &str, message: &str, acknowledge_label: &str) -> Self {
        Self {
            title: title.to_string(),
            message: message.to_string(),
            acknowledge_label: acknowledge_label.to_string(),
        }
    }

    /// Standard error alert.
    pub fn error(message: &str) -> Self {
        Self::new(Self::ERROR_TITLE, message, "OK")
    }

    /// Confirmation shown after a save the user asked for.
    pub fn saved() -> Self {
        Self::new("Thanks!", "Your recording was saved.", "Yay!")
    }
}

/// Presents alerts to the user.
pub trait AlertPresenter {
    /// Show `alert`.
    fn present(&mut self, alert: &Alert);
}

/// Recurring tick source on the controller's thread.
pub trait TickTimer {
    /// Begin delivering ticks.
    fn start(&mut self);

    /// Stop delivering ticks.
    fn stop(&mut self);

    /// Whether ticks are being delivered.
    fn is_running(&self) -> bool;
}
