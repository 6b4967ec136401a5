/// Completion notifications from the audio devices.
///
/// Devices report asynchronously; the event loop delivers these to
/// [`SessionController::handle_event`](crate::SessionController::handle_event)
/// on the same thread that handles user intents and ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Capture hardware finished writing the artifact.
    RecordingFinished {
        /// Whether the artifact was finalized without error.
        success: bool,
    },
    /// Playback reached the end of the artifact.
    PlaybackFinished {
        /// Whether playback completed without a decoding error.
        success: bool,
    },
}

/// Channel end handed to devices for completion events.
pub type EventSender = std::sync::mpsc::Sender<SessionEvent>;

/// Channel end drained by the event loop.
pub type EventReceiver = std::sync::mpsc::Receiver<SessionEvent>;
