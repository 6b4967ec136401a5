//! Platform seams for the audio hardware.
//!
//! The session controller never talks to an audio API directly. Capture and
//! playback go through these traits so the state machine can run against
//! cpal/rodio on the desktop or against scripted devices in tests.

use crate::{CoreResult, audio::RecordingFormat};

use std::{path::Path, time::Duration};

/// Category requested from the platform audio session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCategory {
    /// Simultaneous recording and playback.
    PlayAndRecord,
}

/// Platform audio session (the single shared hardware handle).
pub trait SessionPlatform {
    /// Configure the session category.
    fn set_category(&mut self, category: SessionCategory) -> CoreResult<()>;

    /// Activate or deactivate the session.
    fn set_active(&mut self, active: bool) -> CoreResult<()>;
}

/// Audio capture hardware bound to one output file.
pub trait CaptureDevice {
    /// Configure encoding and prime capture into `path` without starting it.
    fn prepare(&mut self, path: &Path, format: &RecordingFormat) -> CoreResult<()>;

    /// Start (or restart) capture. Restarting overwrites the file.
    fn record(&mut self) -> CoreResult<()>;

    /// Stop capture. Completion is reported later as
    /// [`SessionEvent::RecordingFinished`](crate::SessionEvent::RecordingFinished).
    fn stop(&mut self) -> CoreResult<()>;

    /// Length of the current (or last) capture.
    fn current_time(&self) -> Duration;

    /// Whether capture is running.
    fn is_recording(&self) -> bool;
}

/// Playback hardware bound to one recorded file.
pub trait PlaybackDevice {
    /// Start or resume playback. After completion playback restarts from the beginning.
    fn play(&mut self) -> CoreResult<()>;

    /// Pause playback, keeping the position.
    fn stop(&mut self);

    /// Total length of the bound file.
    fn duration(&self) -> Duration;

    /// Playback position.
    fn current_time(&self) -> Duration;

    /// Whether audio is being played.
    fn is_playing(&self) -> bool;
}

/// Factory for per-cycle devices.
///
/// A fresh capture device is opened for every recorder and a fresh playback
/// device for every player.
pub trait AudioBackend {
    /// Open a capture device.
    fn open_capture(&mut self) -> CoreResult<Box<dyn CaptureDevice>>;

    /// Open a playback device bound to `path`.
    fn open_playback(&mut self, path: &Path) -> CoreResult<Box<dyn PlaybackDevice>>;
}
