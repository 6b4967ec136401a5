mod capture;
mod desktop;
mod device;
mod format;
mod playback;
mod player;
mod recorder;
mod resampler;
mod session;

pub(crate) use {capture::WavSink, resampler::Resampler};

pub use {
    capture::CpalCaptureDevice,
    desktop::{DesktopBackend, DesktopSession},
    device::{AudioBackend, CaptureDevice, PlaybackDevice, SessionCategory, SessionPlatform},
    format::{AudioCodec, RecordingFormat},
    playback::RodioPlaybackDevice,
    player::Player,
    recorder::Recorder,
    session::{AudioSession, SessionHolder, SessionLease},
};
