use std::fmt;

/// The session's current activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Nothing running; the tick timer is stopped.
    #[default]
    Idle,
    /// Capturing audio.
    Recording,
    /// Playing back the last artifact.
    Playing,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Idle => write!(f, "idle"),
            Mode::Recording => write!(f, "recording"),
            Mode::Playing => write!(f, "playing"),
        }
    }
}
