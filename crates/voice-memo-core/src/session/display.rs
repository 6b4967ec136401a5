use std::fmt;

/// Whole seconds split for `MM:SS` display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElapsedTime {
    /// Whole minutes.
    pub minutes: u64,
    /// Remaining seconds, `0..60`.
    pub seconds: u64,
}

impl ElapsedTime {
    /// Split `total` seconds into minutes and seconds.
    pub fn from_secs(total: u64) -> Self {
        Self {
            minutes: total / 60,
            seconds: total % 60,
        }
    }
}

impl fmt::Display for ElapsedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes, self.seconds)
    }
}

/// Caption of the play button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayLabel {
    /// Playback can be started.
    #[default]
    Play,
    /// Playback is running and can be paused.
    Pause,
}

impl fmt::Display for PlayLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayLabel::Play => write!(f, "Play"),
            PlayLabel::Pause => write!(f, "Pause"),
        }
    }
}

/// What the front-end shows. Owned and updated by the controller only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayState {
    /// Timer caption, `MM:SS`.
    pub timer_text: String,
    /// Whether the timer (and its reminder line) is shown.
    pub timer_visible: bool,
    /// Last-30-seconds warning styling.
    pub warning: bool,
    /// Whether the play button accepts taps.
    pub play_enabled: bool,
    /// Whether the save button accepts taps.
    pub save_enabled: bool,
    /// Play button caption.
    pub play_label: PlayLabel,
}

impl DisplayState {
    pub(crate) fn show_timer(&mut self) {
        self.timer_text = ElapsedTime::from_secs(0).to_string();
        self.timer_visible = true;
        self.warning = false;
    }

    pub(crate) fn hide_timer(&mut self) {
        self.timer_text.clear();
        self.timer_visible = false;
        self.warning = false;
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            timer_text: String::new(),
            timer_visible: false,
            warning: false,
            play_enabled: false,
            save_enabled: false,
            play_label: PlayLabel::Play,
        }
    }
}
