use crate::config::{
    default_channels, default_max_duration_secs, default_sample_rate, default_tick_interval_ms,
};

use std::time::Duration;

use serde::{Deserialize, Serialize};
use voice_memo_core::{AudioCodec, RecordingFormat, SessionLimits};

/// Recording length, tick rate and capture format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingConfig {
    /// Recordings longer than this are stopped and saved automatically.
    #[serde(default = "default_max_duration_secs")]
    pub max_duration_secs: u64,
    /// Timer refresh period while recording or playing.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Requested capture sample rate in Hz.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// Channels written to the artifact.
    #[serde(default = "default_channels")]
    pub channels: u16,
}

impl RecordingConfig {
    /// Duration limits for the session controller.
    pub fn limits(&self) -> SessionLimits {
        SessionLimits::new(self.max_duration_secs)
    }

    /// Desktop capture writes WAV files.
    pub fn format(&self) -> RecordingFormat {
        RecordingFormat {
            codec: AudioCodec::LinearPcm,
            sample_rate: self.sample_rate,
            channels: self.channels,
        }
    }

    /// Tick period as a [`Duration`].
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            max_duration_secs: default_max_duration_secs(),
            tick_interval_ms: default_tick_interval_ms(),
            sample_rate: default_sample_rate(),
            channels: default_channels(),
        }
    }
}
