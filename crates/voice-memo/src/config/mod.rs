mod recording_config;
#[allow(clippy::module_inception)]
mod config;
mod storage_config;

pub(crate) use {config::Config, recording_config::RecordingConfig, storage_config::StorageConfig};

use voice_memo_core::DEFAULT_MAX_DURATION_SECS;

/// About 60 ticks per second, fine enough for a seconds display.
pub(crate) const DEFAULT_TICK_INTERVAL_MS: u64 = 16;
pub(crate) const DEFAULT_SAMPLE_RATE: u32 = 44_100;
pub(crate) const DEFAULT_CHANNELS: u16 = 2;

pub(crate) fn default_max_duration_secs() -> u64 {
    DEFAULT_MAX_DURATION_SECS
}

pub(crate) fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}

pub(crate) fn default_sample_rate() -> u32 {
    DEFAULT_SAMPLE_RATE
}

pub(crate) fn default_channels() -> u16 {
    DEFAULT_CHANNELS
}
