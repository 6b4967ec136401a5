use std::time::Duration;

/// Seconds before the cutoff at which the timer turns to its warning state.
pub const WARNING_WINDOW_SECS: u64 = 30;

/// Default maximum recording length.
pub const DEFAULT_MAX_DURATION_SECS: u64 = 300;

/// Duration limits, fixed for the lifetime of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    max_duration_secs: u64,
}

impl SessionLimits {
    /// Limits with a custom maximum recording length in whole seconds.
    pub fn new(max_duration_secs: u64) -> Self {
        Self { max_duration_secs }
    }

    /// Maximum recording length in whole seconds.
    pub fn max_duration_secs(&self) -> u64 {
        self.max_duration_secs
    }

    /// Maximum recording length.
    pub fn max_duration(&self) -> Duration {
        Duration::from_secs(self.max_duration_secs)
    }

    /// A recording longer than this is cut off.
    pub fn is_overrun(&self, elapsed_secs: u64) -> bool {
        elapsed_secs > self.max_duration_secs
    }

    /// Whether `elapsed_secs` is inside the last 30 seconds of the budget.
    pub fn is_warning(&self, elapsed_secs: u64) -> bool {
        elapsed_secs > self.max_duration_secs.saturating_sub(WARNING_WINDOW_SECS)
    }
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DURATION_SECS)
    }
}
