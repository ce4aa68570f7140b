use serde::Serialize;
use std::time::Duration;

pub const DEFAULT_WAIT_SECONDS: u64 = 12;
pub const MIN_WAIT_SECONDS: u64 = 5;
pub const DEFAULT_INTERVAL_SECONDS: u64 = 8;
pub const MIN_INTERVAL_SECONDS: u64 = 3;
pub const DEFAULT_CLOSE_SECONDS: u64 = 3;

/// Pacing for one batch.
///
/// `wait_seconds` is how long the delivery helper gives the chat to open,
/// `interval_seconds` the pause between two deliveries, and `close_seconds`
/// the delay before the helper closes its tab when `tab_close` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Timing {
    pub wait_seconds: u64,
    pub interval_seconds: u64,
    pub close_seconds: u64,
    pub tab_close: bool,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            wait_seconds: DEFAULT_WAIT_SECONDS,
            interval_seconds: DEFAULT_INTERVAL_SECONDS,
            close_seconds: DEFAULT_CLOSE_SECONDS,
            tab_close: true,
        }
    }
}

impl Timing {
    /// Raises values below the supported minimums.
    pub fn clamped(self) -> Self {
        Self {
            wait_seconds: self.wait_seconds.max(MIN_WAIT_SECONDS),
            interval_seconds: self.interval_seconds.max(MIN_INTERVAL_SECONDS),
            ..self
        }
    }

    pub fn with_wait(self, seconds: u64) -> Self {
        Self {
            wait_seconds: seconds,
            ..self
        }
        .clamped()
    }

    pub fn with_interval(self, seconds: u64) -> Self {
        Self {
            interval_seconds: seconds,
            ..self
        }
        .clamped()
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }
}
