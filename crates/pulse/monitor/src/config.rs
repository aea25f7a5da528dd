//! Poller configuration.

use serde::{Deserialize, Serialize};

/// Scheduling and history settings shared by every monitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Interval for monitors that do not set their own.
    #[serde(default = "default_interval_ms")]
    pub default_interval_ms: u64,

    /// Ceiling for the backed-off interval.
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Number of most recent entries the rolling stats cover.
    #[serde(default = "default_stats_window")]
    pub stats_window: usize,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            default_interval_ms: default_interval_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            history_capacity: default_history_capacity(),
            stats_window: default_stats_window(),
        }
    }
}

impl PollerConfig {
    /// Interval after one more failure, starting from `current`.
    pub fn backoff(&self, current: u64, configured: u64) -> u64 {
        let ceiling = self.max_backoff_ms.max(configured);
        current.saturating_mul(2).min(ceiling)
    }
}

fn default_interval_ms() -> u64 {
    pulse_types::DEFAULT_POLL_INTERVAL_MS
}

fn default_max_backoff_ms() -> u64 {
    60 * 60 * 1000
}

fn default_history_capacity() -> usize {
    pulse_types::DEFAULT_HISTORY_CAPACITY
}

fn default_stats_window() -> usize {
    50
}
