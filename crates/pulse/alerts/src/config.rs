//! Detector and dispatcher configuration.

use serde::{Deserialize, Serialize};

/// Thresholds for the alert detector.
///
/// The anomaly z thresholds are heuristics; tune them per deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Batch mean below this escalates a threshold alert to critical.
    #[serde(default = "default_critical_sentiment")]
    pub critical_sentiment: f64,

    /// Prior entries required before volume spikes are evaluated.
    #[serde(default = "default_volume_min_history")]
    pub volume_min_history: usize,

    /// Prior entries required before anomalies are evaluated.
    #[serde(default = "default_anomaly_min_history")]
    pub anomaly_min_history: usize,

    /// Number of entries preceding the batch used as the anomaly baseline.
    #[serde(default = "default_anomaly_window")]
    pub anomaly_window: usize,

    /// z below this raises a warning anomaly.
    #[serde(default = "default_anomaly_warning_z")]
    pub anomaly_warning_z: f64,

    /// z at or below this raises a critical anomaly.
    #[serde(default = "default_anomaly_critical_z")]
    pub anomaly_critical_z: f64,

    /// Standard deviation used when the baseline has no variance.
    #[serde(default = "default_min_baseline_std")]
    pub min_baseline_std: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            critical_sentiment: default_critical_sentiment(),
            volume_min_history: default_volume_min_history(),
            anomaly_min_history: default_anomaly_min_history(),
            anomaly_window: default_anomaly_window(),
            anomaly_warning_z: default_anomaly_warning_z(),
            anomaly_critical_z: default_anomaly_critical_z(),
            min_baseline_std: default_min_baseline_std(),
        }
    }
}

/// Dispatcher settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatcherConfig {
    /// Alerts retained in the global history.
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Result cap for queries without an explicit limit.
    #[serde(default = "default_query_limit")]
    pub default_query_limit: usize,

    #[serde(default = "default_webhook_timeout_secs")]
    pub webhook_timeout_secs: u64,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            history_capacity: default_history_capacity(),
            default_query_limit: default_query_limit(),
            webhook_timeout_secs: default_webhook_timeout_secs(),
        }
    }
}

fn default_critical_sentiment() -> f64 {
    -0.6
}

fn default_volume_min_history() -> usize {
    20
}

fn default_anomaly_min_history() -> usize {
    30
}

fn default_anomaly_window() -> usize {
    30
}

fn default_anomaly_warning_z() -> f64 {
    -2.0
}

fn default_anomaly_critical_z() -> f64 {
    -3.0
}

fn default_min_baseline_std() -> f64 {
    0.05
}

fn default_history_capacity() -> usize {
    1_000
}

fn default_query_limit() -> usize {
    50
}

fn default_webhook_timeout_secs() -> u64 {
    10
}
