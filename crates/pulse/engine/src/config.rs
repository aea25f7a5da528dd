//! Engine configuration.

use pulse_alerts::{DetectorConfig, DispatcherConfig};
use pulse_monitor::{MentionSourceConfig, PollerConfig};
use pulse_sentiment::SentimentConfig;
use serde::{Deserialize, Serialize};

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Scheduling and history
    #[serde(default)]
    pub polling: PollerConfig,

    /// Alert log and detector tuning
    #[serde(default)]
    pub alerts: AlertsConfig,

    /// Sentiment scoring
    #[serde(default)]
    pub sentiment: SentimentConfig,

    /// HTTP Mention Source; required unless a source is injected
    #[serde(default)]
    pub mention_source: Option<MentionSourceConfig>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Alert settings, flat so they map one-to-one onto `PULSE_ALERTS__*`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertsConfig {
    #[serde(default = "default_alert_history")]
    pub history_capacity: usize,

    #[serde(default = "default_query_limit")]
    pub default_query_limit: usize,

    #[serde(default = "default_webhook_timeout")]
    pub webhook_timeout_secs: u64,

    #[serde(default = "default_critical_sentiment")]
    pub critical_sentiment: f64,

    #[serde(default = "default_volume_min_history")]
    pub volume_min_history: usize,

    #[serde(default = "default_anomaly_min_history")]
    pub anomaly_min_history: usize,

    #[serde(default = "default_anomaly_window")]
    pub anomaly_window: usize,

    #[serde(default = "default_anomaly_warning_z")]
    pub anomaly_warning_z: f64,

    #[serde(default = "default_anomaly_critical_z")]
    pub anomaly_critical_z: f64,

    #[serde(default = "default_min_baseline_std")]
    pub min_baseline_std: f64,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        let dispatcher = DispatcherConfig::default();
        let detector = DetectorConfig::default();
        Self {
            history_capacity: dispatcher.history_capacity,
            default_query_limit: dispatcher.default_query_limit,
            webhook_timeout_secs: dispatcher.webhook_timeout_secs,
            critical_sentiment: detector.critical_sentiment,
            volume_min_history: detector.volume_min_history,
            anomaly_min_history: detector.anomaly_min_history,
            anomaly_window: detector.anomaly_window,
            anomaly_warning_z: detector.anomaly_warning_z,
            anomaly_critical_z: detector.anomaly_critical_z,
            min_baseline_std: detector.min_baseline_std,
        }
    }
}

impl AlertsConfig {
    pub fn dispatcher(&self) -> DispatcherConfig {
        DispatcherConfig {
            history_capacity: self.history_capacity,
            default_query_limit: self.default_query_limit,
            webhook_timeout_secs: self.webhook_timeout_secs,
        }
    }

    pub fn detector(&self) -> DetectorConfig {
        DetectorConfig {
            critical_sentiment: self.critical_sentiment,
            volume_min_history: self.volume_min_history,
            anomaly_min_history: self.anomaly_min_history,
            anomaly_window: self.anomaly_window,
            anomaly_warning_z: self.anomaly_warning_z,
            anomaly_critical_z: self.anomaly_critical_z,
            min_baseline_std: self.min_baseline_std,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_alert_history() -> usize {
    DispatcherConfig::default().history_capacity
}

fn default_query_limit() -> usize {
    DispatcherConfig::default().default_query_limit
}

fn default_webhook_timeout() -> u64 {
    DispatcherConfig::default().webhook_timeout_secs
}

fn default_critical_sentiment() -> f64 {
    DetectorConfig::default().critical_sentiment
}

fn default_volume_min_history() -> usize {
    DetectorConfig::default().volume_min_history
}

fn default_anomaly_min_history() -> usize {
    DetectorConfig::default().anomaly_min_history
}

fn default_anomaly_window() -> usize {
    DetectorConfig::default().anomaly_window
}

fn default_anomaly_warning_z() -> f64 {
    DetectorConfig::default().anomaly_warning_z
}

fn default_anomaly_critical_z() -> f64 {
    DetectorConfig::default().anomaly_critical_z
}

fn default_min_baseline_std() -> f64 {
    DetectorConfig::default().min_baseline_std
}

fn default_log_level() -> String {
    "info".to_string()
}

impl EngineConfig {
    /// Load configuration: defaults, then the optional file, then
    /// `PULSE_`-prefixed environment variables (`PULSE_POLLING__STATS_WINDOW`).
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&EngineConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("PULSE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Settings suited to tests and local experiments: one-second polling.
    pub fn development() -> Self {
        Self {
            polling: PollerConfig {
                default_interval_ms: 1_000,
                ..PollerConfig::default()
            },
            logging: LoggingConfig {
                level: "debug".to_string(),
                json: false,
            },
            ..Self::default()
        }
    }
}
