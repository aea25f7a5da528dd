//! Alert configuration and alert records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::{AlertId, MonitorId};

/// Per-monitor alert configuration. Supplied at creation and never mutated
/// by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertConfig {
    /// Batch mean below this fires a sentiment threshold alert.
    #[serde(default = "default_sentiment_threshold")]
    pub sentiment_threshold: f64,

    /// Batch size above `baseline * volume_multiplier` fires a volume spike.
    #[serde(default = "default_volume_multiplier")]
    pub volume_multiplier: f64,

    /// Optional webhook receiving every alert for this monitor.
    #[serde(default)]
    pub webhook_url: Option<String>,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            sentiment_threshold: default_sentiment_threshold(),
            volume_multiplier: default_volume_multiplier(),
            webhook_url: None,
        }
    }
}

impl AlertConfig {
    pub fn with_webhook(mut self, url: impl Into<String>) -> Self {
        self.webhook_url = Some(url.into());
        self
    }
}

fn default_sentiment_threshold() -> f64 {
    -0.3
}

fn default_volume_multiplier() -> f64 {
    3.0
}

/// Kind of detected condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    SentimentThreshold,
    VolumeSpike,
    Anomaly,
}

impl std::fmt::Display for AlertType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertType::SentimentThreshold => write!(f, "sentiment_threshold"),
            AlertType::VolumeSpike => write!(f, "volume_spike"),
            AlertType::Anomaly => write!(f, "anomaly"),
        }
    }
}

/// Alert severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Warning,
    Critical,
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertSeverity::Warning => write!(f, "warning"),
            AlertSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// A detected condition. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub message: String,
    pub monitor_id: MonitorId,
    pub target: String,
    /// Check-specific details (means, thresholds, ratios, ...).
    pub payload: Value,
    pub timestamp: DateTime<Utc>,
}

impl Alert {
    pub fn new(
        alert_type: AlertType,
        severity: AlertSeverity,
        message: impl Into<String>,
        monitor_id: MonitorId,
        target: impl Into<String>,
        payload: Value,
    ) -> Self {
        Self {
            id: AlertId::generate(),
            alert_type,
            severity,
            message: message.into(),
            monitor_id,
            target: target.into(),
            payload,
            timestamp: Utc::now(),
        }
    }
}
