//! Error types for pulse-monitor.

use pulse_sentiment::SentimentError;
use pulse_types::MonitorId;
use thiserror::Error;

/// Errors raised by the registry and the poll cycle.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Invalid monitor definition or an unavailable scorer strategy.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Mention Source transport failure.
    #[error("mention fetch failed: {0}")]
    Fetch(String),

    /// Scoring failed during a cycle.
    #[error("scoring failed: {0}")]
    Scoring(#[from] SentimentError),

    #[error("monitor not found: {0}")]
    NotFound(MonitorId),
}

impl MonitorError {
    /// The reason behind a configuration-class failure, including a
    /// rejected scorer credential. Such failures are never retried.
    pub fn configuration_reason(&self) -> Option<&str> {
        match self {
            Self::Configuration(reason) | Self::Scoring(SentimentError::Configuration(reason)) => {
                Some(reason)
            }
            _ => None,
        }
    }
}

/// Result type for monitor operations.
pub type MonitorResult<T> = Result<T, MonitorError>;
