//! Error types for the engine facade.

use pulse_alerts::AlertError;
use pulse_monitor::MonitorError;
use pulse_sentiment::SentimentError;
use thiserror::Error;

/// Errors that cross the engine boundary. Only configuration problems are
/// ever surfaced here; cycle failures are absorbed by the poller.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration could not be loaded.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// Configuration loaded but cannot be used.
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Monitor(#[from] MonitorError),

    #[error(transparent)]
    Sentiment(#[from] SentimentError),

    #[error(transparent)]
    Alert(#[from] AlertError),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
