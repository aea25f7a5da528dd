//! Error types for pulse-alerts.

use thiserror::Error;

/// Errors from alert delivery. Always caught and logged by the dispatcher.
#[derive(Debug, Error)]
pub enum AlertError {
    /// Webhook delivery failed.
    #[error("webhook delivery to {url} failed: {reason}")]
    Webhook { url: String, reason: String },

    /// Pub/sub transport rejected the alert.
    #[error("alert transport error on {topic}: {reason}")]
    Transport { topic: String, reason: String },

    /// HTTP client could not be constructed.
    #[error("alert client configuration error: {0}")]
    Configuration(String),
}

/// Result type for alert operations.
pub type AlertResult<T> = Result<T, AlertError>;
