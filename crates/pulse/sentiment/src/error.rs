//! Error types for pulse-sentiment.

use thiserror::Error;

/// Errors raised while scoring text.
#[derive(Debug, Error)]
pub enum SentimentError {
    /// Missing credential, rejected credential, unreachable endpoint, or a
    /// remote strategy requested without a provider.
    #[error("sentiment configuration error: {0}")]
    Configuration(String),

    /// Remote output could not be parsed. Resolved by local fallback inside
    /// the remote scorer; never surfaced to monitor callers.
    #[error("malformed sentiment response: {0}")]
    MalformedResponse(String),

    /// Remote provider answered with an unexpected status.
    #[error("sentiment transport error: {0}")]
    Transport(String),
}

/// Result type for sentiment operations.
pub type SentimentResult<T> = Result<T, SentimentError>;
