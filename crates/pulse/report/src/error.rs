//! Error types for pulse-report.

use thiserror::Error;

/// Errors parsing report options. Generation itself cannot fail.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    #[error("unknown report period: {0} (expected 24h, 7d, 30d or all)")]
    UnknownPeriod(String),

    #[error("unknown report format: {0} (expected data or document)")]
    UnknownFormat(String),
}
