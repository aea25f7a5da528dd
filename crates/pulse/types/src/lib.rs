//! # Pulse Types - Core Domain Model
//!
//! Shared type definitions for the Pulse reputation monitoring engine:
//! monitors and their lifecycle, scored data points, alert configuration,
//! alerts, and the bounded history that backs every monitor.
//!
//! All identifiers are UUID-backed newtypes. Data points and alerts are
//! immutable once created; the only mutable aggregate is [`Monitor`], and it
//! is owned exclusively by the registry in `pulse-monitor`.

pub mod alert;
pub mod history;
pub mod ids;
pub mod mention;
pub mod monitor;
pub mod sentiment;
pub mod stats;

pub use alert::{Alert, AlertConfig, AlertSeverity, AlertType};
pub use history::BoundedHistory;
pub use ids::{AlertId, MonitorId};
pub use mention::RawMention;
pub use monitor::{
    HistoryQuery, Monitor, MonitorConfig, MonitorSnapshot, MonitorStats, MonitorStatus,
    OperationResult, ScorerMode, SourceType,
};
pub use sentiment::{clamp_unit, truncate_text, DataPoint, SentimentLabel, Trend, NEUTRAL_BAND};

/// Default cap on a monitor's history.
pub const DEFAULT_HISTORY_CAPACITY: usize = 10_000;

/// Default polling interval (15 minutes).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 15 * 60 * 1000;

/// Maximum keywords stored per data point.
pub const MAX_KEYWORDS: usize = 10;
