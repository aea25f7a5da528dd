//! Monitor definition, lifecycle state, and read-only snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::alert::AlertConfig;
use crate::history::BoundedHistory;
use crate::ids::MonitorId;
use crate::sentiment::{DataPoint, Trend};
use crate::{DEFAULT_HISTORY_CAPACITY, DEFAULT_POLL_INTERVAL_MS};

/// Where mentions for a target come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    #[default]
    Mentions,
    Keyword,
    Replies,
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceType::Mentions => write!(f, "mentions"),
            SourceType::Keyword => write!(f, "keyword"),
            SourceType::Replies => write!(f, "replies"),
        }
    }
}

/// Lifecycle status of a monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorStatus {
    Active,
    Stopped,
}

impl std::fmt::Display for MonitorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MonitorStatus::Active => write!(f, "active"),
            MonitorStatus::Stopped => write!(f, "stopped"),
        }
    }
}

/// Which sentiment strategy scores this monitor's mentions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScorerMode {
    #[default]
    Local,
    Remote,
}

/// Input to monitor creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    pub target: String,

    #[serde(default)]
    pub source_type: SourceType,

    /// Overrides the engine's default interval when set.
    #[serde(default)]
    pub poll_interval_ms: Option<u64>,

    #[serde(default)]
    pub scorer_mode: ScorerMode,

    #[serde(default)]
    pub alert_config: AlertConfig,
}

impl MonitorConfig {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            source_type: SourceType::default(),
            poll_interval_ms: None,
            scorer_mode: ScorerMode::default(),
            alert_config: AlertConfig::default(),
        }
    }

    pub fn with_source_type(mut self, source_type: SourceType) -> Self {
        self.source_type = source_type;
        self
    }

    pub fn with_poll_interval_ms(mut self, interval_ms: u64) -> Self {
        self.poll_interval_ms = Some(interval_ms);
        self
    }

    pub fn with_scorer_mode(mut self, mode: ScorerMode) -> Self {
        self.scorer_mode = mode;
        self
    }

    pub fn with_alert_config(mut self, alert_config: AlertConfig) -> Self {
        self.alert_config = alert_config;
        self
    }
}

/// Rolling statistics over the most recent window of history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonitorStats {
    pub rolling_average: f64,
    pub trend: Trend,
    /// Population standard deviation of the window.
    pub volatility: f64,
    pub total_polls: u64,
}

/// A tracked subject with its own schedule and accumulated history.
#[derive(Debug, Clone)]
pub struct Monitor {
    pub id: MonitorId,
    pub target: String,
    pub source_type: SourceType,
    pub status: MonitorStatus,
    /// Configured interval.
    pub poll_interval_ms: u64,
    /// Interval that will be used for the next firing (grows under backoff).
    pub current_interval_ms: u64,
    pub consecutive_failures: u32,
    pub scorer_mode: ScorerMode,
    pub alert_config: AlertConfig,
    pub history: BoundedHistory<DataPoint>,
    pub stats: MonitorStats,
    pub created_at: DateTime<Utc>,
    pub last_polled_at: Option<DateTime<Utc>>,
}

impl Monitor {
    /// Create an active monitor with empty history and zeroed stats.
    pub fn new(config: MonitorConfig) -> Self {
        Self::with_capacity(config, DEFAULT_POLL_INTERVAL_MS, DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_capacity(
        config: MonitorConfig,
        default_interval_ms: u64,
        history_capacity: usize,
    ) -> Self {
        let interval = config.poll_interval_ms.unwrap_or(default_interval_ms).max(1);
        Self {
            id: MonitorId::generate(),
            target: config.target.trim().to_string(),
            source_type: config.source_type,
            status: MonitorStatus::Active,
            poll_interval_ms: interval,
            current_interval_ms: interval,
            consecutive_failures: 0,
            scorer_mode: config.scorer_mode,
            alert_config: config.alert_config,
            history: BoundedHistory::new(history_capacity),
            stats: MonitorStats::default(),
            created_at: Utc::now(),
            last_polled_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == MonitorStatus::Active
    }

    /// Read-only view without the history body.
    pub fn snapshot(&self) -> MonitorSnapshot {
        MonitorSnapshot {
            id: self.id.clone(),
            target: self.target.clone(),
            source_type: self.source_type,
            status: self.status,
            poll_interval_ms: self.poll_interval_ms,
            current_interval_ms: self.current_interval_ms,
            consecutive_failures: self.consecutive_failures,
            scorer_mode: self.scorer_mode,
            alert_config: self.alert_config.clone(),
            history_len: self.history.len(),
            stats: self.stats.clone(),
            created_at: self.created_at,
            last_polled_at: self.last_polled_at,
        }
    }

    /// Filtered tail of the history: entries at or after `since`, then the
    /// last `limit` of those, oldest first.
    pub fn query_history(&self, query: &HistoryQuery) -> Vec<DataPoint> {
        let filtered: Vec<&DataPoint> = self
            .history
            .iter()
            .filter(|p| query.since.map_or(true, |since| p.timestamp >= since))
            .collect();
        let skip = match query.limit {
            Some(limit) => filtered.len().saturating_sub(limit),
            None => 0,
        };
        filtered.into_iter().skip(skip).cloned().collect()
    }
}

/// Read-only copy of a monitor's state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorSnapshot {
    pub id: MonitorId,
    pub target: String,
    pub source_type: SourceType,
    pub status: MonitorStatus,
    pub poll_interval_ms: u64,
    pub current_interval_ms: u64,
    pub consecutive_failures: u32,
    pub scorer_mode: ScorerMode,
    pub alert_config: AlertConfig,
    pub history_len: usize,
    pub stats: MonitorStats,
    pub created_at: DateTime<Utc>,
    pub last_polled_at: Option<DateTime<Utc>>,
}

/// History filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
    pub since: Option<DateTime<Utc>>,
}

impl HistoryQuery {
    pub fn limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            since: None,
        }
    }

    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }
}

/// Structured outcome for lifecycle calls where failure is routine
/// (unknown ids are reported, never raised).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResult {
    pub success: bool,
    pub message: String,
}

impl OperationResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
