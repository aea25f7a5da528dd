//! # Pulse Engine - Reputation Monitoring & Sentiment Alerting
//!
//! Continuously tracks targets (handles, keywords), scores every mention
//! for sentiment, raises alerts on threshold breaches, volume spikes and
//! statistical anomalies, and produces reports on demand.
//!
//! ```text
//! MentionSource -> SentimentScorer -> monitor history -> AlertDetector -> AlertDispatcher
//!                                            |                                 |
//!                                            +------> Report Generator <-------+
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use pulse_engine::{EngineConfig, ReputationEngine, MonitorConfig, ReportFormat, ReportPeriod};
//!
//! # async fn run() -> pulse_engine::EngineResult<()> {
//! let config = EngineConfig::load(Some("pulse.toml"))?;
//! pulse_engine::init_tracing(&config.logging);
//!
//! let engine = ReputationEngine::from_config(config)?;
//! let monitor = engine.create_monitor(MonitorConfig::new("@acme")).await?;
//!
//! let report = engine.generate_report(&monitor.id, ReportPeriod::Day, ReportFormat::Document);
//! if let Some(document) = report.as_ref().and_then(|r| r.as_document()) {
//!     println!("{document}");
//! }
//! engine.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod telemetry;

pub use config::{AlertsConfig, EngineConfig, LoggingConfig};
pub use engine::{EngineBuilder, ReputationEngine};
pub use error::{EngineError, EngineResult};
pub use telemetry::init_tracing;

pub use pulse_alerts::{AlertQuery, AlertTransport};
pub use pulse_monitor::{MentionSource, MonitorEvent, PollerConfig};
pub use pulse_report::{Report, ReportFormat, ReportOutput, ReportPeriod};
pub use pulse_sentiment::{SentimentConfig, SentimentProvider};
pub use pulse_types::{
    Alert, AlertConfig, AlertSeverity, AlertType, DataPoint, HistoryQuery, MonitorConfig,
    MonitorId, MonitorSnapshot, MonitorStatus, OperationResult, ScorerMode, SourceType,
};
