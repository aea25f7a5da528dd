//! # Pulse Alerts - Detection and Dispatch
//!
//! [`AlertDetector`] runs three checks against each poll batch:
//!
//! | Check | Fires when | Critical when |
//! |-------|-----------|---------------|
//! | `sentiment_threshold` | batch mean < monitor threshold | mean < -0.6 |
//! | `volume_spike` | batch > per-poll baseline x multiplier (20+ prior entries) | ratio > 2x multiplier |
//! | `anomaly` | z-score vs. the preceding 30 entries < -2 (30+ prior entries) | z <= -3 |
//!
//! [`AlertDispatcher`] logs every alert, keeps a capped global log, and
//! fans alerts out to an optional webhook and an optional [`AlertTransport`].
//! Sink failures are logged and never reach the poll cycle.

pub mod config;
pub mod detector;
pub mod dispatcher;
pub mod error;
pub mod transport;
pub mod webhook;

pub use config::{DetectorConfig, DispatcherConfig};
pub use detector::AlertDetector;
pub use dispatcher::{AlertDispatcher, AlertQuery};
pub use error::{AlertError, AlertResult};
#[cfg(any(test, feature = "test-utils"))]
pub use transport::RecordingTransport;
pub use transport::AlertTransport;
pub use webhook::WebhookClient;
