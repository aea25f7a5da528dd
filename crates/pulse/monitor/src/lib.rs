//! # Pulse Monitor - Registry and Poller
//!
//! [`MonitorRegistry`] owns every monitor. Each monitor polls its
//! [`MentionSource`] on its own schedule:
//!
//! 1. count the poll and stamp `last_polled_at`
//! 2. fetch mentions; an empty result ends the cycle
//! 3. score them in the monitor's scorer mode
//! 4. append to the bounded history and refresh rolling stats
//! 5. run the alert detector and dispatch what it returns
//!
//! A failed fetch or scoring step leaves history untouched and doubles the
//! next interval (capped); a later success restores it. A scorer that
//! rejects its credentials stops the monitor instead, and fails `create`
//! outright when it happens on the first cycle. The next firing is
//! armed only after the current cycle finishes, and manual polls share the
//! same per-monitor lock, so cycles for one monitor never overlap.

pub mod config;
pub mod error;
pub mod events;
mod poller;
pub mod registry;
pub mod source;
pub mod stats;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use config::PollerConfig;
pub use error::{MonitorError, MonitorResult};
pub use events::MonitorEvent;
pub use registry::MonitorRegistry;
pub use source::{HttpMentionSource, MentionSource, MentionSourceConfig};
pub use stats::refresh_stats;
