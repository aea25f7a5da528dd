//! Pub/sub emission seam.
//!
//! The engine publishes every dispatched alert to the monitor's topic
//! (`monitor:<uuid>`) when a transport is configured. The transport itself
//! (message bus, websocket fan-out, ...) lives outside this crate.

use async_trait::async_trait;
use pulse_types::Alert;

use crate::error::AlertResult;

#[async_trait]
pub trait AlertTransport: Send + Sync {
    async fn publish(&self, topic: &str, alert: &Alert) -> AlertResult<()>;
}

#[cfg(any(test, feature = "test-utils"))]
pub use recording::RecordingTransport;

#[cfg(any(test, feature = "test-utils"))]
mod recording {
    use super::*;
    use crate::error::AlertError;
    use parking_lot::Mutex;

    /// Keeps every published `(topic, alert)` pair in memory.
    #[derive(Debug, Default)]
    pub struct RecordingTransport {
        published: Mutex<Vec<(String, Alert)>>,
        fail: bool,
    }

    impl RecordingTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// A transport that rejects every publish.
        pub fn failing() -> Self {
            Self {
                published: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        pub fn published(&self) -> Vec<(String, Alert)> {
            self.published.lock().clone()
        }
    }

    #[async_trait]
    impl AlertTransport for RecordingTransport {
        async fn publish(&self, topic: &str, alert: &Alert) -> AlertResult<()> {
            if self.fail {
                return Err(AlertError::Transport {
                    topic: topic.to_string(),
                    reason: "transport unavailable".into(),
                });
            }
            self.published.lock().push((topic.to_string(), alert.clone()));
            Ok(())
        }
    }
}
