//! Mention Source collaborator.

use std::time::Duration;

use async_trait::async_trait;
use pulse_types::{RawMention, SourceType};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MonitorError, MonitorResult};

/// Supplies raw mentions for a target.
///
/// An empty vector means "no results"; errors are transport failures and
/// put the monitor into backoff.
#[async_trait]
pub trait MentionSource: Send + Sync {
    async fn fetch(&self, target: &str, source_type: SourceType) -> MonitorResult<Vec<RawMention>>;
}

/// Settings for [`HttpMentionSource`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionSourceConfig {
    pub endpoint: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl MentionSourceConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Fetches mentions from an HTTP collector:
/// `GET <endpoint>?target=<target>&source=<source_type>` answering with a
/// JSON array of `{text, timestamp, author, url}`.
#[derive(Debug, Clone)]
pub struct HttpMentionSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpMentionSource {
    pub fn new(config: &MentionSourceConfig) -> MonitorResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MonitorError::Configuration(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl MentionSource for HttpMentionSource {
    async fn fetch(&self, target: &str, source_type: SourceType) -> MonitorResult<Vec<RawMention>> {
        let source = source_type.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("target", target), ("source", source.as_str())])
            .send()
            .await
            .map_err(|e| MonitorError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MonitorError::Fetch(format!(
                "mention source returned {status}"
            )));
        }

        let mentions: Vec<RawMention> = response
            .json()
            .await
            .map_err(|e| MonitorError::Fetch(format!("undecodable mention list: {e}")))?;

        debug!(target, count = mentions.len(), "Fetched mentions");
        Ok(mentions)
    }
}
