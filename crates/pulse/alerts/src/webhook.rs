//! Outbound webhook delivery.

use std::time::Duration;

use pulse_types::Alert;
use serde_json::json;
use tracing::debug;

use crate::error::{AlertError, AlertResult};

/// POSTs `{"event": "alert", "alert": ...}` to operator-supplied URLs.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: reqwest::Client,
}

impl WebhookClient {
    pub fn new(timeout: Duration) -> AlertResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AlertError::Configuration(e.to_string()))?;
        Ok(Self { client })
    }

    /// Deliver one alert. The response body is ignored; only the status
    /// decides success.
    pub async fn deliver(&self, url: &str, alert: &Alert) -> AlertResult<()> {
        let body = json!({ "event": "alert", "alert": alert });

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AlertError::Webhook {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AlertError::Webhook {
                url: url.to_string(),
                reason: format!("status {status}"),
            });
        }

        debug!(url, alert_id = %alert.id, "webhook delivered");
        Ok(())
    }
}
