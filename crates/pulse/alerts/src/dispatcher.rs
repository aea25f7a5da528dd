//! Alert dispatch and the global alert log.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use pulse_types::{Alert, AlertConfig, AlertSeverity, BoundedHistory, MonitorId};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{error, warn};

use crate::config::DispatcherConfig;
use crate::error::AlertResult;
use crate::transport::AlertTransport;
use crate::webhook::WebhookClient;

const ALERT_CHANNEL_CAPACITY: usize = 256;

/// Filter for [`AlertDispatcher::get_alerts`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertQuery {
    #[serde(default)]
    pub monitor_id: Option<MonitorId>,
    #[serde(default)]
    pub severity: Option<AlertSeverity>,
    /// Falls back to the dispatcher's default limit.
    #[serde(default)]
    pub limit: Option<usize>,
}

impl AlertQuery {
    pub fn for_monitor(monitor_id: MonitorId) -> Self {
        Self {
            monitor_id: Some(monitor_id),
            ..Self::default()
        }
    }

    pub fn severity(mut self, severity: AlertSeverity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Logs, records, and fans out alerts.
///
/// Recording is synchronous so an alert is queryable as soon as `dispatch`
/// returns. Webhook and transport delivery run on a spawned task; their
/// failures are logged and dropped.
pub struct AlertDispatcher {
    history: RwLock<BoundedHistory<Alert>>,
    webhook: WebhookClient,
    transport: Option<Arc<dyn AlertTransport>>,
    events: broadcast::Sender<Alert>,
    default_limit: usize,
}

impl AlertDispatcher {
    pub fn new(config: &DispatcherConfig) -> AlertResult<Self> {
        let webhook = WebhookClient::new(Duration::from_secs(config.webhook_timeout_secs))?;
        let (events, _) = broadcast::channel(ALERT_CHANNEL_CAPACITY);
        Ok(Self {
            history: RwLock::new(BoundedHistory::new(config.history_capacity)),
            webhook,
            transport: None,
            events,
            default_limit: config.default_query_limit,
        })
    }

    pub fn with_transport(mut self, transport: Arc<dyn AlertTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Dispatch one alert. Returns the delivery task when a webhook or
    /// transport is involved.
    pub fn dispatch(&self, alert: Alert, config: &AlertConfig) -> Option<JoinHandle<()>> {
        match alert.severity {
            AlertSeverity::Warning => warn!(
                alert_id = %alert.id,
                alert_type = %alert.alert_type,
                monitor_id = %alert.monitor_id,
                target = %alert.target,
                "{}", alert.message
            ),
            AlertSeverity::Critical => error!(
                alert_id = %alert.id,
                alert_type = %alert.alert_type,
                monitor_id = %alert.monitor_id,
                target = %alert.target,
                "{}", alert.message
            ),
        }

        self.history.write().push(alert.clone());
        // No subscribers is fine.
        let _ = self.events.send(alert.clone());

        let webhook_url = config.webhook_url.clone();
        let transport = self.transport.clone();
        if webhook_url.is_none() && transport.is_none() {
            return None;
        }

        let webhook = self.webhook.clone();
        Some(tokio::spawn(async move {
            if let Some(url) = webhook_url {
                if let Err(e) = webhook.deliver(&url, &alert).await {
                    warn!(alert_id = %alert.id, error = %e, "webhook delivery failed");
                }
            }
            if let Some(transport) = transport {
                let topic = alert.monitor_id.topic();
                if let Err(e) = transport.publish(&topic, &alert).await {
                    warn!(alert_id = %alert.id, error = %e, "alert publish failed");
                }
            }
        }))
    }

    /// Dispatch a batch in order.
    pub fn dispatch_all(&self, alerts: Vec<Alert>, config: &AlertConfig) -> Vec<JoinHandle<()>> {
        alerts
            .into_iter()
            .filter_map(|alert| self.dispatch(alert, config))
            .collect()
    }

    /// Matching alerts, newest first.
    pub fn get_alerts(&self, query: &AlertQuery) -> Vec<Alert> {
        let limit = query.limit.unwrap_or(self.default_limit);
        self.history
            .read()
            .iter()
            .rev()
            .filter(|a| query.monitor_id.as_ref().map_or(true, |id| &a.monitor_id == id))
            .filter(|a| query.severity.map_or(true, |s| a.severity == s))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Every retained alert for one monitor, oldest first.
    pub fn alerts_for(&self, monitor_id: &MonitorId) -> Vec<Alert> {
        self.history
            .read()
            .iter()
            .filter(|a| &a.monitor_id == monitor_id)
            .cloned()
            .collect()
    }

    /// Drop the whole alert log. Returns how many alerts were removed.
    pub fn clear_alerts(&self) -> usize {
        let mut history = self.history.write();
        let cleared = history.len();
        history.clear();
        cleared
    }

    pub fn len(&self) -> usize {
        self.history.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.read().is_empty()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Alert> {
        self.events.subscribe()
    }
}

impl std::fmt::Debug for AlertDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertDispatcher")
            .field("alerts", &self.len())
            .field("has_transport", &self.transport.is_some())
            .finish()
    }
}
