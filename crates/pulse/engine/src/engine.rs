//! The engine facade.

use std::sync::Arc;

use chrono::Utc;
use pulse_alerts::{AlertDetector, AlertDispatcher, AlertQuery, AlertTransport};
use pulse_monitor::{HttpMentionSource, MentionSource, MonitorEvent, MonitorRegistry};
use pulse_report::{generate_report, render, ReportFormat, ReportOutput, ReportPeriod};
use pulse_sentiment::{SentimentProvider, SentimentScorer};
use pulse_types::{
    Alert, DataPoint, HistoryQuery, MonitorConfig, MonitorId, MonitorSnapshot, OperationResult,
};
use tokio::sync::broadcast;
use tracing::{info, instrument};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};

/// Reputation monitoring engine.
///
/// Constructed explicitly and owned by the caller; there is no global
/// instance. Dropping the engine aborts every schedule, [`shutdown`]
/// winds them down gracefully.
///
/// [`shutdown`]: ReputationEngine::shutdown
pub struct ReputationEngine {
    registry: MonitorRegistry,
    dispatcher: Arc<AlertDispatcher>,
}

/// Builder for [`ReputationEngine`] with injectable collaborators.
pub struct EngineBuilder {
    config: EngineConfig,
    source: Option<Arc<dyn MentionSource>>,
    remote: Option<Arc<dyn SentimentProvider>>,
    transport: Option<Arc<dyn AlertTransport>>,
}

impl EngineBuilder {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            source: None,
            remote: None,
            transport: None,
        }
    }

    /// Use this Mention Source instead of the configured HTTP one.
    pub fn mention_source(mut self, source: Arc<dyn MentionSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Use this provider for monitors in remote scorer mode.
    pub fn remote_provider(mut self, provider: Arc<dyn SentimentProvider>) -> Self {
        self.remote = Some(provider);
        self
    }

    /// Publish every alert to `monitor:<id>` through this transport.
    pub fn alert_transport(mut self, transport: Arc<dyn AlertTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> EngineResult<ReputationEngine> {
        let config = self.config;

        let scorer = match self.remote {
            Some(remote) => SentimentScorer::local_only(&config.sentiment).with_remote(remote),
            None => SentimentScorer::from_config(&config.sentiment)?,
        };

        let source: Arc<dyn MentionSource> = match (self.source, &config.mention_source) {
            (Some(source), _) => source,
            (None, Some(source_config)) => Arc::new(HttpMentionSource::new(source_config)?),
            (None, None) => {
                return Err(EngineError::Config(
                    "no mention source configured (set mention_source.endpoint)".into(),
                ))
            }
        };

        let mut dispatcher = AlertDispatcher::new(&config.alerts.dispatcher())?;
        if let Some(transport) = self.transport {
            dispatcher = dispatcher.with_transport(transport);
        }
        let dispatcher = Arc::new(dispatcher);

        let registry = MonitorRegistry::new(
            config.polling.clone(),
            source,
            Arc::new(scorer),
            AlertDetector::new(config.alerts.detector()),
            dispatcher.clone(),
        );

        info!(
            default_interval_ms = config.polling.default_interval_ms,
            remote_scoring = config.sentiment.remote.is_some(),
            "Reputation engine ready"
        );
        Ok(ReputationEngine {
            registry,
            dispatcher,
        })
    }
}

impl ReputationEngine {
    pub fn builder(config: EngineConfig) -> EngineBuilder {
        EngineBuilder::new(config)
    }

    /// Build an engine entirely from configuration.
    pub fn from_config(config: EngineConfig) -> EngineResult<Self> {
        EngineBuilder::new(config).build()
    }

    /// Create a monitor; its first poll completes before this returns.
    pub async fn create_monitor(&self, config: MonitorConfig) -> EngineResult<MonitorSnapshot> {
        Ok(self.registry.create(config).await?)
    }

    pub fn stop_monitor(&self, monitor_id: &MonitorId) -> OperationResult {
        self.registry.stop(monitor_id)
    }

    pub fn remove_monitor(&self, monitor_id: &MonitorId) -> OperationResult {
        self.registry.remove(monitor_id)
    }

    pub fn get_monitor(&self, monitor_id: &MonitorId) -> Option<MonitorSnapshot> {
        self.registry.get(monitor_id)
    }

    pub fn list_monitors(&self) -> Vec<MonitorSnapshot> {
        self.registry.list()
    }

    pub fn history(&self, monitor_id: &MonitorId, query: &HistoryQuery) -> Option<Vec<DataPoint>> {
        self.registry.history(monitor_id, query)
    }

    /// Build a report on demand. `None` for unknown monitors.
    #[instrument(skip(self))]
    pub fn generate_report(
        &self,
        monitor_id: &MonitorId,
        period: ReportPeriod,
        format: ReportFormat,
    ) -> Option<ReportOutput> {
        let (snapshot, history) = self.registry.export(monitor_id)?;
        let alerts = self.dispatcher.alerts_for(monitor_id);
        let report = generate_report(&snapshot, &history, &alerts, period, Utc::now());
        Some(render(report, format))
    }

    pub fn get_alerts(&self, query: &AlertQuery) -> Vec<Alert> {
        self.dispatcher.get_alerts(query)
    }

    pub fn clear_alerts(&self) -> usize {
        self.dispatcher.clear_alerts()
    }

    /// Run one poll for a monitor immediately.
    pub async fn poll_now(&self, monitor_id: &MonitorId) -> Option<usize> {
        self.registry.poll_now(monitor_id).await
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MonitorEvent> {
        self.registry.subscribe()
    }

    pub fn subscribe_alerts(&self) -> broadcast::Receiver<Alert> {
        self.dispatcher.subscribe()
    }

    /// Stop every monitor; in-flight cycles finish first.
    pub async fn shutdown(&self) {
        self.registry.shutdown().await;
        info!("Reputation engine stopped");
    }
}

impl std::fmt::Debug for ReputationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReputationEngine")
            .field("monitors", &self.registry.len())
            .field("alerts", &self.dispatcher.len())
            .finish()
    }
}
