//! Monitor registry: lifecycle operations over the set of monitors.

use std::sync::Arc;

use dashmap::DashMap;
use pulse_alerts::{AlertDetector, AlertDispatcher};
use pulse_sentiment::SentimentScorer;
use pulse_types::{
    DataPoint, HistoryQuery, Monitor, MonitorConfig, MonitorId, MonitorSnapshot, MonitorStatus,
    OperationResult,
};
use tokio::sync::broadcast;
use tracing::{info, instrument, warn};

use crate::config::PollerConfig;
use crate::error::{MonitorError, MonitorResult};
use crate::events::MonitorEvent;
use crate::poller::{spawn_schedule, CycleOutcome, MonitorEntry, PollContext};
use crate::source::MentionSource;

const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Owns every monitor and its polling schedule.
pub struct MonitorRegistry {
    monitors: DashMap<MonitorId, Arc<MonitorEntry>>,
    ctx: Arc<PollContext>,
}

impl MonitorRegistry {
    pub fn new(
        config: PollerConfig,
        source: Arc<dyn MentionSource>,
        scorer: Arc<SentimentScorer>,
        detector: AlertDetector,
        dispatcher: Arc<AlertDispatcher>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            monitors: DashMap::new(),
            ctx: Arc::new(PollContext {
                config,
                source,
                scorer,
                detector,
                dispatcher,
                events,
            }),
        }
    }

    /// Subscribe to lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<MonitorEvent> {
        self.ctx.events.subscribe()
    }

    pub fn dispatcher(&self) -> &Arc<AlertDispatcher> {
        &self.ctx.dispatcher
    }

    /// Create a monitor, run its first cycle to completion, then arm its
    /// schedule.
    ///
    /// Fails only for configuration problems: an empty target, a remote
    /// scorer mode with no remote provider configured, or a first cycle
    /// whose scorer rejects its credentials. In the last case the monitor
    /// is discarded. A failing first fetch does not fail creation; the
    /// monitor starts in backoff.
    #[instrument(skip(self, config), fields(target = %config.target))]
    pub async fn create(&self, config: MonitorConfig) -> MonitorResult<MonitorSnapshot> {
        if config.target.trim().is_empty() {
            return Err(MonitorError::Configuration("target must not be empty".into()));
        }
        self.ctx
            .scorer
            .ensure_mode(config.scorer_mode)
            .map_err(|e| MonitorError::Configuration(e.to_string()))?;

        let monitor = Monitor::with_capacity(
            config,
            self.ctx.config.default_interval_ms,
            self.ctx.config.history_capacity,
        );
        let monitor_id = monitor.id.clone();
        let target = monitor.target.clone();
        let interval_ms = monitor.poll_interval_ms;

        let entry = Arc::new(MonitorEntry::new(monitor));
        self.monitors.insert(monitor_id.clone(), entry.clone());
        info!(monitor_id = %monitor_id, interval_ms, "Monitor created");
        let _ = self.ctx.events.send(MonitorEvent::Created {
            monitor_id: monitor_id.clone(),
            target,
        });

        if let CycleOutcome::Rejected(reason) = self.ctx.run_cycle(&entry).await {
            self.monitors.remove(&monitor_id);
            let _ = self.ctx.events.send(MonitorEvent::Removed(monitor_id));
            return Err(MonitorError::Configuration(reason));
        }

        if entry.is_active() {
            spawn_schedule(self.ctx.clone(), entry.clone());
        }

        let snapshot = entry.state.read().snapshot();
        Ok(snapshot)
    }

    /// Stop polling. Idempotent; unknown ids report failure.
    #[instrument(skip(self))]
    pub fn stop(&self, monitor_id: &MonitorId) -> OperationResult {
        let Some(entry) = self.entry(monitor_id) else {
            return OperationResult::failed(format!("Monitor {monitor_id} not found"));
        };

        let was_active = {
            let mut monitor = entry.state.write();
            let was_active = monitor.is_active();
            monitor.status = MonitorStatus::Stopped;
            was_active
        };
        entry.signal_stop();

        if !was_active {
            return OperationResult::ok(format!("Monitor {monitor_id} already stopped"));
        }
        info!(monitor_id = %monitor_id, "Monitor stopped");
        let _ = self.ctx.events.send(MonitorEvent::Stopped(monitor_id.clone()));
        OperationResult::ok(format!("Monitor {monitor_id} stopped"))
    }

    /// Stop and forget a monitor. No tombstone remains.
    #[instrument(skip(self))]
    pub fn remove(&self, monitor_id: &MonitorId) -> OperationResult {
        if !self.monitors.contains_key(monitor_id) {
            return OperationResult::failed(format!("Monitor {monitor_id} not found"));
        }
        self.stop(monitor_id);
        self.monitors.remove(monitor_id);

        info!(monitor_id = %monitor_id, "Monitor removed");
        let _ = self.ctx.events.send(MonitorEvent::Removed(monitor_id.clone()));
        OperationResult::ok(format!("Monitor {monitor_id} removed"))
    }

    pub fn get(&self, monitor_id: &MonitorId) -> Option<MonitorSnapshot> {
        self.entry(monitor_id).map(|e| e.state.read().snapshot())
    }

    /// Snapshots of every monitor, oldest first.
    pub fn list(&self) -> Vec<MonitorSnapshot> {
        let mut snapshots: Vec<MonitorSnapshot> = self
            .monitors
            .iter()
            .map(|e| e.value().state.read().snapshot())
            .collect();
        snapshots.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        snapshots
    }

    pub fn history(&self, monitor_id: &MonitorId, query: &HistoryQuery) -> Option<Vec<DataPoint>> {
        self.entry(monitor_id).map(|e| e.state.read().query_history(query))
    }

    /// Snapshot plus the full history in one read, for report generation.
    pub fn export(&self, monitor_id: &MonitorId) -> Option<(MonitorSnapshot, Vec<DataPoint>)> {
        self.entry(monitor_id).map(|e| {
            let monitor = e.state.read();
            (monitor.snapshot(), monitor.history.to_vec())
        })
    }

    /// Run one cycle right away, serialised with the schedule.
    ///
    /// Returns the number of points appended, or `None` for unknown or
    /// stopped monitors and failed cycles.
    #[instrument(skip(self))]
    pub async fn poll_now(&self, monitor_id: &MonitorId) -> Option<usize> {
        let entry = self.entry(monitor_id)?;
        if !entry.is_active() {
            warn!(monitor_id = %monitor_id, "Manual poll skipped: monitor is stopped");
            return None;
        }
        match self.ctx.run_cycle(&entry).await {
            CycleOutcome::Appended(points) => Some(points),
            CycleOutcome::Failed | CycleOutcome::Rejected(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }

    /// Stop every monitor and wait for their schedules to wind down.
    /// In-flight cycles complete first.
    pub async fn shutdown(&self) {
        info!(monitors = self.monitors.len(), "Shutting down monitor registry");

        let entries: Vec<Arc<MonitorEntry>> =
            self.monitors.iter().map(|e| e.value().clone()).collect();
        for entry in &entries {
            self.stop(&entry.id());
        }
        for entry in entries {
            if let Some(handle) = entry.take_task() {
                if let Err(e) = handle.await {
                    warn!(error = %e, "Schedule task ended abnormally");
                }
            }
        }
    }

    fn entry(&self, monitor_id: &MonitorId) -> Option<Arc<MonitorEntry>> {
        self.monitors.get(monitor_id).map(|e| e.value().clone())
    }
}

impl Drop for MonitorRegistry {
    fn drop(&mut self) {
        for item in self.monitors.iter() {
            item.value().abort();
        }
    }
}

impl std::fmt::Debug for MonitorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitorRegistry")
            .field("monitors", &self.monitors.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingMentionSource, ScriptedMentionSource};
    use pulse_alerts::{AlertQuery, DetectorConfig, DispatcherConfig};
    use async_trait::async_trait;
    use pulse_sentiment::{SentimentError, SentimentProvider, SentimentResult, SentimentScore};
    use pulse_types::{AlertType, ScorerMode};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn registry_with(source: Arc<dyn MentionSource>, config: PollerConfig) -> MonitorRegistry {
        MonitorRegistry::new(
            config,
            source,
            Arc::new(SentimentScorer::default()),
            AlertDetector::new(DetectorConfig::default()),
            Arc::new(AlertDispatcher::new(&DispatcherConfig::default()).unwrap()),
        )
    }

    fn fast_config() -> PollerConfig {
        PollerConfig {
            default_interval_ms: 1_000,
            ..PollerConfig::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn create_runs_first_cycle_before_returning() {
        let source =
            Arc::new(ScriptedMentionSource::new().then_texts(&["great product", "love it"]));
        let registry = registry_with(source.clone(), fast_config());

        let snapshot = registry.create(MonitorConfig::new("@acme")).await.unwrap();

        assert_eq!(snapshot.history_len, 2);
        assert_eq!(snapshot.stats.total_polls, 1);
        assert!(snapshot.last_polled_at.is_some());
        assert!(snapshot.stats.rolling_average > 0.0);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn empty_target_is_rejected() {
        let registry = registry_with(Arc::new(ScriptedMentionSource::new()), fast_config());
        let err = registry.create(MonitorConfig::new("   ")).await.unwrap_err();
        assert!(matches!(err, MonitorError::Configuration(_)));
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn remote_mode_without_provider_is_rejected() {
        let registry = registry_with(Arc::new(ScriptedMentionSource::new()), fast_config());
        let err = registry
            .create(MonitorConfig::new("@acme").with_scorer_mode(ScorerMode::Remote))
            .await
            .unwrap_err();
        assert!(matches!(err, MonitorError::Configuration(_)));
        assert!(registry.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn schedule_fires_after_interval() {
        let source = Arc::new(
            ScriptedMentionSource::new()
                .then_texts(&["good", "nice"])
                .then_texts(&["excellent"]),
        );
        let registry = registry_with(source.clone(), fast_config());
        let snapshot = registry.create(MonitorConfig::new("@acme")).await.unwrap();

        tokio::time::sleep(Duration::from_millis(1_500)).await;

        let snapshot = registry.get(&snapshot.id).unwrap();
        assert_eq!(snapshot.history_len, 3);
        assert_eq!(snapshot.stats.total_polls, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_fetch_counts_as_poll() {
        let registry = registry_with(Arc::new(ScriptedMentionSource::new()), fast_config());
        let snapshot = registry.create(MonitorConfig::new("@acme")).await.unwrap();
        assert_eq!(snapshot.history_len, 0);
        assert_eq!(snapshot.stats.total_polls, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failures_back_off_and_keep_running() {
        let source = Arc::new(FailingMentionSource::new());
        let config = PollerConfig {
            default_interval_ms: 1_000,
            max_backoff_ms: 3_000,
            ..PollerConfig::default()
        };
        let registry = registry_with(source.clone(), config);
        let snapshot = registry.create(MonitorConfig::new("@acme")).await.unwrap();

        assert_eq!(snapshot.status, MonitorStatus::Active);
        assert_eq!(snapshot.consecutive_failures, 1);
        assert_eq!(snapshot.current_interval_ms, 2_000);

        // Next firing at t=2000 fails again and hits the ceiling.
        tokio::time::sleep(Duration::from_millis(2_500)).await;
        let snapshot = registry.get(&snapshot.id).unwrap();
        assert_eq!(snapshot.consecutive_failures, 2);
        assert_eq!(snapshot.current_interval_ms, 3_000);
        assert_eq!(snapshot.poll_interval_ms, 1_000);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn success_restores_interval_and_failure_keeps_history() {
        let source = Arc::new(
            ScriptedMentionSource::new()
                .then_texts(&["good", "bad"])
                .then_fail("timeout")
                .then_texts(&["fine"]),
        );
        let registry = registry_with(source.clone(), fast_config());
        let snapshot = registry.create(MonitorConfig::new("@acme")).await.unwrap();
        let id = snapshot.id;

        assert_eq!(registry.poll_now(&id).await, None);
        let failed = registry.get(&id).unwrap();
        assert_eq!(failed.history_len, 2);
        assert_eq!(failed.current_interval_ms, 2_000);

        assert_eq!(registry.poll_now(&id).await, Some(1));
        let recovered = registry.get(&id).unwrap();
        assert_eq!(recovered.history_len, 3);
        assert_eq!(recovered.current_interval_ms, 1_000);
        assert_eq!(recovered.consecutive_failures, 0);
    }

    /// Accepts the first `allowed` texts, then rejects its credentials.
    struct RevokedProvider {
        allowed: usize,
        calls: AtomicUsize,
    }

    impl RevokedProvider {
        fn after(allowed: usize) -> Self {
            Self {
                allowed,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SentimentProvider for RevokedProvider {
        fn name(&self) -> &str {
            "revoked"
        }

        async fn score(&self, _text: &str) -> SentimentResult<SentimentScore> {
            if self.calls.fetch_add(1, Ordering::SeqCst) < self.allowed {
                Ok(SentimentScore::neutral())
            } else {
                Err(SentimentError::Configuration("401 Unauthorized".into()))
            }
        }
    }

    fn remote_registry(source: Arc<dyn MentionSource>, provider: RevokedProvider) -> MonitorRegistry {
        MonitorRegistry::new(
            fast_config(),
            source,
            Arc::new(SentimentScorer::default().with_remote(Arc::new(provider))),
            AlertDetector::new(DetectorConfig::default()),
            Arc::new(AlertDispatcher::new(&DispatcherConfig::default()).unwrap()),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_credentials_fail_creation() {
        let source = Arc::new(ScriptedMentionSource::new().then_texts(&["good"]));
        let registry = remote_registry(source.clone(), RevokedProvider::after(0));

        let err = registry
            .create(MonitorConfig::new("@acme").with_scorer_mode(ScorerMode::Remote))
            .await
            .unwrap_err();
        assert!(matches!(err, MonitorError::Configuration(ref reason) if reason.contains("401")));
        assert!(registry.is_empty());

        tokio::time::sleep(Duration::from_millis(10_000)).await;
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn revoked_credentials_stop_the_schedule() {
        let source = Arc::new(ScriptedMentionSource::new().then_texts(&["good"]));
        let registry = remote_registry(source.clone(), RevokedProvider::after(1));
        let id = registry
            .create(MonitorConfig::new("@acme").with_scorer_mode(ScorerMode::Remote))
            .await
            .unwrap()
            .id;

        source.push_texts(&["bad"]);
        tokio::time::sleep(Duration::from_millis(1_500)).await;

        let snapshot = registry.get(&id).unwrap();
        assert_eq!(snapshot.status, MonitorStatus::Stopped);
        assert_eq!(snapshot.history_len, 1);
        assert_eq!(snapshot.consecutive_failures, 0);
        assert_eq!(snapshot.current_interval_ms, 1_000);

        tokio::time::sleep(Duration::from_millis(10_000)).await;
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_schedule_and_is_idempotent() {
        let source = Arc::new(ScriptedMentionSource::new());
        let registry = registry_with(source.clone(), fast_config());
        let id = registry.create(MonitorConfig::new("@acme")).await.unwrap().id;

        let result = registry.stop(&id);
        assert!(result.success);
        assert!(registry.stop(&id).success);

        tokio::time::sleep(Duration::from_millis(5_000)).await;
        assert_eq!(source.calls(), 1);

        let snapshot = registry.get(&id).unwrap();
        assert_eq!(snapshot.status, MonitorStatus::Stopped);
        assert_eq!(registry.poll_now(&id).await, None);
    }

    #[tokio::test]
    async fn unknown_ids_report_failure() {
        let registry = registry_with(Arc::new(ScriptedMentionSource::new()), fast_config());
        let id = MonitorId::generate();

        assert!(!registry.stop(&id).success);
        assert!(!registry.remove(&id).success);
        assert!(registry.get(&id).is_none());
        assert!(registry.history(&id, &HistoryQuery::default()).is_none());
        assert_eq!(registry.poll_now(&id).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn remove_purges_monitor() {
        let registry = registry_with(Arc::new(ScriptedMentionSource::new()), fast_config());
        let id = registry.create(MonitorConfig::new("@acme")).await.unwrap().id;

        assert!(registry.remove(&id).success);
        assert!(registry.get(&id).is_none());
        assert!(registry.list().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn reads_have_no_side_effects() {
        let source = Arc::new(ScriptedMentionSource::new().then_texts(&["good"]));
        let registry = registry_with(source, fast_config());
        registry.create(MonitorConfig::new("@acme")).await.unwrap();
        registry.create(MonitorConfig::new("@globex")).await.unwrap();

        let first = registry.list();
        let second = registry.list();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(registry.get(&first[0].id), registry.get(&first[0].id));
    }

    #[tokio::test(start_paused = true)]
    async fn history_query_returns_filtered_tail() {
        let source = Arc::new(ScriptedMentionSource::new().then_texts(&["a1", "b2", "c3", "d4"]));
        let registry = registry_with(source, fast_config());
        let id = registry.create(MonitorConfig::new("@acme")).await.unwrap().id;

        let tail = registry.history(&id, &HistoryQuery::limit(2)).unwrap();
        let texts: Vec<&str> = tail.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["c3", "d4"]);
    }

    #[tokio::test(start_paused = true)]
    async fn cycles_never_overlap() {
        let source = Arc::new(
            ScriptedMentionSource::new()
                .then_texts(&["good"])
                .with_delay(Duration::from_millis(400)),
        );
        let registry = registry_with(
            source.clone(),
            PollerConfig {
                default_interval_ms: 100,
                ..PollerConfig::default()
            },
        );
        let id = registry.create(MonitorConfig::new("@acme")).await.unwrap().id;

        let (a, b) = tokio::join!(registry.poll_now(&id), registry.poll_now(&id));
        assert_eq!((a, b), (Some(0), Some(0)));
        tokio::time::sleep(Duration::from_millis(1_000)).await;

        assert!(source.calls() >= 4);
        assert_eq!(source.max_concurrent(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn negative_batch_dispatches_alert() {
        let source = Arc::new(
            ScriptedMentionSource::new().then_texts(&["terrible awful", "horrible", "bad"]),
        );
        let registry = registry_with(source, fast_config());
        let id = registry.create(MonitorConfig::new("@acme")).await.unwrap().id;

        let alerts = registry
            .dispatcher()
            .get_alerts(&AlertQuery::for_monitor(id.clone()));
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].alert_type, AlertType::SentimentThreshold);
        assert_eq!(alerts[0].monitor_id, id);
    }

    #[tokio::test(start_paused = true)]
    async fn lifecycle_events_are_broadcast() {
        let registry = registry_with(
            Arc::new(ScriptedMentionSource::new().then_texts(&["good"])),
            fast_config(),
        );
        let mut rx = registry.subscribe();
        let id = registry.create(MonitorConfig::new("@acme")).await.unwrap().id;
        registry.stop(&id);

        assert!(matches!(rx.recv().await.unwrap(), MonitorEvent::Created { .. }));
        assert!(matches!(
            rx.recv().await.unwrap(),
            MonitorEvent::Polled { new_points: 1, .. }
        ));
        assert_eq!(rx.recv().await.unwrap(), MonitorEvent::Stopped(id));
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_every_monitor() {
        let source = Arc::new(ScriptedMentionSource::new());
        let registry = registry_with(source.clone(), fast_config());
        registry.create(MonitorConfig::new("@acme")).await.unwrap();
        registry.create(MonitorConfig::new("@globex")).await.unwrap();

        registry.shutdown().await;
        tokio::time::sleep(Duration::from_millis(5_000)).await;

        assert_eq!(source.calls(), 2);
        assert!(registry
            .list()
            .iter()
            .all(|m| m.status == MonitorStatus::Stopped));
    }
}
