//! The poll cycle and the per-monitor schedule.
//!
//! Each monitor owns one task that sleeps for the monitor's current
//! interval, runs a cycle to completion, and only then sleeps again. Cycles
//! for a monitor are serialised through its cycle lock, which manual polls
//! share, so two cycles never overlap for the same monitor.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use pulse_alerts::{AlertDetector, AlertDispatcher};
use pulse_sentiment::SentimentScorer;
use pulse_types::{DataPoint, Monitor, MonitorId, MonitorStatus, RawMention, ScorerMode};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::config::PollerConfig;
use crate::error::MonitorResult;
use crate::events::MonitorEvent;
use crate::source::MentionSource;
use crate::stats::refresh_stats;

/// Collaborators shared by every monitor's cycle.
pub(crate) struct PollContext {
    pub(crate) config: PollerConfig,
    pub(crate) source: Arc<dyn MentionSource>,
    pub(crate) scorer: Arc<SentimentScorer>,
    pub(crate) detector: AlertDetector,
    pub(crate) dispatcher: Arc<AlertDispatcher>,
    pub(crate) events: broadcast::Sender<MonitorEvent>,
}

/// Outcome of one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CycleOutcome {
    /// The cycle completed; carries the number of new points.
    Appended(usize),
    /// Transient failure; the monitor backs off.
    Failed,
    /// Configuration failure; the monitor has been stopped.
    Rejected(String),
}

/// Registry slot for one monitor.
pub(crate) struct MonitorEntry {
    /// Monitor state, including its history.
    pub(crate) state: RwLock<Monitor>,
    /// Held for the whole of a cycle.
    cycle_lock: tokio::sync::Mutex<()>,
    /// Flipped to `true` to cancel the schedule.
    stop_tx: watch::Sender<bool>,
    /// The schedule task, once armed.
    task: Mutex<Option<JoinHandle<()>>>,
}

impl MonitorEntry {
    pub(crate) fn new(monitor: Monitor) -> Self {
        let (stop_tx, _) = watch::channel(false);
        Self {
            state: RwLock::new(monitor),
            cycle_lock: tokio::sync::Mutex::new(()),
            stop_tx,
            task: Mutex::new(None),
        }
    }

    pub(crate) fn id(&self) -> MonitorId {
        self.state.read().id.clone()
    }

    pub(crate) fn is_active(&self) -> bool {
        self.state.read().is_active()
    }

    /// Cancel the pending schedule. An in-flight cycle is left to finish.
    pub(crate) fn signal_stop(&self) {
        self.stop_tx.send_replace(true);
    }

    pub(crate) fn take_task(&self) -> Option<JoinHandle<()>> {
        self.task.lock().take()
    }

    pub(crate) fn abort(&self) {
        if let Some(handle) = self.task.lock().take() {
            handle.abort();
        }
    }
}

impl PollContext {
    fn emit(&self, event: MonitorEvent) {
        let _ = self.events.send(event);
    }

    /// Run one cycle for `entry`, waiting for any cycle already in flight.
    pub(crate) async fn run_cycle(&self, entry: &MonitorEntry) -> CycleOutcome {
        let _guard = entry.cycle_lock.lock().await;

        let (monitor_id, target, source_type, mode) = {
            let mut monitor = entry.state.write();
            monitor.stats.total_polls += 1;
            monitor.last_polled_at = Some(Utc::now());
            (
                monitor.id.clone(),
                monitor.target.clone(),
                monitor.source_type,
                monitor.scorer_mode,
            )
        };

        let points = match self.fetch_and_score(&target, source_type, mode).await {
            Ok(points) => points,
            Err(e) => {
                if let Some(reason) = e.configuration_reason() {
                    entry.state.write().status = MonitorStatus::Stopped;
                    entry.signal_stop();
                    error!(
                        monitor_id = %monitor_id,
                        target = %target,
                        error = %e,
                        "Poll cycle rejected by configuration, stopping monitor"
                    );
                    self.emit(MonitorEvent::Stopped(monitor_id));
                    return CycleOutcome::Rejected(reason.to_string());
                }

                let next_interval_ms = {
                    let mut monitor = entry.state.write();
                    monitor.consecutive_failures += 1;
                    monitor.current_interval_ms = self
                        .config
                        .backoff(monitor.current_interval_ms, monitor.poll_interval_ms);
                    monitor.current_interval_ms
                };
                error!(
                    monitor_id = %monitor_id,
                    target = %target,
                    error = %e,
                    next_interval_ms,
                    "Poll cycle failed, backing off"
                );
                self.emit(MonitorEvent::PollFailed {
                    monitor_id,
                    error: e.to_string(),
                    next_interval_ms,
                });
                return CycleOutcome::Failed;
            }
        };

        let (alerts, alert_config) = {
            let mut monitor = entry.state.write();
            monitor.consecutive_failures = 0;
            monitor.current_interval_ms = monitor.poll_interval_ms;

            if points.is_empty() {
                (Vec::new(), monitor.alert_config.clone())
            } else {
                let evicted = monitor.history.extend(points.iter().cloned());
                refresh_stats(&mut monitor, self.config.stats_window);
                debug!(
                    monitor_id = %monitor_id,
                    appended = points.len(),
                    evicted,
                    rolling_average = monitor.stats.rolling_average,
                    "History updated"
                );
                (
                    self.detector.detect(&monitor, &points),
                    monitor.alert_config.clone(),
                )
            }
        };

        let alert_count = alerts.len();
        self.dispatcher.dispatch_all(alerts, &alert_config);

        self.emit(MonitorEvent::Polled {
            monitor_id,
            new_points: points.len(),
            alerts: alert_count,
        });
        CycleOutcome::Appended(points.len())
    }

    async fn fetch_and_score(
        &self,
        target: &str,
        source_type: pulse_types::SourceType,
        mode: ScorerMode,
    ) -> MonitorResult<Vec<DataPoint>> {
        let mentions = self.source.fetch(target, source_type).await?;
        if mentions.is_empty() {
            return Ok(Vec::new());
        }

        let scored = {
            let texts: Vec<&str> = mentions.iter().map(|m| m.text.as_str()).collect();
            self.scorer.score_batch(&texts, mode).await?
        };

        Ok(mentions
            .into_iter()
            .zip(scored)
            .map(|(mention, scored)| to_point(mention, scored.text, scored.result))
            .collect())
    }
}

fn to_point(
    mention: RawMention,
    text: String,
    result: pulse_sentiment::SentimentScore,
) -> DataPoint {
    DataPoint::new(
        mention.timestamp,
        result.score,
        result.label,
        text,
        result.keywords,
    )
    .with_author(mention.author)
    .with_source_url(mention.url)
}

/// Arm the recurring schedule for `entry`.
pub(crate) fn spawn_schedule(ctx: Arc<PollContext>, entry: Arc<MonitorEntry>) {
    let mut stop_rx = entry.stop_tx.subscribe();
    let task_entry = entry.clone();

    let handle = tokio::spawn(async move {
        let entry = task_entry;
        loop {
            if *stop_rx.borrow() || !entry.is_active() {
                break;
            }
            let interval = entry.state.read().current_interval_ms;

            tokio::select! {
                _ = tokio::time::sleep(Duration::from_millis(interval)) => {}
                changed = stop_rx.changed() => {
                    if changed.is_err() || *stop_rx.borrow() {
                        break;
                    }
                    continue;
                }
            }

            if !entry.is_active() {
                break;
            }
            ctx.run_cycle(&entry).await;
        }
        info!(monitor_id = %entry.id(), "Schedule ended");
    });

    *entry.task.lock() = Some(handle);
}
