//! Per-cycle alert detection.
//!
//! Detection is pure: it reads the monitor (whose history already contains
//! the new batch at its tail) and the batch itself, and returns zero or more
//! alerts. Nothing here performs I/O.

use pulse_types::stats::{mean, population_std_dev};
use pulse_types::{Alert, AlertSeverity, AlertType, DataPoint, Monitor};
use serde_json::json;

use crate::config::DetectorConfig;

/// Below this a baseline is treated as having no variance at all.
const ZERO_STD_EPSILON: f64 = 1e-12;

/// Evaluates the sentiment threshold, volume spike, and anomaly checks.
#[derive(Debug, Clone, Default)]
pub struct AlertDetector {
    config: DetectorConfig,
}

impl AlertDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Run every check against the batch that was just appended.
    pub fn detect(&self, monitor: &Monitor, new_points: &[DataPoint]) -> Vec<Alert> {
        if new_points.is_empty() {
            return Vec::new();
        }

        let mut alerts = Vec::new();
        alerts.extend(self.check_sentiment(monitor, new_points));
        alerts.extend(self.check_volume(monitor, new_points));
        alerts.extend(self.check_anomaly(monitor, new_points));
        alerts
    }

    fn check_sentiment(&self, monitor: &Monitor, new_points: &[DataPoint]) -> Option<Alert> {
        let threshold = monitor.alert_config.sentiment_threshold;
        let scores: Vec<f64> = new_points.iter().map(|p| p.score).collect();
        let batch_mean = mean(&scores);
        if batch_mean >= threshold {
            return None;
        }

        let severity = if batch_mean < self.config.critical_sentiment {
            AlertSeverity::Critical
        } else {
            AlertSeverity::Warning
        };
        let negative_count = scores.iter().filter(|s| **s < 0.0).count();
        let most_negative = new_points
            .iter()
            .min_by(|a, b| a.score.total_cmp(&b.score))
            .map(|p| {
                json!({
                    "text": p.text,
                    "score": p.score,
                    "author": p.author,
                    "source_url": p.source_url,
                })
            });

        Some(Alert::new(
            AlertType::SentimentThreshold,
            severity,
            format!(
                "Sentiment for {} dropped to {:.2} (threshold {:.2})",
                monitor.target, batch_mean, threshold
            ),
            monitor.id.clone(),
            monitor.target.clone(),
            json!({
                "mean": batch_mean,
                "threshold": threshold,
                "negative_count": negative_count,
                "sample_size": new_points.len(),
                "most_negative": most_negative,
            }),
        ))
    }

    fn check_volume(&self, monitor: &Monitor, new_points: &[DataPoint]) -> Option<Alert> {
        let prior = monitor.history.len().saturating_sub(new_points.len());
        if prior < self.config.volume_min_history {
            return None;
        }

        let prior_polls = monitor.stats.total_polls.saturating_sub(1).max(1);
        let baseline = prior as f64 / prior_polls as f64;
        let multiplier = monitor.alert_config.volume_multiplier;
        let batch = new_points.len() as f64;
        if baseline <= 0.0 || batch <= baseline * multiplier {
            return None;
        }

        let ratio = batch / baseline;
        let severity = if ratio > 2.0 * multiplier {
            AlertSeverity::Critical
        } else {
            AlertSeverity::Warning
        };

        Some(Alert::new(
            AlertType::VolumeSpike,
            severity,
            format!(
                "Mention volume for {} spiked to {} ({:.1}x the per-poll baseline of {:.1})",
                monitor.target,
                new_points.len(),
                ratio,
                baseline
            ),
            monitor.id.clone(),
            monitor.target.clone(),
            json!({
                "count": new_points.len(),
                "baseline": baseline,
                "ratio": ratio,
                "multiplier": multiplier,
            }),
        ))
    }

    fn check_anomaly(&self, monitor: &Monitor, new_points: &[DataPoint]) -> Option<Alert> {
        let prior = monitor.history.len().saturating_sub(new_points.len());
        if prior < self.config.anomaly_min_history {
            return None;
        }

        let window_start = prior.saturating_sub(self.config.anomaly_window);
        let baseline: Vec<f64> = monitor
            .history
            .range(window_start, prior)
            .map(|p| p.score)
            .collect();
        let baseline_mean = mean(&baseline);
        let measured_std = population_std_dev(&baseline);
        let baseline_std = if measured_std < ZERO_STD_EPSILON {
            self.config.min_baseline_std
        } else {
            measured_std
        };

        let new_scores: Vec<f64> = new_points.iter().map(|p| p.score).collect();
        let new_mean = mean(&new_scores);
        let z_score = (new_mean - baseline_mean) / baseline_std;

        let severity = self.classify_z(z_score)?;

        Some(Alert::new(
            AlertType::Anomaly,
            severity,
            format!(
                "Anomalous sentiment shift for {}: z-score {:.2} (baseline {:.2}, now {:.2})",
                monitor.target, z_score, baseline_mean, new_mean
            ),
            monitor.id.clone(),
            monitor.target.clone(),
            json!({
                "baseline_mean": baseline_mean,
                "new_mean": new_mean,
                "z_score": z_score,
                "baseline_std": baseline_std,
            }),
        ))
    }

    /// Map a z-score to a severity, or `None` when it is within tolerance.
    pub fn classify_z(&self, z_score: f64) -> Option<AlertSeverity> {
        if z_score <= self.config.anomaly_critical_z {
            Some(AlertSeverity::Critical)
        } else if z_score < self.config.anomaly_warning_z {
            Some(AlertSeverity::Warning)
        } else {
            None
        }
    }
}
