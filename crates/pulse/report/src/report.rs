//! Structured report model and generation.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, TimeZone, Utc};
use pulse_sentiment::{aggregate, LabelDistribution};
use pulse_types::{
    Alert, DataPoint, MonitorId, MonitorSnapshot, SentimentLabel, SourceType, Trend,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::period::{Granularity, ReportPeriod};

/// Entries in each of the top positive / top negative lists.
pub const TOP_EXCERPTS: usize = 5;

/// Most recent alerts listed in a report.
pub const RECENT_ALERTS: usize = 10;

/// A generated report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Report {
    /// Nothing in the period.
    NoData(EmptyReport),
    Complete(Box<SentimentReport>),
}

impl Report {
    pub fn has_data(&self) -> bool {
        matches!(self, Report::Complete(_))
    }

    pub fn total_mentions(&self) -> usize {
        match self {
            Report::NoData(_) => 0,
            Report::Complete(report) => report.summary.total_mentions,
        }
    }

    pub fn target(&self) -> &str {
        match self {
            Report::NoData(report) => &report.target,
            Report::Complete(report) => &report.target,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmptyReport {
    pub monitor_id: MonitorId,
    pub target: String,
    pub period: ReportPeriod,
    pub generated_at: DateTime<Utc>,
    pub message: String,
}

/// Report over a period that contains at least one data point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentReport {
    /// Monitor the report covers.
    pub monitor_id: MonitorId,
    /// Tracked handle or keyword.
    pub target: String,
    /// Kind of mentions the monitor polls.
    pub source_type: SourceType,
    /// Requested reporting window.
    pub period: ReportPeriod,
    /// When the report was built.
    pub generated_at: DateTime<Utc>,
    /// Start of the window; absent for `all`.
    pub since: Option<DateTime<Utc>>,
    /// Aggregate figures over the in-window points.
    pub summary: ReportSummary,
    /// Most positive mentions, highest score first.
    pub top_positive: Vec<ReportExcerpt>,
    /// Most negative mentions, lowest score first.
    pub top_negative: Vec<ReportExcerpt>,
    /// Bucket width used by `timeline`.
    pub granularity: Granularity,
    /// Per-bucket averages in chronological order.
    pub timeline: Vec<TimelineBucket>,
    /// Keyword frequencies, most frequent first.
    pub keywords: Vec<KeywordCount>,
    /// Alerts raised for the monitor inside the window.
    pub alerts: AlertSummary,
}

/// Aggregate figures for a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Data points inside the window.
    pub total_mentions: usize,
    /// Mean score of those points.
    pub average_score: f64,
    /// Median score of those points.
    pub median_score: f64,
    /// Positive / negative / neutral counts.
    pub distribution: LabelDistribution,
    /// First-half versus second-half direction.
    pub trend: Trend,
    /// Monitor's live rolling average at generation time.
    pub rolling_average: f64,
    /// Monitor's live volatility at generation time.
    pub volatility: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportExcerpt {
    pub text: String,
    pub score: f64,
    pub label: SentimentLabel,
    pub author: Option<String>,
    pub source_url: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl From<&DataPoint> for ReportExcerpt {
    fn from(point: &DataPoint) -> Self {
        Self {
            text: point.text.clone(),
            score: point.score,
            label: point.label,
            author: point.author.clone(),
            source_url: point.source_url.clone(),
            timestamp: point.timestamp,
        }
    }
}

/// One hour or day of the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineBucket {
    /// Start of the bucket, aligned to its granularity.
    pub start: DateTime<Utc>,
    /// Mean score of the points in the bucket.
    pub average_score: f64,
    /// Number of points in the bucket.
    pub count: usize,
}

/// How often a keyword appeared across the window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    /// The keyword, `not_`-prefixed when negated.
    pub keyword: String,
    /// Occurrences across in-window points.
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertSummary {
    /// Alerts for this monitor inside the period.
    pub count: usize,
    /// Newest first.
    pub recent: Vec<Alert>,
}

/// Build a report for `monitor` over `period` ending at `now`.
///
/// `history` is the monitor's history in append order; `alerts` may be the
/// global alert log, it is filtered to this monitor here.
pub fn generate_report(
    monitor: &MonitorSnapshot,
    history: &[DataPoint],
    alerts: &[Alert],
    period: ReportPeriod,
    now: DateTime<Utc>,
) -> Report {
    let points: Vec<&DataPoint> = history
        .iter()
        .filter(|p| period.contains(p.timestamp, now))
        .collect();

    if points.is_empty() {
        return Report::NoData(EmptyReport {
            monitor_id: monitor.id.clone(),
            target: monitor.target.clone(),
            period,
            generated_at: now,
            message: format!("No mentions recorded for {} in period {}", monitor.target, period),
        });
    }

    let stats = aggregate(points.iter().copied());
    let summary = ReportSummary {
        total_mentions: points.len(),
        average_score: stats.mean,
        median_score: stats.median,
        distribution: stats.distribution,
        trend: stats.trend,
        rolling_average: monitor.stats.rolling_average,
        volatility: monitor.stats.volatility,
    };

    let granularity = period.granularity();
    let report = SentimentReport {
        monitor_id: monitor.id.clone(),
        target: monitor.target.clone(),
        source_type: monitor.source_type,
        period,
        generated_at: now,
        since: period.since(now),
        summary,
        top_positive: top_excerpts(&points, SentimentLabel::Positive),
        top_negative: top_excerpts(&points, SentimentLabel::Negative),
        granularity,
        timeline: timeline(&points, granularity),
        keywords: keyword_table(&points),
        alerts: alert_summary(monitor, alerts, period, now),
    };

    debug!(
        monitor_id = %monitor.id,
        period = %period,
        mentions = report.summary.total_mentions,
        "Report generated"
    );
    Report::Complete(Box::new(report))
}

/// Strongest points with `label`: highest scores for positive, lowest for
/// negative.
fn top_excerpts(points: &[&DataPoint], label: SentimentLabel) -> Vec<ReportExcerpt> {
    let mut matching: Vec<&DataPoint> =
        points.iter().copied().filter(|p| p.label == label).collect();
    match label {
        SentimentLabel::Negative => matching.sort_by(|a, b| a.score.total_cmp(&b.score)),
        _ => matching.sort_by(|a, b| b.score.total_cmp(&a.score)),
    }
    matching
        .into_iter()
        .take(TOP_EXCERPTS)
        .map(ReportExcerpt::from)
        .collect()
}

fn timeline(points: &[&DataPoint], granularity: Granularity) -> Vec<TimelineBucket> {
    let width = granularity.seconds();
    let mut buckets: BTreeMap<i64, (f64, usize)> = BTreeMap::new();
    for point in points {
        let secs = point.timestamp.timestamp();
        let start = secs - secs.rem_euclid(width);
        let slot = buckets.entry(start).or_insert((0.0, 0));
        slot.0 += point.score;
        slot.1 += 1;
    }

    buckets
        .into_iter()
        .filter_map(|(start, (sum, count))| {
            Utc.timestamp_opt(start, 0).single().map(|start| TimelineBucket {
                start,
                average_score: sum / count as f64,
                count,
            })
        })
        .collect()
}

/// Keyword frequencies, most frequent first; ties sort alphabetically.
fn keyword_table(points: &[&DataPoint]) -> Vec<KeywordCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for point in points {
        for keyword in &point.keywords {
            *counts.entry(keyword.as_str()).or_default() += 1;
        }
    }

    let mut table: Vec<KeywordCount> = counts
        .into_iter()
        .map(|(keyword, count)| KeywordCount {
            keyword: keyword.to_string(),
            count,
        })
        .collect();
    table.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.keyword.cmp(&b.keyword)));
    table
}

fn alert_summary(
    monitor: &MonitorSnapshot,
    alerts: &[Alert],
    period: ReportPeriod,
    now: DateTime<Utc>,
) -> AlertSummary {
    let mut in_period: Vec<&Alert> = alerts
        .iter()
        .filter(|a| a.monitor_id == monitor.id && period.contains(a.timestamp, now))
        .collect();
    in_period.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    AlertSummary {
        count: in_period.len(),
        recent: in_period.into_iter().take(RECENT_ALERTS).cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pulse_types::{AlertSeverity, AlertType, Monitor, MonitorConfig};
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
    }

    fn point(ts: DateTime<Utc>, score: f64, keywords: &[&str]) -> DataPoint {
        DataPoint::new(
            ts,
            score,
            SentimentLabel::from_score(score),
            format!("mention scoring {score}"),
            keywords.iter().map(|k| k.to_string()).collect(),
        )
    }

    fn snapshot() -> MonitorSnapshot {
        Monitor::new(MonitorConfig::new("@acme")).snapshot()
    }

    fn alert_at(monitor_id: &MonitorId, ts: DateTime<Utc>) -> Alert {
        let mut alert = Alert::new(
            AlertType::SentimentThreshold,
            AlertSeverity::Warning,
            "drop",
            monitor_id.clone(),
            "@acme",
            json!({}),
        );
        alert.timestamp = ts;
        alert
    }

    #[test]
    fn empty_history_yields_no_data() {
        let report = generate_report(&snapshot(), &[], &[], ReportPeriod::All, now());
        assert!(!report.has_data());
        assert_eq!(report.total_mentions(), 0);

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["kind"], "no_data");
        assert_eq!(value["period"], "all");
    }

    #[test]
    fn history_outside_period_yields_no_data() {
        let history = vec![point(now() - Duration::days(40), 0.5, &[])];
        let report = generate_report(&snapshot(), &history, &[], ReportPeriod::Month, now());
        assert!(!report.has_data());
    }

    #[test]
    fn week_period_filters_points_and_timeline() {
        let history = vec![
            point(now() - Duration::days(10), -0.9, &[]),
            point(now() - Duration::days(2), 0.4, &[]),
            point(now() - Duration::days(2) + Duration::hours(1), 0.2, &[]),
            point(now() - Duration::hours(3), -0.2, &[]),
        ];
        let Report::Complete(report) =
            generate_report(&snapshot(), &history, &[], ReportPeriod::Week, now())
        else {
            panic!("expected data");
        };

        assert_eq!(report.summary.total_mentions, 3);
        assert_eq!(report.granularity, Granularity::Day);
        assert_eq!(report.timeline.len(), 2);
        assert_eq!(report.timeline.iter().map(|b| b.count).sum::<usize>(), 3);
        assert!(report.timeline[0].start < report.timeline[1].start);
        assert!((report.timeline[0].average_score - 0.3).abs() < 1e-9);
        assert_eq!(report.since, Some(now() - Duration::days(7)));
    }

    #[test]
    fn day_period_buckets_by_hour() {
        let base = Utc.with_ymd_and_hms(2024, 5, 10, 9, 0, 0).unwrap();
        let history = vec![
            point(base + Duration::minutes(15), 0.5, &[]),
            point(base + Duration::minutes(45), 0.1, &[]),
            point(base + Duration::minutes(65), -0.5, &[]),
        ];
        let Report::Complete(report) =
            generate_report(&snapshot(), &history, &[], ReportPeriod::Day, now())
        else {
            panic!("expected data");
        };

        let counts: Vec<usize> = report.timeline.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 1]);
        assert_eq!(report.timeline[0].start, base);
        assert_eq!(report.timeline[1].start, base + Duration::hours(1));
    }

    #[test]
    fn top_lists_are_capped_and_ordered() {
        let ts = now() - Duration::hours(1);
        let mut history: Vec<DataPoint> =
            (1..=7).map(|i| point(ts, i as f64 / 10.0, &[])).collect();
        history.push(point(ts, -0.3, &[]));
        history.push(point(ts, -0.8, &[]));
        history.push(point(ts, 0.0, &[]));

        let Report::Complete(report) =
            generate_report(&snapshot(), &history, &[], ReportPeriod::All, now())
        else {
            panic!("expected data");
        };

        assert_eq!(report.top_positive.len(), TOP_EXCERPTS);
        assert_eq!(report.top_positive[0].score, 0.7);
        assert_eq!(report.top_negative.len(), 2);
        assert_eq!(report.top_negative[0].score, -0.8);
        assert_eq!(report.summary.distribution.neutral, 1);
    }

    #[test]
    fn keywords_descend_by_count() {
        let ts = now() - Duration::hours(1);
        let history = vec![
            point(ts, 0.5, &["great", "fast"]),
            point(ts, 0.6, &["great"]),
            point(ts, -0.5, &["not_good", "fast", "great"]),
        ];
        let Report::Complete(report) =
            generate_report(&snapshot(), &history, &[], ReportPeriod::All, now())
        else {
            panic!("expected data");
        };

        let table: Vec<(&str, usize)> = report
            .keywords
            .iter()
            .map(|k| (k.keyword.as_str(), k.count))
            .collect();
        assert_eq!(table, vec![("great", 3), ("fast", 2), ("not_good", 1)]);
    }

    #[test]
    fn alerts_limited_to_monitor_and_period() {
        let monitor = snapshot();
        let other = MonitorId::generate();
        let mut alerts: Vec<Alert> = (0..12)
            .map(|i| alert_at(&monitor.id, now() - Duration::hours(12 - i)))
            .collect();
        alerts.push(alert_at(&monitor.id, now() - Duration::days(3)));
        alerts.push(alert_at(&other, now() - Duration::hours(1)));

        let history = vec![point(now() - Duration::hours(1), -0.5, &[])];
        let Report::Complete(report) =
            generate_report(&monitor, &history, &alerts, ReportPeriod::Day, now())
        else {
            panic!("expected data");
        };

        assert_eq!(report.alerts.count, 12);
        assert_eq!(report.alerts.recent.len(), RECENT_ALERTS);
        assert_eq!(report.alerts.recent[0].timestamp, now() - Duration::hours(1));
    }
}
