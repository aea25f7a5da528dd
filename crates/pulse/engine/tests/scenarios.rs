//! End-to-end behaviour of the engine with in-memory collaborators.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use pulse_alerts::RecordingTransport;
use pulse_engine::{
    AlertQuery, AlertSeverity, AlertType, EngineConfig, EngineError, HistoryQuery,
    MonitorConfig, MonitorId, Report, ReportFormat, ReportPeriod, ReputationEngine, ScorerMode,
};
use pulse_monitor::testing::ScriptedMentionSource;
use pulse_monitor::MonitorError;
use pulse_sentiment::{
    CompletionTransport, LocalScorer, RemoteScorer, SentimentError, SentimentLabel,
    SentimentProvider, SentimentResult, SentimentScore,
};
use pulse_types::RawMention;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Scores a mention with the number its text starts with.
struct ScoreFromText;

#[async_trait]
impl SentimentProvider for ScoreFromText {
    fn name(&self) -> &str {
        "score-from-text"
    }

    async fn score(&self, text: &str) -> SentimentResult<SentimentScore> {
        let score: f64 = text
            .split_whitespace()
            .next()
            .and_then(|token| token.parse().ok())
            .unwrap_or(0.0);
        Ok(SentimentScore {
            score,
            label: SentimentLabel::from_score(score),
            confidence: 1.0,
            keywords: vec![],
        })
    }
}

fn engine_with(source: Arc<ScriptedMentionSource>) -> ReputationEngine {
    ReputationEngine::builder(EngineConfig::development())
        .mention_source(source)
        .remote_provider(Arc::new(ScoreFromText))
        .build()
        .unwrap()
}

fn scored(target: &str) -> MonitorConfig {
    MonitorConfig::new(target).with_scorer_mode(ScorerMode::Remote)
}

fn scores(values: &[f64]) -> Vec<RawMention> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| RawMention::new(format!("{v} mention {i}")))
        .collect()
}

#[tokio::test(start_paused = true)]
async fn first_negative_poll_raises_one_warning() {
    let source = Arc::new(
        ScriptedMentionSource::new().then_mentions(scores(&[-0.5, -0.4, -0.6, -0.5, -0.5])),
    );
    let engine = engine_with(source);

    let monitor = engine.create_monitor(scored("@acme")).await.unwrap();
    assert_eq!(monitor.history_len, 5);

    let alerts = engine.get_alerts(&AlertQuery::for_monitor(monitor.id.clone()));
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].alert_type, AlertType::SentimentThreshold);
    assert_eq!(alerts[0].severity, AlertSeverity::Warning);
    assert_eq!(alerts[0].target, "@acme");
}

#[tokio::test]
async fn stop_on_unknown_id_reports_failure() {
    let engine = engine_with(Arc::new(ScriptedMentionSource::new()));
    let result = engine.stop_monitor(&MonitorId::generate());
    assert!(!result.success);
    assert!(!result.message.is_empty());
}

#[tokio::test(start_paused = true)]
async fn report_on_empty_history_is_no_data() {
    let engine = engine_with(Arc::new(ScriptedMentionSource::new()));
    let monitor = engine.create_monitor(scored("@acme")).await.unwrap();

    let output = engine
        .generate_report(&monitor.id, ReportPeriod::All, ReportFormat::Data)
        .unwrap();
    let report = output.as_data().unwrap();
    assert!(matches!(report, Report::NoData(_)));

    let document = engine
        .generate_report(&monitor.id, ReportPeriod::All, ReportFormat::Document)
        .unwrap();
    assert!(document.as_document().unwrap().contains("@acme"));
}

#[tokio::test(start_paused = true)]
async fn week_report_only_counts_points_in_window() {
    let now = Utc::now();
    let mentions = vec![
        RawMention::new("0.4 old news").at(now - chrono::Duration::days(10)),
        RawMention::new("0.6 yesterday").at(now - chrono::Duration::days(1)),
        RawMention::new("-0.2 this morning").at(now - chrono::Duration::hours(2)),
    ];
    let engine = engine_with(Arc::new(ScriptedMentionSource::new().then_mentions(mentions)));
    let monitor = engine.create_monitor(scored("@acme")).await.unwrap();

    let output = engine
        .generate_report(&monitor.id, ReportPeriod::Week, ReportFormat::Data)
        .unwrap();
    let Some(Report::Complete(report)) = output.as_data() else {
        panic!("expected a populated report");
    };

    assert_eq!(report.summary.total_mentions, 2);
    let timeline_total: usize = report.timeline.iter().map(|b| b.count).sum();
    assert_eq!(timeline_total, 2);
    assert!(report.top_positive.iter().all(|e| e.text != "0.4 old news"));

    let all = engine
        .generate_report(&monitor.id, ReportPeriod::All, ReportFormat::Data)
        .unwrap();
    assert_eq!(all.as_data().unwrap().total_mentions(), 3);
}

#[tokio::test(start_paused = true)]
async fn three_sigma_drop_is_critical_anomaly() {
    let baseline: Vec<f64> = (0..30).map(|i| if i % 2 == 0 { 0.25 } else { -0.25 }).collect();
    let source = Arc::new(ScriptedMentionSource::new().then_mentions(scores(&baseline)));
    let engine = engine_with(source.clone());
    let monitor = engine.create_monitor(scored("@acme")).await.unwrap();
    assert!(engine.get_alerts(&AlertQuery::default()).is_empty());

    source.push_texts(&["-0.75 outage", "-0.75 outage again"]);
    assert_eq!(engine.poll_now(&monitor.id).await, Some(2));

    let anomalies: Vec<_> = engine
        .get_alerts(&AlertQuery::for_monitor(monitor.id.clone()))
        .into_iter()
        .filter(|a| a.alert_type == AlertType::Anomaly)
        .collect();
    assert_eq!(anomalies.len(), 1);
    assert_eq!(anomalies[0].severity, AlertSeverity::Critical);
}

#[tokio::test(start_paused = true)]
async fn volume_spike_needs_twenty_prior_entries() {
    let source = Arc::new(ScriptedMentionSource::new().then_mentions(scores(&[0.2; 10])));
    let engine = engine_with(source.clone());
    let monitor = engine.create_monitor(scored("@acme")).await.unwrap();

    let burst: Vec<String> = (0..200).map(|i| format!("0.2 burst {i}")).collect();
    let burst: Vec<&str> = burst.iter().map(String::as_str).collect();
    source.push_texts(&burst);
    assert_eq!(engine.poll_now(&monitor.id).await, Some(200));

    let spikes = engine
        .get_alerts(&AlertQuery::default())
        .into_iter()
        .filter(|a| a.alert_type == AlertType::VolumeSpike)
        .count();
    assert_eq!(spikes, 0);
}

#[tokio::test(start_paused = true)]
async fn history_is_capped_with_oldest_evicted() {
    let first: Vec<RawMention> = (0..6_000)
        .map(|i| RawMention::new(format!("0.1 first {i}")))
        .collect();
    let second: Vec<RawMention> = (0..4_100)
        .map(|i| RawMention::new(format!("0.1 second {i}")))
        .collect();
    let source = Arc::new(
        ScriptedMentionSource::new()
            .then_mentions(first)
            .then_mentions(second),
    );
    let engine = engine_with(source);
    let monitor = engine.create_monitor(scored("@acme")).await.unwrap();
    engine.poll_now(&monitor.id).await;

    let snapshot = engine.get_monitor(&monitor.id).unwrap();
    assert_eq!(snapshot.history_len, 10_000);

    let oldest = engine
        .history(&monitor.id, &HistoryQuery::default())
        .unwrap()
        .into_iter()
        .next()
        .unwrap();
    assert_eq!(oldest.text, "0.1 first 100");
}

#[tokio::test(start_paused = true)]
async fn reads_are_side_effect_free() {
    let engine = engine_with(Arc::new(
        ScriptedMentionSource::new().then_mentions(scores(&[0.3, -0.1])),
    ));
    let monitor = engine.create_monitor(scored("@acme")).await.unwrap();

    assert_eq!(engine.list_monitors(), engine.list_monitors());
    assert_eq!(engine.get_monitor(&monitor.id), engine.get_monitor(&monitor.id));
}

#[tokio::test]
async fn remote_mode_without_provider_fails_creation() {
    let engine = ReputationEngine::builder(EngineConfig::development())
        .mention_source(Arc::new(ScriptedMentionSource::new()))
        .build()
        .unwrap();

    let err = engine.create_monitor(scored("@acme")).await.unwrap_err();
    assert!(matches!(
        err,
        EngineError::Monitor(MonitorError::Configuration(_))
    ));
    assert!(engine.list_monitors().is_empty());
}

/// Provider whose credentials are always refused.
struct UnauthorizedProvider;

#[async_trait]
impl SentimentProvider for UnauthorizedProvider {
    fn name(&self) -> &str {
        "unauthorized"
    }

    async fn score(&self, _text: &str) -> SentimentResult<SentimentScore> {
        Err(SentimentError::Configuration(
            "remote provider rejected credentials (401 Unauthorized)".into(),
        ))
    }
}

#[tokio::test(start_paused = true)]
async fn rejected_remote_credentials_fail_creation() {
    let source = Arc::new(ScriptedMentionSource::new().then_mentions(scores(&[0.4, 0.1])));
    let engine = ReputationEngine::builder(EngineConfig::development())
        .mention_source(source.clone())
        .remote_provider(Arc::new(UnauthorizedProvider))
        .build()
        .unwrap();

    let err = engine.create_monitor(scored("@acme")).await.unwrap_err();
    assert!(matches!(
        err,
        EngineError::Monitor(MonitorError::Configuration(_))
    ));
    assert!(engine.list_monitors().is_empty());

    tokio::time::sleep(Duration::from_secs(3_600)).await;
    assert_eq!(source.calls(), 1);
}

struct GarbageTransport;

#[async_trait]
impl CompletionTransport for GarbageTransport {
    async fn complete(&self, _instruction: &str, _text: &str) -> SentimentResult<String> {
        Ok("I think it's fairly positive overall!".to_string())
    }
}

#[tokio::test(start_paused = true)]
async fn malformed_remote_output_falls_back_to_local() {
    let local = Arc::new(LocalScorer::default());
    let remote = RemoteScorer::new(Arc::new(GarbageTransport), local.clone());
    let source = Arc::new(ScriptedMentionSource::new().then_texts(&["love this, great work"]));
    let engine = ReputationEngine::builder(EngineConfig::development())
        .mention_source(source)
        .remote_provider(Arc::new(remote))
        .build()
        .unwrap();

    let monitor = engine.create_monitor(scored("@acme")).await.unwrap();
    assert_eq!(monitor.consecutive_failures, 0);

    let history = engine
        .history(&monitor.id, &HistoryQuery::default())
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].score, local.analyze("love this, great work").score);
}

#[tokio::test(start_paused = true)]
async fn alerts_reach_transport_topic() {
    let transport = Arc::new(RecordingTransport::new());
    let source = Arc::new(ScriptedMentionSource::new().then_mentions(scores(&[-0.9, -0.8])));
    let engine = ReputationEngine::builder(EngineConfig::development())
        .mention_source(source)
        .remote_provider(Arc::new(ScoreFromText))
        .alert_transport(transport.clone())
        .build()
        .unwrap();
    let mut alerts_rx = engine.subscribe_alerts();

    let monitor = engine.create_monitor(scored("@acme")).await.unwrap();
    let alert = alerts_rx.recv().await.unwrap();
    assert_eq!(alert.severity, AlertSeverity::Critical);

    // Delivery runs on its own task.
    tokio::time::sleep(Duration::from_millis(10)).await;
    let published = transport.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].0, monitor.id.topic());
}

#[tokio::test]
async fn webhook_receives_alert_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "event": "alert",
            "alert": { "type": "sentiment_threshold", "target": "@acme" }
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let source = Arc::new(ScriptedMentionSource::new().then_mentions(scores(&[-0.5, -0.5])));
    let engine = engine_with(source);
    let config = scored("@acme").with_alert_config(
        pulse_engine::AlertConfig::default().with_webhook(format!("{}/hooks/pulse", server.uri())),
    );
    engine.create_monitor(config).await.unwrap();

    for _ in 0..50 {
        if !server.received_requests().await.unwrap_or_default().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    engine.shutdown().await;
}

#[tokio::test]
async fn failing_webhook_never_fails_the_cycle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let source = Arc::new(ScriptedMentionSource::new().then_mentions(scores(&[-0.7])));
    let engine = engine_with(source);
    let config = scored("@acme")
        .with_alert_config(pulse_engine::AlertConfig::default().with_webhook(server.uri()));

    let monitor = engine.create_monitor(config).await.unwrap();
    assert_eq!(monitor.consecutive_failures, 0);
    assert_eq!(monitor.history_len, 1);
    assert_eq!(engine.get_alerts(&AlertQuery::default()).len(), 1);
    engine.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_every_monitor() {
    let source = Arc::new(ScriptedMentionSource::new());
    let engine = engine_with(source.clone());
    engine.create_monitor(scored("@acme")).await.unwrap();
    engine.create_monitor(scored("#acmeoutage")).await.unwrap();

    engine.shutdown().await;
    tokio::time::sleep(Duration::from_secs(60)).await;

    assert_eq!(source.calls(), 2);
    assert!(engine
        .list_monitors()
        .iter()
        .all(|m| m.status == pulse_engine::MonitorStatus::Stopped));
}

#[tokio::test(start_paused = true)]
async fn clear_alerts_empties_log() {
    let source = Arc::new(ScriptedMentionSource::new().then_mentions(scores(&[-0.9])));
    let engine = engine_with(source);
    engine.create_monitor(scored("@acme")).await.unwrap();

    assert_eq!(engine.clear_alerts(), 1);
    assert!(engine.get_alerts(&AlertQuery::default()).is_empty());
}
