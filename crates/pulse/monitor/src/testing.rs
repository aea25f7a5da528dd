//! In-memory Mention Source doubles.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use pulse_types::{RawMention, SourceType};

use crate::error::{MonitorError, MonitorResult};
use crate::source::MentionSource;

enum Step {
    Mentions(Vec<RawMention>),
    Fail(String),
}

/// Replays a fixed script of fetch outcomes, then returns no results.
///
/// Tracks how many fetches overlapped so single-flight can be asserted.
#[derive(Default)]
pub struct ScriptedMentionSource {
    script: Mutex<VecDeque<Step>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedMentionSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful fetch of the given texts.
    pub fn then_texts(self, texts: &[&str]) -> Self {
        self.then_mentions(texts.iter().map(|t| RawMention::new(*t)).collect())
    }

    pub fn then_mentions(self, mentions: Vec<RawMention>) -> Self {
        self.script.lock().push_back(Step::Mentions(mentions));
        self
    }

    pub fn then_fail(self, reason: impl Into<String>) -> Self {
        self.script.lock().push_back(Step::Fail(reason.into()));
        self
    }

    /// Make every fetch take `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue more outcomes after construction.
    pub fn push_texts(&self, texts: &[&str]) {
        self.script.lock().push_back(Step::Mentions(
            texts.iter().map(|t| RawMention::new(*t)).collect(),
        ));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of fetches that were ever running at once.
    pub fn max_concurrent(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MentionSource for ScriptedMentionSource {
    async fn fetch(
        &self,
        _target: &str,
        _source_type: SourceType,
    ) -> MonitorResult<Vec<RawMention>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let step = self.script.lock().pop_front();

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        match step {
            Some(Step::Mentions(mentions)) => Ok(mentions),
            Some(Step::Fail(reason)) => Err(MonitorError::Fetch(reason)),
            None => Ok(Vec::new()),
        }
    }
}

/// Fails every fetch.
#[derive(Default)]
pub struct FailingMentionSource {
    calls: AtomicUsize,
}

impl FailingMentionSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MentionSource for FailingMentionSource {
    async fn fetch(
        &self,
        target: &str,
        _source_type: SourceType,
    ) -> MonitorResult<Vec<RawMention>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(MonitorError::Fetch(format!("source unavailable for {target}")))
    }
}
