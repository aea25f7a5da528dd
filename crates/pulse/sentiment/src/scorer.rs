//! Strategy selection and batch scoring.

use std::sync::Arc;

use pulse_types::{truncate_text, ScorerMode};
use tracing::debug;

use crate::config::SentimentConfig;
use crate::error::{SentimentError, SentimentResult};
use crate::http::HttpCompletionTransport;
use crate::local::LocalScorer;
use crate::provider::SentimentProvider;
use crate::remote::RemoteScorer;
use crate::score::{ScoredText, SentimentScore};

/// Routes scoring calls to the local strategy or an injected remote one.
#[derive(Clone)]
pub struct SentimentScorer {
    local: Arc<LocalScorer>,
    remote: Option<Arc<dyn SentimentProvider>>,
    text_max_chars: usize,
}

impl std::fmt::Debug for SentimentScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentimentScorer")
            .field("remote", &self.remote.as_ref().map(|r| r.name().to_string()))
            .field("text_max_chars", &self.text_max_chars)
            .finish()
    }
}

impl Default for SentimentScorer {
    fn default() -> Self {
        Self::local_only(&SentimentConfig::default())
    }
}

impl SentimentScorer {
    /// Local strategy only; remote mode reports a configuration error.
    pub fn local_only(config: &SentimentConfig) -> Self {
        Self {
            local: Arc::new(LocalScorer::new(config)),
            remote: None,
            text_max_chars: config.text_max_chars,
        }
    }

    /// Build from config. When a remote block is present the HTTP transport
    /// is created, which fails if the credential is missing.
    pub fn from_config(config: &SentimentConfig) -> SentimentResult<Self> {
        let mut scorer = Self::local_only(config);
        if let Some(remote) = &config.remote {
            let transport = HttpCompletionTransport::from_config(remote)?;
            let provider = RemoteScorer::new(Arc::new(transport), scorer.local.clone());
            scorer.remote = Some(Arc::new(provider));
        }
        Ok(scorer)
    }

    /// Replace the remote strategy.
    pub fn with_remote(mut self, remote: Arc<dyn SentimentProvider>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn local(&self) -> &LocalScorer {
        &self.local
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Check that `mode` can be served.
    pub fn ensure_mode(&self, mode: ScorerMode) -> SentimentResult<()> {
        self.provider(mode).map(|_| ())
    }

    fn provider(&self, mode: ScorerMode) -> SentimentResult<&dyn SentimentProvider> {
        match mode {
            ScorerMode::Local => Ok(&*self.local as &dyn SentimentProvider),
            ScorerMode::Remote => self.remote.as_deref().ok_or_else(|| {
                SentimentError::Configuration("remote sentiment provider is not configured".into())
            }),
        }
    }

    /// Score one text with the given strategy.
    pub async fn score(&self, text: &str, mode: ScorerMode) -> SentimentResult<SentimentScore> {
        self.provider(mode)?.score(text).await
    }

    /// Score texts sequentially, preserving order. Each entry carries the
    /// truncated source text.
    pub async fn score_batch<S: AsRef<str>>(
        &self,
        texts: &[S],
        mode: ScorerMode,
    ) -> SentimentResult<Vec<ScoredText>> {
        let provider = self.provider(mode)?;
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            let text = text.as_ref();
            let result = provider.score(text).await?;
            out.push(ScoredText {
                text: truncate_text(text, self.text_max_chars),
                result,
            });
        }
        debug!(count = out.len(), provider = provider.name(), "Scored batch");
        Ok(out)
    }
}
