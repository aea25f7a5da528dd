//! Remote (LLM) strategy with local fallback.
//!
//! The remote scorer sends the text with a fixed instruction and parses the
//! reply defensively. Unparseable replies fall back to the local scorer;
//! transport and credential failures are returned as configuration errors.

use std::sync::Arc;

use async_trait::async_trait;
use pulse_types::{clamp_unit, SentimentLabel};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{SentimentError, SentimentResult};
use crate::local::{push_keyword, LocalScorer};
use crate::provider::SentimentProvider;
use crate::score::SentimentScore;

/// Instruction sent with every remote request.
pub const SENTIMENT_INSTRUCTION: &str = "You are a sentiment classifier. Analyze the sentiment \
of the user's text and respond with ONLY a JSON object with exactly these fields: \
\"score\" (number from -1 to 1), \"label\" (\"positive\", \"negative\" or \"neutral\"), \
\"confidence\" (number from 0 to 1), \"keywords\" (array of up to 10 strings). \
Do not include any other text.";

/// Transport that delivers a completion request and returns the raw model
/// output text.
#[async_trait]
pub trait CompletionTransport: Send + Sync {
    async fn complete(&self, instruction: &str, text: &str) -> SentimentResult<String>;
}

#[derive(Debug, Deserialize)]
struct RemotePayload {
    score: f64,
    #[serde(default)]
    label: Option<String>,
    confidence: f64,
    #[serde(default)]
    keywords: Vec<String>,
}

/// Parse remote output into a score.
///
/// The structured payload may be wrapped in prose or code fences; the span
/// from the first `{` to the last `}` is decoded. Score and confidence are
/// clamped; an unknown label is re-derived from the score.
pub fn parse_remote_output(raw: &str, max_keywords: usize) -> SentimentResult<SentimentScore> {
    let start = raw
        .find('{')
        .ok_or_else(|| SentimentError::MalformedResponse("no JSON object in output".into()))?;
    let end = raw
        .rfind('}')
        .filter(|end| *end > start)
        .ok_or_else(|| SentimentError::MalformedResponse("unterminated JSON object".into()))?;

    let payload: RemotePayload = serde_json::from_str(&raw[start..=end])
        .map_err(|e| SentimentError::MalformedResponse(e.to_string()))?;

    if !payload.score.is_finite() || !payload.confidence.is_finite() {
        return Err(SentimentError::MalformedResponse(
            "non-finite score or confidence".into(),
        ));
    }

    let score = clamp_unit(payload.score);
    let label = payload
        .label
        .as_deref()
        .and_then(SentimentLabel::parse)
        .unwrap_or_else(|| SentimentLabel::from_score(score));
    let mut keywords = Vec::new();
    for keyword in payload.keywords {
        push_keyword(&mut keywords, keyword);
    }
    keywords.truncate(max_keywords);

    Ok(SentimentScore {
        score,
        label,
        confidence: payload.confidence.clamp(0.0, 1.0),
        keywords,
    })
}

/// Remote strategy. Falls back to `local` on malformed output and shares
/// its keyword cap.
pub struct RemoteScorer {
    transport: Arc<dyn CompletionTransport>,
    local: Arc<LocalScorer>,
    max_keywords: usize,
}

impl RemoteScorer {
    pub fn new(transport: Arc<dyn CompletionTransport>, local: Arc<LocalScorer>) -> Self {
        let max_keywords = local.max_keywords();
        Self {
            transport,
            local,
            max_keywords,
        }
    }
}

#[async_trait]
impl SentimentProvider for RemoteScorer {
    fn name(&self) -> &str {
        "remote"
    }

    async fn score(&self, text: &str) -> SentimentResult<SentimentScore> {
        let parsed = self
            .transport
            .complete(SENTIMENT_INSTRUCTION, text)
            .await
            .and_then(|raw| parse_remote_output(&raw, self.max_keywords));

        match parsed {
            Ok(result) => {
                debug!(score = result.score, label = %result.label, "Remote sentiment scored");
                Ok(result)
            }
            Err(SentimentError::MalformedResponse(reason)) => {
                warn!(reason = %reason, "Malformed remote sentiment output, using local scorer");
                Ok(self.local.analyze(text))
            }
            Err(other) => Err(other),
        }
    }
}
