//! Sentiment labels, trends, and scored data points.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::MAX_KEYWORDS;

/// Width of the neutral band around zero.
pub const NEUTRAL_BAND: f64 = 0.05;

/// Three-way sentiment classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Classify a score with the default neutral band.
    pub fn from_score(score: f64) -> Self {
        Self::from_score_with_band(score, NEUTRAL_BAND)
    }

    /// Classify a score: above `band` is positive, below `-band` negative.
    pub fn from_score_with_band(score: f64, band: f64) -> Self {
        if score > band {
            SentimentLabel::Positive
        } else if score < -band {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    /// Parse a label leniently (case-insensitive, surrounding whitespace ignored).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "positive" => Some(SentimentLabel::Positive),
            "negative" => Some(SentimentLabel::Negative),
            "neutral" => Some(SentimentLabel::Neutral),
            _ => None,
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "positive"),
            SentimentLabel::Negative => write!(f, "negative"),
            SentimentLabel::Neutral => write!(f, "neutral"),
        }
    }
}

/// Direction of sentiment over an ordered series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Declining,
    #[default]
    Stable,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Improving => write!(f, "improving"),
            Trend::Declining => write!(f, "declining"),
            Trend::Stable => write!(f, "stable"),
        }
    }
}

/// One scored mention. Immutable once appended to a monitor's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub timestamp: DateTime<Utc>,
    /// Sentiment score in [-1, 1].
    pub score: f64,
    pub label: SentimentLabel,
    /// Mention text, truncated for storage.
    pub text: String,
    pub author: Option<String>,
    pub source_url: Option<String>,
    /// Matched keywords, at most [`MAX_KEYWORDS`].
    pub keywords: Vec<String>,
}

impl DataPoint {
    /// Build a data point. The score is clamped to [-1, 1] and the keyword
    /// list is capped; a NaN score is stored as 0.
    pub fn new(
        timestamp: DateTime<Utc>,
        score: f64,
        label: SentimentLabel,
        text: impl Into<String>,
        mut keywords: Vec<String>,
    ) -> Self {
        keywords.truncate(MAX_KEYWORDS);
        Self {
            timestamp,
            score: clamp_unit(score),
            label,
            text: text.into(),
            author: None,
            source_url: None,
            keywords,
        }
    }

    pub fn with_author(mut self, author: Option<String>) -> Self {
        self.author = author;
        self
    }

    pub fn with_source_url(mut self, url: Option<String>) -> Self {
        self.source_url = url;
        self
    }
}

/// Clamp to [-1, 1], mapping NaN to 0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}

/// Truncate `text` to at most `max_chars` characters, appending an ellipsis
/// when anything was cut.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}
