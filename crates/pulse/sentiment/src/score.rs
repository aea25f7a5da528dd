//! Scoring result shared by every strategy.

use pulse_types::{DataPoint, SentimentLabel};
use serde::{Deserialize, Serialize};

/// Output of one scoring call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    /// Score in [-1, 1].
    pub score: f64,
    pub label: SentimentLabel,
    /// Confidence in [0, 1].
    pub confidence: f64,
    /// Matched terms; negated matches carry a `not_` prefix.
    pub keywords: Vec<String>,
}

impl SentimentScore {
    /// A neutral, zero-confidence result.
    pub fn neutral() -> Self {
        Self {
            score: 0.0,
            label: SentimentLabel::Neutral,
            confidence: 0.0,
            keywords: Vec::new(),
        }
    }
}

/// Anything carrying a score and label, so aggregation works over raw
/// scoring results and stored data points alike.
pub trait Scored {
    fn score(&self) -> f64;
    fn label(&self) -> SentimentLabel;
}

impl Scored for SentimentScore {
    fn score(&self) -> f64 {
        self.score
    }

    fn label(&self) -> SentimentLabel {
        self.label
    }
}

impl Scored for DataPoint {
    fn score(&self) -> f64 {
        self.score
    }

    fn label(&self) -> SentimentLabel {
        self.label
    }
}

/// A batch entry: the (possibly truncated) source text and its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredText {
    pub text: String,
    #[serde(flatten)]
    pub result: SentimentScore,
}

impl Scored for ScoredText {
    fn score(&self) -> f64 {
        self.result.score
    }

    fn label(&self) -> SentimentLabel {
        self.result.label
    }
}
