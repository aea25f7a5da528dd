//! Aggregation over prior scoring results.

use pulse_types::stats::{mean, median};
use pulse_types::{SentimentLabel, Trend};
use serde::{Deserialize, Serialize};

use crate::score::Scored;

/// Half-mean difference below which a series is considered stable.
pub const TREND_DEADBAND: f64 = 0.1;

/// Count of results per label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelDistribution {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl LabelDistribution {
    pub fn record(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Negative => self.negative += 1,
            SentimentLabel::Neutral => self.neutral += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }
}

/// Summary statistics over a series of scored items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentAggregate {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub distribution: LabelDistribution,
    pub trend: Trend,
}

/// Aggregate an ordered series. Order matters for the trend.
pub fn aggregate<'a, T, I>(items: I) -> SentimentAggregate
where
    T: Scored + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut scores = Vec::new();
    let mut distribution = LabelDistribution::default();
    for item in items {
        scores.push(item.score());
        distribution.record(item.label());
    }

    SentimentAggregate {
        count: scores.len(),
        mean: mean(&scores),
        median: median(&scores),
        distribution,
        trend: trend(&scores),
    }
}

/// Compare the mean of the first half against the mean of the second half.
/// Odd-length series give the middle element to the second half.
pub fn trend(scores: &[f64]) -> Trend {
    if scores.len() < 2 {
        return Trend::Stable;
    }
    let (first, second) = scores.split_at(scores.len() / 2);
    let delta = mean(second) - mean(first);
    if delta > TREND_DEADBAND {
        Trend::Improving
    } else if delta < -TREND_DEADBAND {
        Trend::Declining
    } else {
        Trend::Stable
    }
}
