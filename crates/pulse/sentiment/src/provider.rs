//! Strategy seam for sentiment scoring.

use async_trait::async_trait;

use crate::error::SentimentResult;
use crate::score::SentimentScore;

/// A sentiment strategy. The local lexicon scorer and the remote scorer both
/// implement this; tests inject their own.
#[async_trait]
pub trait SentimentProvider: Send + Sync {
    /// Strategy name for logging.
    fn name(&self) -> &str;

    /// Score one text.
    async fn score(&self, text: &str) -> SentimentResult<SentimentScore>;
}
