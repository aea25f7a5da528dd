//! # Pulse Sentiment - Text Sentiment Scoring
//!
//! Turns text into `{score, label, confidence, keywords}` using one of two
//! interchangeable strategies:
//!
//! - **Local**: a deterministic lexicon scorer with negation, intensifier,
//!   and emoji handling. No external calls.
//! - **Remote**: an LLM classifier reached through a [`CompletionTransport`].
//!   Unparseable replies fall back to the local scorer; credential and
//!   network failures surface as [`SentimentError::Configuration`].
//!
//! Both implement [`SentimentProvider`]. [`SentimentScorer`] picks the
//! strategy per call and scores batches in order. [`aggregate`] summarises a
//! series of results (mean, median, label distribution, trend).
//!
//! ## Example
//!
//! ```rust
//! use pulse_sentiment::{LocalScorer, SentimentLabel};
//!
//! let scorer = LocalScorer::default();
//! let good = scorer.analyze("good");
//! let not_good = scorer.analyze("not good");
//!
//! assert_eq!(good.label, SentimentLabel::Positive);
//! assert!(not_good.score < 0.0 && not_good.score.abs() < good.score);
//! ```

pub mod aggregate;
pub mod config;
pub mod error;
pub mod http;
pub mod lexicon;
pub mod local;
pub mod provider;
pub mod remote;
pub mod score;
pub mod scorer;
pub mod tokenize;

pub use aggregate::{aggregate, trend, LabelDistribution, SentimentAggregate, TREND_DEADBAND};
pub use config::{RemoteConfig, SentimentConfig, DEFAULT_API_KEY_ENV};
pub use error::{SentimentError, SentimentResult};
pub use http::HttpCompletionTransport;
pub use lexicon::Lexicon;
pub use local::LocalScorer;
pub use provider::SentimentProvider;
pub use pulse_types::SentimentLabel;
pub use remote::{parse_remote_output, CompletionTransport, RemoteScorer, SENTIMENT_INSTRUCTION};
pub use score::{Scored, ScoredText, SentimentScore};
pub use scorer::SentimentScorer;
