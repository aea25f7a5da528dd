//! Local lexicon strategy: deterministic, no external calls.

use async_trait::async_trait;
use pulse_types::{clamp_unit, SentimentLabel};

use crate::config::SentimentConfig;
use crate::error::SentimentResult;
use crate::lexicon::Lexicon;
use crate::provider::SentimentProvider;
use crate::score::SentimentScore;
use crate::tokenize::{tokenize, Token};

/// Upper bound of a single lexicon weight, used for normalisation.
const MAX_WEIGHT: f64 = 5.0;

/// Lexicon-based scorer with negation and intensifier handling.
#[derive(Debug, Clone)]
pub struct LocalScorer {
    lexicon: Lexicon,
    negation_factor: f64,
    neutral_band: f64,
    max_keywords: usize,
}

impl Default for LocalScorer {
    fn default() -> Self {
        Self::new(&SentimentConfig::default())
    }
}

impl LocalScorer {
    pub fn new(config: &SentimentConfig) -> Self {
        Self::with_lexicon(Lexicon::new(), config)
    }

    pub fn with_lexicon(lexicon: Lexicon, config: &SentimentConfig) -> Self {
        Self {
            lexicon,
            negation_factor: config.negation_factor,
            neutral_band: config.neutral_band,
            max_keywords: config.max_keywords,
        }
    }

    /// Cap on keywords reported per text.
    pub fn max_keywords(&self) -> usize {
        self.max_keywords
    }

    /// Score `text`.
    ///
    /// Tokens are walked left to right. A negation word arms the negation
    /// flag and an intensifier sets the multiplier; every other token
    /// consumes both. A lexicon hit contributes `weight * multiplier`,
    /// times the negation factor when negated. Emoji score on their own
    /// weight without modifiers.
    pub fn analyze(&self, text: &str) -> SentimentScore {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return SentimentScore::neutral();
        }

        let mut negated = false;
        let mut multiplier = 1.0;
        let mut total = 0.0;
        let mut scored = 0usize;
        let mut keywords: Vec<String> = Vec::new();

        for token in &tokens {
            match token {
                Token::Emoji(glyph) => {
                    if let Some(weight) = self.lexicon.emoji_weight(glyph) {
                        total += weight;
                        scored += 1;
                        push_keyword(&mut keywords, glyph.clone());
                    }
                }
                Token::Word(word) => {
                    if self.lexicon.is_negation(word) {
                        negated = true;
                        continue;
                    }
                    if let Some(factor) = self.lexicon.intensifier(word) {
                        multiplier = factor;
                        continue;
                    }
                    if let Some(base) = self.lexicon.word_weight(word) {
                        let mut weight = base * multiplier;
                        if negated {
                            weight *= self.negation_factor;
                            push_keyword(&mut keywords, format!("not_{}", word));
                        } else {
                            push_keyword(&mut keywords, word.clone());
                        }
                        total += weight;
                        scored += 1;
                    }
                }
            }
            negated = false;
            multiplier = 1.0;
        }

        let score = clamp_unit(total / (scored.max(1) as f64 * MAX_WEIGHT));
        let confidence = (2.0 * scored as f64 / tokens.len() as f64).min(1.0);
        keywords.truncate(self.max_keywords);

        SentimentScore {
            score,
            label: SentimentLabel::from_score_with_band(score, self.neutral_band),
            confidence,
            keywords,
        }
    }
}

pub(crate) fn push_keyword(keywords: &mut Vec<String>, keyword: String) {
    if !keywords.contains(&keyword) {
        keywords.push(keyword);
    }
}

#[async_trait]
impl SentimentProvider for LocalScorer {
    fn name(&self) -> &str {
        "local"
    }

    async fn score(&self, text: &str) -> SentimentResult<SentimentScore> {
        Ok(self.analyze(text))
    }
}
