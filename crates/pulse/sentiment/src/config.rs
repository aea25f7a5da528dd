//! Scorer configuration.

use serde::{Deserialize, Serialize};

/// Default environment variable holding the remote provider's API key.
pub const DEFAULT_API_KEY_ENV: &str = "PULSE_SENTIMENT_API_KEY";

/// Tunables for the local strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentConfig {
    /// Multiplier applied to a negated lexicon hit. Negative so the sign
    /// flips; magnitude below 1 so the flip is weakened.
    #[serde(default = "default_negation_factor")]
    pub negation_factor: f64,

    /// Scores within +/- this band are labelled neutral.
    #[serde(default = "default_neutral_band")]
    pub neutral_band: f64,

    #[serde(default = "default_max_keywords")]
    pub max_keywords: usize,

    /// Stored/annotated text is truncated to this many characters.
    #[serde(default = "default_text_max_chars")]
    pub text_max_chars: usize,

    /// Remote provider settings; absent means remote mode is unavailable.
    #[serde(default)]
    pub remote: Option<RemoteConfig>,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            negation_factor: default_negation_factor(),
            neutral_band: default_neutral_band(),
            max_keywords: default_max_keywords(),
            text_max_chars: default_text_max_chars(),
            remote: None,
        }
    }
}

/// Settings for the remote (LLM) strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// OpenAI-compatible chat completions endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable the API key is read from.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_negation_factor() -> f64 {
    -0.75
}

fn default_neutral_band() -> f64 {
    pulse_types::NEUTRAL_BAND
}

fn default_max_keywords() -> usize {
    pulse_types::MAX_KEYWORDS
}

fn default_text_max_chars() -> usize {
    280
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}
