//! Sentiment lexicon for the local strategy.
//!
//! Word weights are integers in [-5, 5]; the local scorer normalises the
//! summed weights by `5 * scored_tokens`.

use std::collections::{HashMap, HashSet};

const WORDS: &[(&str, f64)] = &[
    // Strongly positive
    ("amazing", 4.0),
    ("awesome", 4.0),
    ("brilliant", 4.0),
    ("excellent", 3.0),
    ("fantastic", 4.0),
    ("outstanding", 5.0),
    ("superb", 5.0),
    ("wonderful", 4.0),
    ("perfect", 3.0),
    ("love", 3.0),
    ("loved", 3.0),
    ("loving", 2.0),
    ("best", 3.0),
    ("thrilled", 5.0),
    ("delighted", 3.0),
    ("impressive", 3.0),
    ("incredible", 4.0),
    ("exceptional", 4.0),
    // Positive
    ("good", 3.0),
    ("great", 3.0),
    ("nice", 3.0),
    ("happy", 3.0),
    ("glad", 3.0),
    ("like", 2.0),
    ("liked", 2.0),
    ("enjoy", 2.0),
    ("enjoyed", 2.0),
    ("recommend", 2.0),
    ("recommended", 2.0),
    ("helpful", 2.0),
    ("friendly", 2.0),
    ("fast", 2.0),
    ("reliable", 2.0),
    ("smooth", 2.0),
    ("easy", 1.0),
    ("fun", 4.0),
    ("cool", 1.0),
    ("win", 4.0),
    ("winning", 4.0),
    ("success", 2.0),
    ("successful", 3.0),
    ("thanks", 2.0),
    ("thank", 2.0),
    ("grateful", 3.0),
    ("appreciate", 2.0),
    ("appreciated", 2.0),
    ("improved", 2.0),
    ("improvement", 2.0),
    ("fixed", 2.0),
    ("resolved", 2.0),
    ("secure", 2.0),
    ("trust", 1.0),
    ("trusted", 2.0),
    ("support", 2.0),
    ("supportive", 2.0),
    ("quality", 2.0),
    ("worth", 2.0),
    ("satisfied", 2.0),
    ("pleased", 3.0),
    ("excited", 3.0),
    ("exciting", 3.0),
    ("beautiful", 3.0),
    ("clean", 2.0),
    ("solid", 2.0),
    ("innovative", 2.0),
    ("wow", 4.0),
    ("yay", 2.0),
    ("positive", 2.0),
    ("strong", 2.0),
    ("growth", 2.0),
    ("praise", 3.0),
    ("kudos", 3.0),
    // Mildly negative
    ("slow", -2.0),
    ("meh", -1.0),
    ("confusing", -2.0),
    ("confused", -2.0),
    ("annoying", -2.0),
    ("annoyed", -2.0),
    ("issue", -1.0),
    ("issues", -1.0),
    ("problem", -2.0),
    ("problems", -2.0),
    ("bug", -2.0),
    ("bugs", -2.0),
    ("buggy", -2.0),
    ("glitch", -2.0),
    ("delay", -1.0),
    ("delayed", -1.0),
    ("expensive", -1.0),
    ("overpriced", -2.0),
    ("disappointed", -2.0),
    ("disappointing", -2.0),
    ("unhappy", -2.0),
    ("sad", -2.0),
    ("concern", -1.0),
    ("concerned", -2.0),
    ("worried", -3.0),
    ("doubt", -1.0),
    ("weak", -2.0),
    ("negative", -2.0),
    ("complaint", -2.0),
    ("complain", -2.0),
    ("complaints", -2.0),
    ("unreliable", -2.0),
    ("rude", -2.0),
    ("ignored", -2.0),
    ("missing", -2.0),
    ("lost", -3.0),
    ("broken", -3.0),
    ("fail", -2.0),
    ("failed", -2.0),
    ("failure", -2.0),
    ("fails", -2.0),
    ("crash", -2.0),
    ("crashed", -2.0),
    ("crashes", -2.0),
    ("outage", -3.0),
    ("down", -1.0),
    ("refund", -2.0),
    ("cancel", -1.0),
    ("cancelled", -1.0),
    ("wrong", -2.0),
    ("error", -2.0),
    ("errors", -2.0),
    ("poor", -2.0),
    ("useless", -2.0),
    ("waste", -1.0),
    ("angry", -3.0),
    ("upset", -2.0),
    ("frustrated", -2.0),
    ("frustrating", -2.0),
    ("boring", -3.0),
    ("risk", -2.0),
    ("risky", -2.0),
    ("warning", -3.0),
    // Strongly negative
    ("bad", -3.0),
    ("hate", -3.0),
    ("hated", -3.0),
    ("awful", -3.0),
    ("terrible", -3.0),
    ("horrible", -3.0),
    ("worst", -3.0),
    ("worse", -3.0),
    ("disgusting", -3.0),
    ("pathetic", -2.0),
    ("furious", -3.0),
    ("disaster", -2.0),
    ("nightmare", -3.0),
    ("unacceptable", -2.0),
    ("boycott", -2.0),
    ("lawsuit", -2.0),
    ("breach", -3.0),
    ("hacked", -3.0),
    ("leak", -2.0),
    ("leaked", -2.0),
    ("stolen", -2.0),
    ("lies", -2.0),
    ("liar", -3.0),
    ("misleading", -3.0),
    ("scam", -4.0),
    ("scammer", -4.0),
    ("scammed", -4.0),
    ("fraud", -4.0),
    ("fraudulent", -4.0),
    ("ripoff", -3.0),
    ("catastrophic", -4.0),
    ("abusive", -3.0),
];

const EMOJI: &[(&str, f64)] = &[
    ("😀", 2.0),
    ("😃", 2.0),
    ("😄", 2.0),
    ("😁", 2.0),
    ("😊", 2.0),
    ("🙂", 1.0),
    ("😍", 3.0),
    ("🥰", 3.0),
    ("😂", 1.0),
    ("👍", 2.0),
    ("👏", 2.0),
    ("🙌", 2.0),
    ("🎉", 3.0),
    ("🔥", 2.0),
    ("💯", 2.0),
    ("🚀", 2.0),
    ("⭐", 2.0),
    ("❤", 3.0),
    ("💔", -3.0),
    ("👎", -2.0),
    ("🙁", -1.0),
    ("☹", -2.0),
    ("😞", -2.0),
    ("😢", -2.0),
    ("😭", -3.0),
    ("😠", -3.0),
    ("😡", -4.0),
    ("🤬", -4.0),
    ("🤮", -4.0),
    ("💩", -3.0),
    ("🤡", -2.0),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "neither", "nor", "nobody", "nothing", "none", "cannot", "cant",
    "can't", "don't", "dont", "doesn't", "doesnt", "didn't", "didnt", "won't", "wont",
    "wouldn't", "wouldnt", "shouldn't", "shouldnt", "couldn't", "couldnt", "isn't", "isnt",
    "aren't", "arent", "wasn't", "wasnt", "weren't", "werent", "hardly", "barely", "without",
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.5),
    ("really", 1.5),
    ("so", 1.3),
    ("too", 1.3),
    ("extremely", 2.0),
    ("incredibly", 2.0),
    ("absolutely", 1.8),
    ("totally", 1.5),
    ("completely", 1.5),
    ("super", 1.5),
    ("highly", 1.5),
    ("utterly", 1.8),
    ("seriously", 1.4),
    ("quite", 1.2),
    ("somewhat", 0.7),
    ("slightly", 0.5),
    ("kinda", 0.7),
];

/// Word, emoji, negation, and intensifier tables.
#[derive(Debug, Clone)]
pub struct Lexicon {
    words: HashMap<String, f64>,
    emoji: HashMap<String, f64>,
    negations: HashSet<String>,
    intensifiers: HashMap<String, f64>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexicon {
    /// Built-in English lexicon.
    pub fn new() -> Self {
        Self {
            words: WORDS.iter().map(|(w, s)| (w.to_string(), *s)).collect(),
            emoji: EMOJI.iter().map(|(e, s)| (e.to_string(), *s)).collect(),
            negations: NEGATIONS.iter().map(|w| w.to_string()).collect(),
            intensifiers: INTENSIFIERS.iter().map(|(w, m)| (w.to_string(), *m)).collect(),
        }
    }

    /// Add or override a word weight.
    pub fn with_word(mut self, word: impl Into<String>, weight: f64) -> Self {
        self.words.insert(word.into().to_lowercase(), weight.clamp(-5.0, 5.0));
        self
    }

    pub fn word_weight(&self, word: &str) -> Option<f64> {
        self.words.get(word).copied()
    }

    pub fn emoji_weight(&self, glyph: &str) -> Option<f64> {
        self.emoji.get(glyph).copied()
    }

    pub fn is_negation(&self, word: &str) -> bool {
        self.negations.contains(word)
    }

    pub fn intensifier(&self, word: &str) -> Option<f64> {
        self.intensifiers.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.words.len() + self.emoji.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
