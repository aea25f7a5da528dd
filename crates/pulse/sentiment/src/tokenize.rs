//! Tokenizer for the local strategy.

/// One token of input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Lowercased word of at least two characters.
    Word(String),
    /// A single emoji glyph.
    Emoji(String),
}

/// Split text into lowercase words (length > 1) and emoji glyphs, in order.
///
/// Apostrophes inside words are kept so contractions like `don't` survive;
/// variation selectors and zero-width joiners act as separators.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word = String::new();

    for c in text.chars() {
        if is_emoji(c) {
            flush(&mut word, &mut tokens);
            tokens.push(Token::Emoji(c.to_string()));
        } else if c.is_alphanumeric() {
            word.extend(c.to_lowercase());
        } else if (c == '\'' || c == '\u{2019}') && !word.is_empty() {
            word.push('\'');
        } else {
            flush(&mut word, &mut tokens);
        }
    }
    flush(&mut word, &mut tokens);

    tokens
}

fn flush(word: &mut String, tokens: &mut Vec<Token>) {
    let trimmed = word.trim_end_matches('\'');
    if trimmed.chars().count() > 1 {
        tokens.push(Token::Word(trimmed.to_string()));
    }
    word.clear();
}

fn is_emoji(c: char) -> bool {
    matches!(
        c as u32,
        0x1F300..=0x1FAFF | 0x2600..=0x27BF | 0x2B50..=0x2B55 | 0x1F000..=0x1F2FF
    )
}
