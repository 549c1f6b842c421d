//! Word tokenizer for the statistical retriever.
//!
//! Lowercases the input and splits it into runs of word characters
//! (alphanumerics and `_`). Runs shorter than two characters are dropped and
//! no stop-word list is applied, so "AI" survives and "a" does not. Tokens
//! are byte spans into one lowercased buffer: a single allocation per text.

/// Tokenized text: owns the lowercased buffer, yields `&str` slices via byte spans.
pub struct Tokens {
    buffer: String,
    spans: Vec<(u32, u32)>, // (start, end) byte offsets into buffer
}

impl Tokens {
    /// Returns an iterator over the token slices.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.spans
            .iter()
            .map(|&(s, e)| &self.buffer[s as usize..e as usize])
    }

    /// Returns the number of tokens.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Returns `true` if there are no tokens.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn keep(token: &str) -> bool {
    token.chars().nth(1).is_some()
}

/// Tokenize text: lowercase, split on non-word characters, drop one-character runs.
pub fn tokenize(text: &str) -> Tokens {
    let buffer = text.to_lowercase();
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;

    for (i, c) in buffer.char_indices() {
        if is_word_char(c) {
            if start.is_none() {
                start = Some(i);
            }
        } else if let Some(s) = start {
            if keep(&buffer[s..i]) {
                spans.push((s as u32, i as u32));
            }
            start = None;
        }
    }
    // Handle last token (no trailing separator)
    if let Some(s) = start {
        if keep(&buffer[s..]) {
            spans.push((s as u32, buffer.len() as u32));
        }
    }

    Tokens { buffer, spans }
}
