//! Greedy fixed-width reflow for forecast prose.
//!
//! Wrapping runs in two stages: [`tokenize`] turns text into a stream of
//! [`Token`]s, and [`fill`] packs that stream into lines. Original spacing is
//! not preserved, explicit newlines are. Widths count `char`s.

use crate::error::WrapError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Word(&'a str),
    /// An explicit newline in the source text.
    ForceBreak,
}

/// Split `text` into words, emitting a [`Token::ForceBreak`] for every newline.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();

    for (i, segment) in text.split('\n').enumerate() {
        if i > 0 {
            tokens.push(Token::ForceBreak);
        }
        tokens.extend(segment.split_whitespace().map(Token::Word));
    }

    tokens
}

/// Pack tokens into lines of at most `width` chars.
///
/// A word longer than `width` gets a line of its own and is never split.
/// Breaks on an empty line produce nothing, so blank lines never appear.
pub fn fill(tokens: &[Token<'_>], width: usize) -> Result<Vec<String>, WrapError> {
    if width == 0 {
        return Err(WrapError::InvalidWidth);
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    fn flush(lines: &mut Vec<String>, current: &mut String, current_len: &mut usize) {
        if !current.is_empty() {
            lines.push(std::mem::take(current));
            *current_len = 0;
        }
    }

    for token in tokens {
        match *token {
            Token::ForceBreak => flush(&mut lines, &mut current, &mut current_len),
            Token::Word(word) => {
                let word_len = word.chars().count();
                let projected = if current.is_empty() {
                    word_len
                } else {
                    current_len + 1 + word_len
                };

                if projected <= width {
                    if !current.is_empty() {
                        current.push(' ');
                    }
                    current.push_str(word);
                    current_len = projected;
                } else {
                    flush(&mut lines, &mut current, &mut current_len);
                    current.push_str(word);
                    current_len = word_len;
                }
            }
        }
    }
    flush(&mut lines, &mut current, &mut current_len);

    Ok(lines)
}

/// Reflow `text` into lines no wider than `width`.
pub fn wrap(text: &str, width: usize) -> Result<Vec<String>, WrapError> {
    fill(&tokenize(text), width)
}
