//! The unit of text that moves between tokenizer, filters and classifier.
//!
//! ```
//! use topica::analysis::token::Token;
//!
//! let token = Token::with_offsets("orbit", 3, 17, 22);
//! assert_eq!(token.with_text("ORBIT").start_offset, 17);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    /// Index in the tokenizer output. Filters never renumber.
    pub position: usize,
    /// Byte range in the source text.
    pub start_offset: usize,
    pub end_offset: usize,
}

impl Token {
    /// Token not tied to a source string; the range covers the text itself.
    pub fn new<S: Into<String>>(text: S, position: usize) -> Self {
        let text = text.into();
        let end_offset = text.len();
        Token {
            text,
            position,
            start_offset: 0,
            end_offset,
        }
    }

    pub fn with_offsets<S: Into<String>>(
        text: S,
        position: usize,
        start_offset: usize,
        end_offset: usize,
    ) -> Self {
        Token {
            text: text.into(),
            position,
            start_offset,
            end_offset,
        }
    }

    /// Length in chars, which is what minimum-length pruning compares.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Same position and offsets, new text.
    pub fn with_text<S: Into<String>>(&self, text: S) -> Self {
        Token {
            text: text.into(),
            ..self.clone()
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

pub type TokenStream = Box<dyn Iterator<Item = Token>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_len_counts_characters() {
        let token = Token::new("café", 0);
        assert_eq!(token.char_len(), 4);
        assert_eq!(token.end_offset, 5);
    }

    #[test]
    fn test_with_text_keeps_offsets() {
        let token = Token::with_offsets("Galaxy", 2, 10, 16);
        let lowered = token.with_text("galaxy");
        assert_eq!(lowered, Token::with_offsets("galaxy", 2, 10, 16));
    }
}
