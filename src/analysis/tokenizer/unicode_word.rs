//! Tokenizer backed by UAX #29 word boundaries.
//!
//! Boundary segments that hold no letter or digit (spaces, punctuation runs)
//! are dropped; positions count only the kept segments.

use unicode_segmentation::UnicodeSegmentation;

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

#[derive(Clone, Debug, Default)]
pub struct UnicodeWordTokenizer;

impl UnicodeWordTokenizer {
    pub fn new() -> Self {
        UnicodeWordTokenizer
    }
}

fn is_word(segment: &str) -> bool {
    segment.chars().any(char::is_alphanumeric)
}

impl Tokenizer for UnicodeWordTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let mut tokens = Vec::new();
        for (start, segment) in text.split_word_bound_indices() {
            if is_word(segment) {
                let position = tokens.len();
                tokens.push(Token::with_offsets(
                    segment,
                    position,
                    start,
                    start + segment.len(),
                ));
            }
        }
        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "unicode_word"
    }
}
