//! Minimum length filter implementation.

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// A filter that drops tokens shorter than a minimum number of characters.
///
/// Length is measured in Unicode scalar values, not bytes.
#[derive(Clone, Debug)]
pub struct MinLengthFilter {
    min_length: usize,
}

impl MinLengthFilter {
    /// Create a filter that keeps tokens with at least `min_length` characters.
    pub fn new(min_length: usize) -> Self {
        MinLengthFilter { min_length }
    }

    /// The minimum number of characters a token must have.
    pub fn min_length(&self) -> usize {
        self.min_length
    }
}

impl Filter for MinLengthFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let min_length = self.min_length;
        Ok(Box::new(
            tokens.filter(move |token| token.char_len() >= min_length),
        ))
    }

    fn name(&self) -> &'static str {
        "min_length"
    }
}
