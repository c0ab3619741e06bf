//! Numeric token filter implementation.

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// A filter that drops tokens consisting only of numeric characters.
///
/// Mixed tokens such as `486dx` or `mp3` are kept; only pure numbers like
/// `1993` are removed.
#[derive(Clone, Debug, Default)]
pub struct NumericFilter;

impl NumericFilter {
    /// Create a new numeric filter.
    pub fn new() -> Self {
        NumericFilter
    }

    fn is_numeric(text: &str) -> bool {
        !text.is_empty() && text.chars().all(char::is_numeric)
    }
}

impl Filter for NumericFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        Ok(Box::new(tokens.filter(|token| !Self::is_numeric(&token.text))))
    }

    fn name(&self) -> &'static str {
        "numeric"
    }
}
