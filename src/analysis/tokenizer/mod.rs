//! Tokenizers split raw text into a stream of tokens.
//!
//! - [`RegexTokenizer`] extracts every match of a pattern (default `[\w']+`)
//! - [`UnicodeWordTokenizer`] follows Unicode word boundaries (UAX #29)

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// First stage of every analyzer: raw text in, positioned tokens out.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Stable identifier, also used in analyzer names and debug output.
    fn name(&self) -> &'static str;
}

pub mod regex;
pub mod unicode_word;

pub use self::regex::RegexTokenizer;
pub use unicode_word::UnicodeWordTokenizer;
