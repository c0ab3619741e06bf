//! Pattern-driven tokenizer.

use std::sync::Arc;

use regex::Regex;

use super::Tokenizer;
use crate::analysis::token::{Token, TokenStream};
use crate::error::{Result, TopicaError};

/// Runs of word characters and apostrophes, so `don't` stays one term.
pub const DEFAULT_PATTERN: &str = r"[\w']+";

/// Emits every non-overlapping match of a compiled pattern, in text order.
#[derive(Clone, Debug)]
pub struct RegexTokenizer {
    regex: Arc<Regex>,
}

impl RegexTokenizer {
    /// Tokenizer using [`DEFAULT_PATTERN`].
    pub fn new() -> Result<Self> {
        Self::with_pattern(DEFAULT_PATTERN)
    }

    /// Compile `pattern`; a malformed pattern is an analysis error.
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        match Regex::new(pattern) {
            Ok(regex) => Ok(RegexTokenizer {
                regex: Arc::new(regex),
            }),
            Err(e) => Err(TopicaError::analysis(format!(
                "cannot compile token pattern {pattern:?}: {e}"
            ))),
        }
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

impl Tokenizer for RegexTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let mut tokens = Vec::new();
        for (position, found) in self.regex.find_iter(text).enumerate() {
            tokens.push(Token::with_offsets(
                found.as_str(),
                position,
                found.start(),
                found.end(),
            ));
        }
        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "regex"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokenizer: &RegexTokenizer, input: &str) -> Vec<String> {
        tokenizer.tokenize(input).unwrap().map(|t| t.text).collect()
    }

    #[test]
    fn test_positions_and_offsets() {
        let tokenizer = RegexTokenizer::new().unwrap();
        let tokens: Vec<Token> = tokenizer.tokenize("Re: orbit  decay").unwrap().collect();

        let summary: Vec<(&str, usize, usize, usize)> = tokens
            .iter()
            .map(|t| (t.text.as_str(), t.position, t.start_offset, t.end_offset))
            .collect();
        assert_eq!(
            summary,
            vec![("Re", 0, 0, 2), ("orbit", 1, 4, 9), ("decay", 2, 11, 16)]
        );
    }

    #[test]
    fn test_punctuation_splits_but_apostrophes_stay() {
        let tokenizer = RegexTokenizer::new().unwrap();
        assert_eq!(
            texts(&tokenizer, "Don't panic -- re: NASA's (shuttle)!"),
            vec!["Don't", "panic", "re", "NASA's", "shuttle"]
        );
    }

    #[test]
    fn test_custom_pattern() {
        let tokenizer = RegexTokenizer::with_pattern(r"[A-Za-z]{3,}").unwrap();
        assert_eq!(tokenizer.pattern(), r"[A-Za-z]{3,}");
        assert_eq!(texts(&tokenizer, "my V8 engine, 1993"), vec!["engine"]);
    }

    #[test]
    fn test_nothing_to_match() {
        let tokenizer = RegexTokenizer::new().unwrap();
        assert!(texts(&tokenizer, "").is_empty());
        assert!(texts(&tokenizer, " ,;.! ").is_empty());
    }

    #[test]
    fn test_invalid_pattern() {
        let result = RegexTokenizer::with_pattern("[unclosed");
        assert!(matches!(result, Err(TopicaError::Analysis(_))));
    }
}
