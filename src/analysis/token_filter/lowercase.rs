//! Case folding so `NASA`, `Nasa` and `nasa` count as one term.

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// Folds every token to lowercase.
#[derive(Clone, Debug, Default)]
pub struct LowercaseFilter;

impl LowercaseFilter {
    pub fn new() -> Self {
        LowercaseFilter
    }

    fn fold(token: Token) -> Token {
        // Already-lowercase ASCII is the common case in newsgroup text.
        if token.text.is_ascii() {
            if token.text.bytes().any(|b| b.is_ascii_uppercase()) {
                let folded = token.text.to_ascii_lowercase();
                return token.with_text(folded);
            }
            return token;
        }
        let folded = token.text.to_lowercase();
        token.with_text(folded)
    }
}

impl Filter for LowercaseFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        Ok(Box::new(tokens.map(Self::fold)))
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folds_ascii_and_unicode() {
        let input = vec![
            Token::new("NASA", 0),
            Token::new("Shuttle", 1),
            Token::new("orbit", 2),
            Token::new("ÉCOLE", 3),
        ];
        let folded: Vec<String> = LowercaseFilter::new()
            .filter(Box::new(input.into_iter()))
            .unwrap()
            .map(|t| t.text)
            .collect();

        assert_eq!(folded, vec!["nasa", "shuttle", "orbit", "école"]);
    }

    #[test]
    fn test_positions_survive() {
        let input = vec![Token::with_offsets("Mars", 4, 10, 14)];
        let token = LowercaseFilter::new()
            .filter(Box::new(input.into_iter()))
            .unwrap()
            .next()
            .unwrap();

        assert_eq!(token.text, "mars");
        assert_eq!((token.position, token.start_offset, token.end_offset), (4, 10, 14));
    }
}
