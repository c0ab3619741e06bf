//! Serializable description of an analysis pipeline.
//!
//! A model stores the [`AnalysisConfig`] it was trained with, and the
//! classifier rebuilds its analyzer from that copy. Terms are therefore
//! normalized the same way at training and at inference time, even when the
//! two run in different processes.
//!
//! # Examples
//!
//! ```
//! use topica::analysis::config::AnalysisConfig;
//! use topica::analysis::analyzer::Analyzer;
//!
//! let analyzer = AnalysisConfig::default().build().unwrap();
//! let terms = analyzer.terms("The NASA shuttle flew in 1993, didn't it?").unwrap();
//!
//! assert_eq!(terms, vec!["nasa", "shuttle", "flew"]);
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::PipelineAnalyzer;
use crate::analysis::token_filter::{LowercaseFilter, MinLengthFilter, NumericFilter, StopFilter};
use crate::analysis::tokenizer::regex::DEFAULT_PATTERN;
use crate::analysis::tokenizer::{RegexTokenizer, Tokenizer, UnicodeWordTokenizer};
use crate::error::Result;

/// Which tokenizer splits the raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TokenizerKind {
    /// Extract every match of a regular expression.
    Regex { pattern: String },
    /// Split on Unicode word boundaries.
    UnicodeWord,
}

impl Default for TokenizerKind {
    fn default() -> Self {
        TokenizerKind::Regex {
            pattern: DEFAULT_PATTERN.to_string(),
        }
    }
}

/// Stop-word policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopWords {
    /// Keep every word.
    None,
    /// The built-in English list.
    English,
    /// A caller-supplied list.
    Custom(Vec<String>),
}

/// Configuration of the term normalization pipeline.
///
/// Filters run in a fixed order: lowercase, stop words, minimum length,
/// numeric removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Tokenizer used to split the text.
    pub tokenizer: TokenizerKind,
    /// Lowercase every token.
    pub lowercase: bool,
    /// Stop words to drop.
    pub stop_words: StopWords,
    /// Drop tokens with fewer characters than this.
    pub min_token_length: usize,
    /// Drop tokens made only of digits.
    pub remove_numeric: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            tokenizer: TokenizerKind::default(),
            lowercase: true,
            stop_words: StopWords::English,
            min_token_length: 3,
            remove_numeric: true,
        }
    }
}

impl AnalysisConfig {
    /// A pipeline that only tokenizes and lowercases.
    pub fn minimal() -> Self {
        Self {
            stop_words: StopWords::None,
            min_token_length: 1,
            remove_numeric: false,
            ..Self::default()
        }
    }

    /// Build the analyzer described by this configuration.
    pub fn build(&self) -> Result<PipelineAnalyzer> {
        let tokenizer: Arc<dyn Tokenizer> = match &self.tokenizer {
            TokenizerKind::Regex { pattern } => Arc::new(RegexTokenizer::with_pattern(pattern)?),
            TokenizerKind::UnicodeWord => Arc::new(UnicodeWordTokenizer::new()),
        };

        let mut analyzer = PipelineAnalyzer::new(tokenizer);

        if self.lowercase {
            analyzer = analyzer.add_filter(Arc::new(LowercaseFilter::new()));
        }

        match &self.stop_words {
            StopWords::None => {}
            StopWords::English => {
                analyzer = analyzer.add_filter(Arc::new(StopFilter::new()));
            }
            StopWords::Custom(words) => {
                analyzer = analyzer.add_filter(Arc::new(StopFilter::from_words(words.clone())));
            }
        }

        if self.min_token_length > 1 {
            analyzer = analyzer.add_filter(Arc::new(MinLengthFilter::new(self.min_token_length)));
        }

        if self.remove_numeric {
            analyzer = analyzer.add_filter(Arc::new(NumericFilter::new()));
        }

        Ok(analyzer.with_name("topic"))
    }
}
