//! Analyzers combine a tokenizer with a chain of filters.
//!
//! ```text
//! Raw Text → Analyzer → Terms
//!             ↓
//!         Tokenizer
//!             ↓
//!         Filter 1 … Filter N
//! ```
//!
//! The classifier never talks to tokenizers or filters directly; it only sees
//! an [`Analyzer`]. Training and inference both build theirs from the same
//! persisted [`AnalysisConfig`](crate::analysis::config::AnalysisConfig), which
//! keeps term normalization identical across the two.

pub mod pipeline;

pub use pipeline::PipelineAnalyzer;

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Text to terms. Shared across rayon workers during training and across
/// threads during classification.
pub trait Analyzer: Send + Sync {
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    fn name(&self) -> &str;

    /// The bag-of-words view: term strings in document order.
    fn terms(&self, text: &str) -> Result<Vec<String>> {
        Ok(self.analyze(text)?.map(|token| token.text).collect())
    }
}
