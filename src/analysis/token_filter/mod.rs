//! Normalization and pruning applied after tokenization.
//!
//! Filters are applied in the order they were added to a
//! [`PipelineAnalyzer`](crate::analysis::analyzer::pipeline::PipelineAnalyzer).

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// A lazy rewrite of a token stream. Filters may map or drop tokens but
/// keep the original positions.
pub trait Filter: Send + Sync {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    fn name(&self) -> &'static str;
}

pub mod length;
pub mod lowercase;
pub mod numeric;
pub mod stop;

pub use length::MinLengthFilter;
pub use lowercase::LowercaseFilter;
pub use numeric::NumericFilter;
pub use stop::StopFilter;
