//! Text analysis for Topica.
//!
//! Turns raw text into the normalized terms the classifier counts. The
//! pipeline is tokenizer → filters, wrapped in an [`Analyzer`], and described
//! by a serializable [`AnalysisConfig`].

pub mod analyzer;
pub mod config;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

pub use analyzer::{Analyzer, PipelineAnalyzer};
pub use config::{AnalysisConfig, StopWords, TokenizerKind};
pub use token::{Token, TokenStream};
