//! The one analyzer shape used for topic classification: a tokenizer
//! followed by an ordered chain of filters.
//!
//! ```
//! use std::sync::Arc;
//!
//! use topica::analysis::analyzer::Analyzer;
//! use topica::analysis::analyzer::pipeline::PipelineAnalyzer;
//! use topica::analysis::token_filter::lowercase::LowercaseFilter;
//! use topica::analysis::token_filter::stop::StopFilter;
//! use topica::analysis::tokenizer::regex::RegexTokenizer;
//!
//! let analyzer = PipelineAnalyzer::new(Arc::new(RegexTokenizer::new().unwrap()))
//!     .add_filter(Arc::new(LowercaseFilter::new()))
//!     .add_filter(Arc::new(StopFilter::from_words(vec!["the", "to"])));
//!
//! let terms = analyzer.terms("The Shuttle returned to ORBIT").unwrap();
//! assert_eq!(terms, vec!["shuttle", "returned", "orbit"]);
//! ```

use std::fmt;
use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

#[derive(Clone)]
pub struct PipelineAnalyzer {
    name: String,
    tokenizer: Arc<dyn Tokenizer>,
    filters: Vec<Arc<dyn Filter>>,
}

impl PipelineAnalyzer {
    /// Starts a pipeline with no filters, named after its tokenizer.
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        let name = format!("pipeline_{}", tokenizer.name());
        PipelineAnalyzer {
            name,
            tokenizer,
            filters: Vec::new(),
        }
    }

    /// Appends `filter`; filters run in the order they were added.
    pub fn add_filter(mut self, filter: Arc<dyn Filter>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    pub fn tokenizer(&self) -> &Arc<dyn Tokenizer> {
        &self.tokenizer
    }

    pub fn filters(&self) -> &[Arc<dyn Filter>] {
        &self.filters
    }
}

impl Analyzer for PipelineAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        let tokens = self.tokenizer.tokenize(text)?;
        self.filters
            .iter()
            .try_fold(tokens, |stream, filter| filter.filter(stream))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for PipelineAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stages: Vec<&str> = std::iter::once(self.tokenizer().name())
            .chain(self.filters().iter().map(|filter| filter.name()))
            .collect();
        write!(f, "PipelineAnalyzer({}: {})", self.name, stages.join(" -> "))
    }
}
