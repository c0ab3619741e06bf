//! # Topica
//!
//! Topic classification of free-form text with multinomial Naive Bayes.
//!
//! ## Features
//!
//! - Configurable, persisted text analysis pipeline
//! - Document-frequency vocabulary cut-offs
//! - Additive smoothing with an explicit out-of-vocabulary term
//! - Log-space scoring with normalized confidences
//! - Versioned, checksummed model files with atomic writes
//! - Seeded, stratified train/eval splits with per-label metrics
//!
//! ## Example
//!
//! ```
//! use topica::prelude::*;
//!
//! let docs = vec![
//!     LabeledDocument::new("cheap car for sale", "misc.forsale"),
//!     LabeledDocument::new("car engine repair", "misc.forsale"),
//!     LabeledDocument::new("galaxy telescope star", "sci.space"),
//!     LabeledDocument::new("nasa telescope mission", "sci.space"),
//! ];
//! let labels = LabelSet::from_documents(&docs).unwrap();
//! let model = Trainer::new().train(&docs, &labels).unwrap();
//! let classifier = NaiveBayesClassifier::new(model).unwrap();
//!
//! let result = classifier.classify("telescope mission to galaxy").unwrap();
//! assert_eq!(result.category, "sci.space");
//! assert!(result.confidence > 0.5);
//! ```

pub mod analysis;
pub mod api;
pub mod classifier;
pub mod cli;
pub mod corpus;
pub mod error;
pub mod pipeline;
pub mod store;

pub mod prelude {
    pub use crate::analysis::{AnalysisConfig, Analyzer};
    pub use crate::classifier::{
        Classification, ClassifyOptions, LabelSet, LabeledDocument, Model, NaiveBayesClassifier,
        Trainer,
    };
    pub use crate::error::{Result, TopicaError};
    pub use crate::pipeline::{TrainConfig, TrainingPipeline};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
