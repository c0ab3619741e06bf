//! Topic classification with multinomial Naive Bayes.
//!
//! Training turns labeled documents into a [`Model`]:
//!
//! ```text
//! documents → analyzer → VocabularyBuilder → FeatureExtractor → Trainer → Model
//! ```
//!
//! and inference scores new text against it with a [`NaiveBayesClassifier`].
//! Models are plain data; persist them with [`crate::store`].

pub mod evaluation;
pub mod features;
pub mod label;
pub mod model;
pub mod naive_bayes;
pub mod trainer;
pub mod types;
pub mod vocabulary;

pub use evaluation::{Evaluation, LabelMetrics, evaluate};
pub use features::{FeatureExtractor, FeatureVector};
pub use label::{LabelSet, NEWSGROUPS};
pub use model::{Model, ModelMetadata};
pub use naive_bayes::NaiveBayesClassifier;
pub use trainer::{DEFAULT_SMOOTHING_ALPHA, Trainer};
pub use types::{Classification, ClassifyOptions, LabeledDocument};
pub use vocabulary::{Vocabulary, VocabularyBuilder};
