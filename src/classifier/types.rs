//! Common types for topic classification.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A training document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledDocument {
    /// Raw document text.
    pub text: String,
    /// Category label.
    pub label: String,
}

impl LabeledDocument {
    pub fn new<T: Into<String>, L: Into<String>>(text: T, label: L) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
        }
    }
}

/// Options for a single classification call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifyOptions {
    /// Fail with `EmptyText` instead of falling back to the priors when the
    /// text yields no terms.
    pub require_terms: bool,
    /// Return the full posterior distribution over labels.
    pub include_distribution: bool,
}

/// The outcome of classifying one text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Predicted label.
    pub category: String,
    /// Posterior probability of the predicted label, in `[0, 1]`.
    pub confidence: f64,
    /// Posterior probability of every label, in canonical label order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<BTreeMap<String, f64>>,
    /// The normalized terms the text was reduced to, space separated.
    pub processed_text: String,
    /// Number of terms that were not part of the model vocabulary.
    pub oov_terms: u32,
}
