//! The two library entry points: train a model to a location, and classify
//! text with the model at a location.
//!
//! Request and response types are serde structs so a transport layer can
//! expose them unchanged.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::classifier::naive_bayes::NaiveBayesClassifier;
use crate::classifier::types::{ClassifyOptions, LabeledDocument};
use crate::error::{Result, TopicaError};
use crate::pipeline::{TrainConfig, TrainingPipeline, TrainingReport};

/// Result of [`train`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainOutcome {
    /// Where the model was written.
    pub model_location: PathBuf,
    /// Accuracy on the held-out split, `None` without one.
    pub held_out_accuracy: Option<f64>,
    pub report: TrainingReport,
}

/// A classification request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifyRequest {
    pub text: String,
    #[serde(default)]
    pub include_distribution: bool,
    #[serde(default)]
    pub require_terms: bool,
}

impl ClassifyRequest {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            include_distribution: false,
            require_terms: false,
        }
    }
}

/// A classification response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifyResponse {
    pub category: String,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<BTreeMap<String, f64>>,
    pub processed_text: String,
}

/// Error body for a transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Whether the request itself was at fault.
    pub client_error: bool,
}

impl From<&TopicaError> for ErrorResponse {
    fn from(error: &TopicaError) -> Self {
        Self {
            error: error.to_string(),
            client_error: error.is_client_error(),
        }
    }
}

/// Train on `corpus` and save the model to `config.model_path`.
///
/// Fails with [`TopicaError::InvalidConfig`] when no model path is set.
pub fn train(corpus: Vec<LabeledDocument>, config: &TrainConfig) -> Result<TrainOutcome> {
    if config.model_path.is_none() {
        return Err(TopicaError::invalid_config("model_path is required to train"));
    }

    let output = TrainingPipeline::new(config.clone())?.run(corpus)?;
    let report = output.report;
    let model_location = report
        .model_location
        .clone()
        .ok_or_else(|| TopicaError::invalid_config("model was not saved"))?;

    Ok(TrainOutcome {
        model_location,
        held_out_accuracy: report.held_out_accuracy,
        report,
    })
}

/// Classify `text` with the model saved at `model_location`.
pub fn classify<P: AsRef<Path>>(text: &str, model_location: P) -> Result<ClassifyResponse> {
    classify_with(&ClassifyRequest::new(text), model_location)
}

/// Classify a full request with the model saved at `model_location`.
///
/// The model is loaded on every call; hold a [`NaiveBayesClassifier`] to
/// classify repeatedly against the same model.
pub fn classify_with<P: AsRef<Path>>(
    request: &ClassifyRequest,
    model_location: P,
) -> Result<ClassifyResponse> {
    let classifier = NaiveBayesClassifier::from_path(model_location)?;
    let options = ClassifyOptions {
        require_terms: request.require_terms,
        include_distribution: request.include_distribution,
    };
    let result = classifier.classify_with(&request.text, &options)?;

    Ok(ClassifyResponse {
        category: result.category,
        confidence: result.confidence,
        distribution: result.distribution,
        processed_text: result.processed_text,
    })
}
