//! Error types for the Topica library.
//!
//! All fallible operations return [`Result`], whose error type is the
//! [`TopicaError`] enum. Variants are grouped by the phase that raises them:
//! training (corpus and label validity), persistence (model artifact
//! validity) and inference.
//!
//! # Examples
//!
//! ```
//! use topica::error::{Result, TopicaError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(TopicaError::invalid_config("smoothing_alpha must be positive"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The main error type for Topica operations.
///
/// None of these errors are transient: they describe malformed input or a
/// malformed artifact, so the library never retries internally.
#[derive(Error, Debug)]
pub enum TopicaError {
    /// Training was requested with zero documents.
    #[error("Empty corpus: at least one training document is required")]
    EmptyCorpus,

    /// A training document carries a label outside the label set.
    #[error("Invalid label: {0:?} is not part of the label set")]
    InvalidLabel(String),

    /// A label of the label set has no training documents, so its prior is zero.
    #[error("Unrepresented label: {0:?} has no training documents")]
    UnrepresentedLabel(String),

    /// No model exists at the given location.
    #[error("Model not found: {}", .0.display())]
    ModelNotFound(PathBuf),

    /// The persisted model was written in a format this build cannot read.
    #[error("Incompatible model version: found {found}, expected {expected}")]
    IncompatibleModelVersion { found: String, expected: String },

    /// The persisted model violates a structural invariant.
    #[error("Corrupt model: {0}")]
    CorruptModel(String),

    /// The text produced no terms and the caller asked for non-trivial input.
    #[error("Empty text: the input contains no classifiable terms")]
    EmptyText,

    /// Invalid configuration values.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Analysis-related errors (tokenizer construction, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Corpus loading errors
    #[error("Corpus error: {0}")]
    Corpus(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with TopicaError.
pub type Result<T> = std::result::Result<T, TopicaError>;

impl TopicaError {
    /// Create a new invalid label error.
    pub fn invalid_label<S: Into<String>>(label: S) -> Self {
        TopicaError::InvalidLabel(label.into())
    }

    /// Create a new corrupt model error.
    pub fn corrupt<S: Into<String>>(msg: S) -> Self {
        TopicaError::CorruptModel(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        TopicaError::InvalidConfig(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        TopicaError::Analysis(msg.into())
    }

    /// Create a new corpus error.
    pub fn corpus<S: Into<String>>(msg: S) -> Self {
        TopicaError::Corpus(msg.into())
    }

    /// Whether the error was caused by the caller's input rather than by the
    /// persisted model or the environment.
    ///
    /// A request layer maps these to 4xx responses and everything else to 5xx.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            TopicaError::EmptyCorpus
                | TopicaError::InvalidLabel(_)
                | TopicaError::UnrepresentedLabel(_)
                | TopicaError::EmptyText
                | TopicaError::InvalidConfig(_)
                | TopicaError::Corpus(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = TopicaError::invalid_label("rec.pets");
        assert_eq!(
            error.to_string(),
            "Invalid label: \"rec.pets\" is not part of the label set"
        );

        let error = TopicaError::corrupt("priors do not sum to 1");
        assert_eq!(error.to_string(), "Corrupt model: priors do not sum to 1");

        let error = TopicaError::IncompatibleModelVersion {
            found: "2".to_string(),
            expected: "1".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Incompatible model version: found 2, expected 1"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let topica_error = TopicaError::from(io_error);

        match topica_error {
            TopicaError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_client_error_classification() {
        assert!(TopicaError::EmptyText.is_client_error());
        assert!(TopicaError::EmptyCorpus.is_client_error());
        assert!(!TopicaError::ModelNotFound(PathBuf::from("model.json")).is_client_error());
        assert!(!TopicaError::corrupt("bad").is_client_error());
    }
}
