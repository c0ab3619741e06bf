//! The trained multinomial Naive Bayes model.
//!
//! All probabilities are stored as natural logarithms. For every label `c`:
//!
//! - `log_priors[c] = ln P(c)`
//! - `log_likelihoods[c][t] = ln P(t | c)` for each vocabulary term `t`
//! - `log_oov_likelihoods[c] = ln P(oov | c)`
//!
//! Smoothing reserves one slot per label for the OOV pseudo-term, so each
//! likelihood row together with its OOV entry sums to one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisConfig;
use crate::classifier::label::LabelSet;
use crate::classifier::vocabulary::Vocabulary;
use crate::error::{Result, TopicaError};

/// Tolerance used when checking that stored distributions sum to one.
pub const SIMPLEX_TOLERANCE: f64 = 1e-6;

/// Training statistics recorded alongside the parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Number of training documents.
    pub documents: usize,
    /// Training documents per label, in canonical label order.
    pub label_documents: Vec<usize>,
    /// In-vocabulary term occurrences per label, in canonical label order.
    pub label_terms: Vec<u64>,
    /// When training finished.
    pub trained_at: DateTime<Utc>,
}

/// A trained classifier model.
///
/// Instances are immutable; construct them with [`Trainer`] or load them
/// with [`store::load`].
///
/// [`Trainer`]: crate::classifier::trainer::Trainer
/// [`store::load`]: crate::store::load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    labels: LabelSet,
    vocabulary: Vocabulary,
    analysis: AnalysisConfig,
    smoothing_alpha: f64,
    log_priors: Vec<f64>,
    log_likelihoods: Vec<Vec<f64>>,
    log_oov_likelihoods: Vec<f64>,
    metadata: ModelMetadata,
}

impl Model {
    /// Assemble a model and check its invariants.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        labels: LabelSet,
        vocabulary: Vocabulary,
        analysis: AnalysisConfig,
        smoothing_alpha: f64,
        log_priors: Vec<f64>,
        log_likelihoods: Vec<Vec<f64>>,
        log_oov_likelihoods: Vec<f64>,
        metadata: ModelMetadata,
    ) -> Result<Self> {
        let model = Self {
            labels,
            vocabulary,
            analysis,
            smoothing_alpha,
            log_priors,
            log_likelihoods,
            log_oov_likelihoods,
            metadata,
        };
        model.validate()?;
        Ok(model)
    }

    /// Check the structural and probabilistic invariants.
    ///
    /// Fails with [`TopicaError::CorruptModel`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        let n_labels = self.labels.len();
        let n_terms = self.vocabulary.len();

        if !(self.smoothing_alpha.is_finite() && self.smoothing_alpha > 0.0) {
            return Err(TopicaError::corrupt(format!(
                "smoothing alpha {} is not a positive number",
                self.smoothing_alpha
            )));
        }

        if self.log_priors.len() != n_labels
            || self.log_likelihoods.len() != n_labels
            || self.log_oov_likelihoods.len() != n_labels
        {
            return Err(TopicaError::corrupt(format!(
                "expected {n_labels} labels, found {} priors, {} likelihood rows and {} OOV entries",
                self.log_priors.len(),
                self.log_likelihoods.len(),
                self.log_oov_likelihoods.len()
            )));
        }

        if self.metadata.label_documents.len() != n_labels
            || self.metadata.label_terms.len() != n_labels
        {
            return Err(TopicaError::corrupt(
                "metadata does not match the label set",
            ));
        }

        check_distribution("priors", self.log_priors.iter().copied())?;

        for (index, row) in self.log_likelihoods.iter().enumerate() {
            let label = self.labels.get(index).unwrap_or_default();
            if row.len() != n_terms {
                return Err(TopicaError::corrupt(format!(
                    "likelihood row for {label:?} has {} entries, vocabulary has {n_terms}",
                    row.len()
                )));
            }
            check_distribution(
                &format!("likelihoods of {label:?}"),
                row.iter()
                    .copied()
                    .chain(std::iter::once(self.log_oov_likelihoods[index])),
            )?;
        }

        Ok(())
    }

    /// The label set, in canonical order.
    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// The analysis pipeline the model was trained with.
    pub fn analysis(&self) -> &AnalysisConfig {
        &self.analysis
    }

    pub fn smoothing_alpha(&self) -> f64 {
        self.smoothing_alpha
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    /// Log prior of every label.
    pub fn log_priors(&self) -> &[f64] {
        &self.log_priors
    }

    /// Log likelihood row of one label, indexed by term id.
    pub fn log_likelihoods(&self, label: usize) -> &[f64] {
        &self.log_likelihoods[label]
    }

    /// Log likelihood of one (label, term) pair.
    pub fn log_likelihood(&self, label: usize, term: u32) -> f64 {
        self.log_likelihoods[label][term as usize]
    }

    /// Log likelihood of the OOV pseudo-term for one label.
    pub fn log_oov_likelihood(&self, label: usize) -> f64 {
        self.log_oov_likelihoods[label]
    }

    /// Priors in probability space.
    pub fn priors(&self) -> Vec<f64> {
        self.log_priors.iter().map(|p| p.exp()).collect()
    }

    /// The `n` most likely terms of a label, most likely first.
    pub fn top_terms(&self, label: usize, n: usize) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(u32, f64)> = self.log_likelihoods[label]
            .iter()
            .enumerate()
            .map(|(id, &log_p)| (id as u32, log_p))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked
            .into_iter()
            .take(n)
            .filter_map(|(id, log_p)| self.vocabulary.term(id).map(|t| (t, log_p)))
            .collect()
    }
}

/// Checks that `log_values` are finite log probabilities whose exponentials
/// sum to one.
fn check_distribution<I>(what: &str, log_values: I) -> Result<()>
where
    I: IntoIterator<Item = f64>,
{
    let mut sum = 0.0;
    for value in log_values {
        if !value.is_finite() || value > 0.0 {
            return Err(TopicaError::corrupt(format!(
                "{what} contain an invalid log probability {value}"
            )));
        }
        sum += value.exp();
    }

    if (sum - 1.0).abs() > SIMPLEX_TOLERANCE {
        return Err(TopicaError::corrupt(format!(
            "{what} sum to {sum}, expected 1"
        )));
    }
    Ok(())
}
