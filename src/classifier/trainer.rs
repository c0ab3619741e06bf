//! Multinomial Naive Bayes training with additive smoothing.
//!
//! For label `c`, vocabulary size `V` and smoothing constant `α`:
//!
//! ```text
//! P(c)       = docs(c) / docs
//! P(t | c)   = (count(t, c) + α) / (total(c) + α (V + 1))
//! P(oov | c) = α / (total(c) + α (V + 1))
//! ```
//!
//! where `total(c)` counts in-vocabulary term occurrences in documents of
//! label `c`. The extra `+ 1` in the denominator is the OOV slot.
//!
//! Documents are analyzed in parallel; per-label counts are combined by
//! integer addition, so the result does not depend on scheduling.

use chrono::Utc;
use log::{debug, info};
use rayon::prelude::*;

use crate::analysis::{AnalysisConfig, Analyzer};
use crate::classifier::features::{FeatureExtractor, FeatureVector};
use crate::classifier::label::LabelSet;
use crate::classifier::model::{Model, ModelMetadata};
use crate::classifier::types::LabeledDocument;
use crate::classifier::vocabulary::VocabularyBuilder;
use crate::error::{Result, TopicaError};

/// Default additive smoothing constant (Laplace smoothing).
pub const DEFAULT_SMOOTHING_ALPHA: f64 = 1.0;

/// Trains [`Model`]s from labeled documents.
#[derive(Debug, Clone)]
pub struct Trainer {
    analysis: AnalysisConfig,
    vocabulary: VocabularyBuilder,
    smoothing_alpha: f64,
}

impl Default for Trainer {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig::default(),
            vocabulary: VocabularyBuilder::default(),
            smoothing_alpha: DEFAULT_SMOOTHING_ALPHA,
        }
    }
}

impl Trainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Analysis pipeline used to turn documents into terms.
    pub fn with_analysis(mut self, analysis: AnalysisConfig) -> Self {
        self.analysis = analysis;
        self
    }

    /// Vocabulary cut-offs.
    pub fn with_vocabulary(mut self, vocabulary: VocabularyBuilder) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    /// Additive smoothing constant `α`.
    pub fn with_smoothing_alpha(mut self, alpha: f64) -> Self {
        self.smoothing_alpha = alpha;
        self
    }

    /// Check the configuration without training.
    pub fn validate(&self) -> Result<()> {
        if !(self.smoothing_alpha.is_finite() && self.smoothing_alpha > 0.0) {
            return Err(TopicaError::invalid_config(format!(
                "smoothing_alpha must be a positive number, got {}",
                self.smoothing_alpha
            )));
        }
        self.vocabulary.validate()
    }

    /// Train a model over `documents` for the given label set.
    ///
    /// Either returns a valid model or fails before producing anything:
    ///
    /// - [`TopicaError::EmptyCorpus`] when `documents` is empty,
    /// - [`TopicaError::InvalidLabel`] when a document's label is not in `labels`,
    /// - [`TopicaError::UnrepresentedLabel`] when a label has no documents.
    pub fn train(&self, documents: &[LabeledDocument], labels: &LabelSet) -> Result<Model> {
        self.validate()?;

        if documents.is_empty() {
            return Err(TopicaError::EmptyCorpus);
        }

        let label_indices = documents
            .iter()
            .map(|doc| {
                labels
                    .index_of(&doc.label)
                    .ok_or_else(|| TopicaError::invalid_label(doc.label.clone()))
            })
            .collect::<Result<Vec<usize>>>()?;

        let analyzer = self.analysis.build()?;
        let terms = documents
            .par_iter()
            .map(|doc| analyzer.terms(&doc.text))
            .collect::<Result<Vec<Vec<String>>>>()?;

        let vocabulary = self.vocabulary.build(terms.iter().map(Vec::as_slice))?;
        let extractor = FeatureExtractor::new(&vocabulary);

        let counts = terms
            .par_iter()
            .zip(label_indices.par_iter())
            .fold(
                || LabelCounts::new(labels.len(), vocabulary.len()),
                |mut counts, (terms, &label)| {
                    counts.add(label, &extractor.extract(terms.as_slice()));
                    counts
                },
            )
            .reduce(
                || LabelCounts::new(labels.len(), vocabulary.len()),
                LabelCounts::merge,
            );

        if let Some(index) = counts.documents.iter().position(|&n| n == 0) {
            let label = labels.get(index).unwrap_or_default();
            return Err(TopicaError::UnrepresentedLabel(label.to_string()));
        }

        let n_documents = documents.len() as f64;
        let alpha = self.smoothing_alpha;
        let slots = alpha * (vocabulary.len() as f64 + 1.0);

        let log_priors: Vec<f64> = counts
            .documents
            .iter()
            .map(|&n| (n as f64).ln() - n_documents.ln())
            .collect();

        let mut log_likelihoods = Vec::with_capacity(labels.len());
        let mut log_oov_likelihoods = Vec::with_capacity(labels.len());
        for (label, row) in counts.terms.iter().enumerate() {
            let log_denominator = (counts.totals[label] as f64 + slots).ln();
            log_likelihoods.push(
                row.iter()
                    .map(|&count| (count as f64 + alpha).ln() - log_denominator)
                    .collect::<Vec<f64>>(),
            );
            log_oov_likelihoods.push(alpha.ln() - log_denominator);

            debug!(
                "Label {:?}: {} documents, {} terms",
                labels.get(label).unwrap_or_default(),
                counts.documents[label],
                counts.totals[label]
            );
        }

        info!(
            "Trained model on {} documents: {} labels, {} vocabulary terms",
            documents.len(),
            labels.len(),
            vocabulary.len()
        );

        let metadata = ModelMetadata {
            documents: documents.len(),
            label_documents: counts.documents.iter().map(|&n| n as usize).collect(),
            label_terms: counts.totals,
            trained_at: Utc::now(),
        };

        Model::new(
            labels.clone(),
            vocabulary,
            self.analysis.clone(),
            alpha,
            log_priors,
            log_likelihoods,
            log_oov_likelihoods,
            metadata,
        )
    }
}

/// Partial per-label counts; the unit of the parallel reduction.
#[derive(Debug, Clone, PartialEq)]
struct LabelCounts {
    /// Documents per label.
    documents: Vec<u64>,
    /// Term occurrences per label and term id.
    terms: Vec<Vec<u64>>,
    /// In-vocabulary term occurrences per label.
    totals: Vec<u64>,
}

impl LabelCounts {
    fn new(n_labels: usize, n_terms: usize) -> Self {
        Self {
            documents: vec![0; n_labels],
            terms: vec![vec![0; n_terms]; n_labels],
            totals: vec![0; n_labels],
        }
    }

    fn add(&mut self, label: usize, features: &FeatureVector) {
        self.documents[label] += 1;
        for &(id, count) in &features.counts {
            self.terms[label][id as usize] += count as u64;
            self.totals[label] += count as u64;
        }
    }

    fn merge(mut self, other: Self) -> Self {
        for (a, b) in self.documents.iter_mut().zip(other.documents) {
            *a += b;
        }
        for (row, other_row) in self.terms.iter_mut().zip(other.terms) {
            for (a, b) in row.iter_mut().zip(other_row) {
                *a += b;
            }
        }
        for (a, b) in self.totals.iter_mut().zip(other.totals) {
            *a += b;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<LabeledDocument> {
        vec![
            LabeledDocument::new("cheap car for sale", "misc.forsale"),
            LabeledDocument::new("car engine repair", "misc.forsale"),
            LabeledDocument::new("galaxy telescope star", "sci.space"),
            LabeledDocument::new("nasa telescope mission", "sci.space"),
        ]
    }

    #[test]
    fn test_priors_match_label_frequencies() {
        let mut docs = corpus();
        docs.push(LabeledDocument::new("orbit launch", "sci.space"));
        docs.push(LabeledDocument::new("shuttle orbit", "sci.space"));
        let labels = LabelSet::from_documents(&docs).unwrap();

        let model = Trainer::new().train(&docs, &labels).unwrap();
        let priors = model.priors();

        assert!((priors[0] - 2.0 / 6.0).abs() < 1e-12);
        assert!((priors[1] - 4.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_smoothing_keeps_every_likelihood_positive() {
        let docs = corpus();
        let labels = LabelSet::from_documents(&docs).unwrap();
        let model = Trainer::new().train(&docs, &labels).unwrap();

        let space = labels.index_of("sci.space").unwrap();
        let engine = model.vocabulary().id("engine").unwrap();

        for label in 0..labels.len() {
            for &log_p in model.log_likelihoods(label) {
                assert!(log_p.is_finite());
                assert!(log_p.exp() > 0.0);
            }
            assert!(model.log_oov_likelihood(label).is_finite());
        }

        // "engine" never appears in sci.space: (0 + 1) / (total + 1 * (V + 1))
        let vocabulary_size = model.vocabulary().len() as f64;
        let total = model.metadata().label_terms[space] as f64;
        assert_eq!(total, 6.0);
        let expected = 1.0 / (total + vocabulary_size + 1.0);
        assert!((model.log_likelihood(space, engine).exp() - expected).abs() < 1e-12);
        assert!((model.log_oov_likelihood(space).exp() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_likelihood_formula() {
        let docs = corpus();
        let labels = LabelSet::from_documents(&docs).unwrap();
        let model = Trainer::new()
            .with_smoothing_alpha(0.5)
            .train(&docs, &labels)
            .unwrap();

        let space = labels.index_of("sci.space").unwrap();
        let telescope = model.vocabulary().id("telescope").unwrap();
        let v = model.vocabulary().len() as f64;
        let total = model.metadata().label_terms[space] as f64;

        let expected = (2.0 + 0.5) / (total + 0.5 * (v + 1.0));
        assert!((model.log_likelihood(space, telescope).exp() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_empty_corpus() {
        let labels = LabelSet::new(vec!["a"]).unwrap();
        let result = Trainer::new().train(&[], &labels);
        assert!(matches!(result, Err(TopicaError::EmptyCorpus)));
    }

    #[test]
    fn test_label_outside_set() {
        let docs = corpus();
        let labels = LabelSet::new(vec!["misc.forsale"]).unwrap();
        let result = Trainer::new().train(&docs, &labels);
        assert!(matches!(result, Err(TopicaError::InvalidLabel(l)) if l == "sci.space"));
    }

    #[test]
    fn test_label_without_documents() {
        let docs = corpus();
        let labels = LabelSet::new(vec!["misc.forsale", "rec.autos", "sci.space"]).unwrap();
        let result = Trainer::new().train(&docs, &labels);
        assert!(matches!(result, Err(TopicaError::UnrepresentedLabel(l)) if l == "rec.autos"));
    }

    #[test]
    fn test_invalid_alpha() {
        let docs = corpus();
        let labels = LabelSet::from_documents(&docs).unwrap();
        for alpha in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = Trainer::new().with_smoothing_alpha(alpha).train(&docs, &labels);
            assert!(matches!(result, Err(TopicaError::InvalidConfig(_))));
        }
    }

    #[test]
    fn test_training_is_deterministic() {
        let docs = corpus();
        let labels = LabelSet::from_documents(&docs).unwrap();
        let a = Trainer::new().train(&docs, &labels).unwrap();

        let mut reversed = docs.clone();
        reversed.reverse();
        let b = Trainer::new().train(&reversed, &labels).unwrap();

        assert_eq!(a.log_priors(), b.log_priors());
        assert_eq!(a.vocabulary(), b.vocabulary());
        for label in 0..labels.len() {
            assert_eq!(a.log_likelihoods(label), b.log_likelihoods(label));
            assert_eq!(a.log_oov_likelihood(label), b.log_oov_likelihood(label));
        }
    }

    #[test]
    fn test_label_counts_merge() {
        let mut a = LabelCounts::new(2, 2);
        a.add(0, &FeatureVector { counts: vec![(1, 2)], oov_count: 3 });
        let mut b = LabelCounts::new(2, 2);
        b.add(1, &FeatureVector { counts: vec![(0, 1), (1, 1)], oov_count: 0 });

        let merged = a.clone().merge(b.clone());
        assert_eq!(merged, b.merge(a));
        assert_eq!(merged.documents, vec![1, 1]);
        assert_eq!(merged.terms, vec![vec![0, 2], vec![1, 1]]);
        assert_eq!(merged.totals, vec![2, 2]);
    }
}
