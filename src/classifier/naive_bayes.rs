//! Multinomial Naive Bayes inference.

use std::collections::BTreeMap;
use std::path::Path;

use crate::analysis::{Analyzer, PipelineAnalyzer};
use crate::classifier::features::{FeatureExtractor, FeatureVector};
use crate::classifier::model::Model;
use crate::classifier::types::{Classification, ClassifyOptions};
use crate::error::{Result, TopicaError};
use crate::store;

/// Classifies text against a trained [`Model`].
///
/// The classifier owns an immutable model and the analyzer rebuilt from the
/// model's analysis configuration. It is `Send + Sync`; wrap it in an `Arc` to
/// serve concurrent requests without locking.
///
/// # Examples
///
/// ```
/// use topica::classifier::{LabelSet, LabeledDocument, NaiveBayesClassifier, Trainer};
///
/// let docs = vec![
///     LabeledDocument::new("cheap car for sale", "misc.forsale"),
///     LabeledDocument::new("car engine repair", "misc.forsale"),
///     LabeledDocument::new("galaxy telescope star", "sci.space"),
///     LabeledDocument::new("nasa telescope mission", "sci.space"),
/// ];
/// let labels = LabelSet::from_documents(&docs).unwrap();
/// let model = Trainer::new().train(&docs, &labels).unwrap();
///
/// let classifier = NaiveBayesClassifier::new(model).unwrap();
/// let result = classifier.classify("telescope mission to galaxy").unwrap();
/// assert_eq!(result.category, "sci.space");
/// ```
#[derive(Debug)]
pub struct NaiveBayesClassifier {
    model: Model,
    analyzer: PipelineAnalyzer,
}

impl NaiveBayesClassifier {
    /// Wrap a model, rebuilding the analyzer it was trained with.
    pub fn new(model: Model) -> Result<Self> {
        let analyzer = model.analysis().build()?;
        Ok(Self { model, analyzer })
    }

    /// Load a persisted model and wrap it.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(store::load(path)?)
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Classify with default options.
    pub fn classify(&self, text: &str) -> Result<Classification> {
        self.classify_with(text, &ClassifyOptions::default())
    }

    /// Classify a text.
    ///
    /// A text without terms is classified by the priors alone, unless
    /// `options.require_terms` is set, in which case it fails with
    /// [`TopicaError::EmptyText`].
    pub fn classify_with(&self, text: &str, options: &ClassifyOptions) -> Result<Classification> {
        let terms = self.analyzer.terms(text)?;
        let features = FeatureExtractor::new(self.model.vocabulary()).extract(terms.as_slice());

        if options.require_terms && features.is_empty() {
            return Err(TopicaError::EmptyText);
        }

        let scores = self.scores(&features);
        let best = argmax(&scores);
        let posterior = softmax(&scores);

        let labels = self.model.labels();
        let category = labels.get(best).unwrap_or_default().to_string();

        let distribution = options.include_distribution.then(|| {
            labels
                .iter()
                .zip(&posterior)
                .map(|(label, &p)| (label.to_string(), p))
                .collect::<BTreeMap<String, f64>>()
        });

        Ok(Classification {
            category,
            confidence: posterior[best],
            distribution,
            processed_text: terms.join(" "),
            oov_terms: features.oov_count,
        })
    }

    /// Predicted label only.
    pub fn predict(&self, text: &str) -> Result<String> {
        Ok(self.classify(text)?.category)
    }

    /// Unnormalized log posterior of every label, in canonical order.
    pub fn scores(&self, features: &FeatureVector) -> Vec<f64> {
        let oov = features.oov_count as f64;
        self.model
            .log_priors()
            .iter()
            .enumerate()
            .map(|(label, &log_prior)| {
                let row = self.model.log_likelihoods(label);
                let known: f64 = features
                    .counts
                    .iter()
                    .map(|&(id, count)| count as f64 * row[id as usize])
                    .sum();
                log_prior + known + oov * self.model.log_oov_likelihood(label)
            })
            .collect()
    }
}

/// Index of the highest score. Ties go to the lowest index.
fn argmax(scores: &[f64]) -> usize {
    let mut best = 0;
    for (index, &score) in scores.iter().enumerate().skip(1) {
        if score > scores[best] {
            best = index;
        }
    }
    best
}

/// Softmax over log scores, shifted by the maximum for stability.
fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|&s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
