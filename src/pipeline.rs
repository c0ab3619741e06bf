//! End-to-end training: filter, split, train, evaluate, save.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisConfig, Analyzer};
use crate::classifier::evaluation::{Evaluation, evaluate};
use crate::classifier::label::LabelSet;
use crate::classifier::naive_bayes::NaiveBayesClassifier;
use crate::classifier::trainer::{DEFAULT_SMOOTHING_ALPHA, Trainer};
use crate::classifier::types::LabeledDocument;
use crate::classifier::vocabulary::VocabularyBuilder;
use crate::error::{Result, TopicaError};
use crate::store;

/// Configuration of a training run.
///
/// Every field has a default, so a JSON config file only needs to name the
/// values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Minimum document frequency of a vocabulary term.
    pub min_df: usize,
    /// Maximum document frequency of a vocabulary term, as a fraction.
    pub max_df: Option<f64>,
    /// Cap on the vocabulary size.
    pub max_vocab_size: Option<usize>,
    /// Additive smoothing constant.
    pub smoothing_alpha: f64,
    /// Fraction of the corpus held out for evaluation, in `[0, 1)`.
    pub eval_split_fraction: f64,
    /// Seed of the train/eval shuffle.
    pub random_seed: u64,
    /// Hold out the same fraction of every label.
    pub stratify: bool,
    /// Drop documents that produce no terms before splitting.
    pub skip_empty_documents: bool,
    /// Fixed label set. Derived from the training documents when absent.
    pub labels: Option<Vec<String>>,
    /// Term normalization.
    pub analysis: AnalysisConfig,
    /// Where to save the trained model.
    pub model_path: Option<PathBuf>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            min_df: 1,
            max_df: None,
            max_vocab_size: None,
            smoothing_alpha: DEFAULT_SMOOTHING_ALPHA,
            eval_split_fraction: 0.2,
            random_seed: 42,
            stratify: true,
            skip_empty_documents: true,
            labels: None,
            analysis: AnalysisConfig::default(),
            model_path: None,
        }
    }
}

impl TrainConfig {
    /// Read a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            TopicaError::invalid_config(format!("failed to read {}: {e}", path.display()))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            TopicaError::invalid_config(format!("failed to parse {}: {e}", path.display()))
        })
    }

    pub fn vocabulary_builder(&self) -> VocabularyBuilder {
        VocabularyBuilder::new()
            .min_df(self.min_df)
            .max_df(self.max_df)
            .max_size(self.max_vocab_size)
    }

    pub fn trainer(&self) -> Trainer {
        Trainer::new()
            .with_analysis(self.analysis.clone())
            .with_vocabulary(self.vocabulary_builder())
            .with_smoothing_alpha(self.smoothing_alpha)
    }

    /// Check every value without touching the corpus.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.eval_split_fraction) {
            return Err(TopicaError::invalid_config(format!(
                "eval_split_fraction must lie in [0, 1), got {}",
                self.eval_split_fraction
            )));
        }
        if let Some(labels) = &self.labels {
            LabelSet::new(labels.iter().cloned())?;
        }
        self.analysis.build()?;
        self.trainer().validate()
    }
}

/// Summary of a training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Where the model was saved, if anywhere.
    pub model_location: Option<PathBuf>,
    /// Accuracy on the held-out documents, `None` when none were held out.
    pub held_out_accuracy: Option<f64>,
    pub train_documents: usize,
    pub eval_documents: usize,
    /// Documents dropped because they produced no terms.
    pub skipped_documents: usize,
    pub labels: Vec<String>,
    pub vocabulary_size: usize,
    /// Per-label metrics on the held-out documents.
    pub evaluation: Evaluation,
}

/// A trained classifier together with the report of how it was built.
#[derive(Debug)]
pub struct TrainingOutput {
    pub classifier: NaiveBayesClassifier,
    pub report: TrainingReport,
}

/// Runs [`TrainConfig`] over a corpus.
#[derive(Debug, Clone)]
pub struct TrainingPipeline {
    config: TrainConfig,
}

impl TrainingPipeline {
    pub fn new(config: TrainConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    /// Train on `corpus`.
    ///
    /// Nothing is written unless training and evaluation both succeed.
    pub fn run(&self, corpus: Vec<LabeledDocument>) -> Result<TrainingOutput> {
        let config = &self.config;
        if corpus.is_empty() {
            return Err(TopicaError::EmptyCorpus);
        }

        let configured = match &config.labels {
            Some(labels) => Some(LabelSet::new(labels.iter().cloned())?),
            None => None,
        };
        if let Some(labels) = &configured {
            if let Some(doc) = corpus.iter().find(|d| !labels.contains(&d.label)) {
                return Err(TopicaError::invalid_label(doc.label.clone()));
            }
        }

        let total = corpus.len();
        let corpus = if config.skip_empty_documents {
            drop_empty_documents(corpus, &config.analysis)?
        } else {
            corpus
        };
        let skipped = total - corpus.len();
        if skipped > 0 {
            debug!("Dropped {skipped} documents without terms");
        }
        if corpus.is_empty() {
            return Err(TopicaError::EmptyCorpus);
        }

        let (train, eval) = split_corpus(
            corpus,
            config.eval_split_fraction,
            config.random_seed,
            config.stratify,
        );
        info!(
            "Split corpus: {} training, {} held-out documents",
            train.len(),
            eval.len()
        );

        let labels = match configured {
            Some(labels) => labels,
            None => LabelSet::from_documents(&train)?,
        };

        let model = config.trainer().train(&train, &labels)?;
        let classifier = NaiveBayesClassifier::new(model)?;
        let evaluation = evaluate(&classifier, &eval)?;

        if let Some(accuracy) = evaluation.accuracy {
            info!(
                "Held-out accuracy: {:.4} ({}/{})",
                accuracy, evaluation.correct, evaluation.total
            );
        }

        let model_location = match &config.model_path {
            Some(path) => Some(store::save(classifier.model(), path)?),
            None => None,
        };

        let report = TrainingReport {
            model_location,
            held_out_accuracy: evaluation.accuracy,
            train_documents: train.len(),
            eval_documents: eval.len(),
            skipped_documents: skipped,
            labels: labels.iter().map(String::from).collect(),
            vocabulary_size: classifier.model().vocabulary().len(),
            evaluation,
        };

        Ok(TrainingOutput { classifier, report })
    }
}

fn drop_empty_documents(
    corpus: Vec<LabeledDocument>,
    analysis: &AnalysisConfig,
) -> Result<Vec<LabeledDocument>> {
    let analyzer = analysis.build()?;
    let keep = corpus
        .par_iter()
        .map(|doc| -> Result<bool> { Ok(analyzer.analyze(&doc.text)?.next().is_some()) })
        .collect::<Result<Vec<_>>>()?;
    Ok(corpus
        .into_iter()
        .zip(keep)
        .filter_map(|(doc, keep)| keep.then_some(doc))
        .collect())
}

/// Split documents into `(train, eval)` with a seeded shuffle.
///
/// About `fraction` of the documents are held out. With `stratify`, every
/// label contributes `round(n * fraction)` of its `n` documents, but always
/// keeps at least one for training. Without it, the whole corpus is shuffled
/// once and at least one training document remains. Both halves keep the
/// corpus order, and the same seed always produces the same split.
pub fn split_corpus(
    documents: Vec<LabeledDocument>,
    fraction: f64,
    seed: u64,
    stratify: bool,
) -> (Vec<LabeledDocument>, Vec<LabeledDocument>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut held_out = vec![false; documents.len()];

    let eval_count = |n: usize| ((n as f64 * fraction).round() as usize).min(n.saturating_sub(1));

    if stratify {
        let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (index, doc) in documents.iter().enumerate() {
            groups.entry(doc.label.as_str()).or_default().push(index);
        }
        for indices in groups.values_mut() {
            indices.shuffle(&mut rng);
            for &index in &indices[..eval_count(indices.len())] {
                held_out[index] = true;
            }
        }
    } else {
        let mut indices: Vec<usize> = (0..documents.len()).collect();
        indices.shuffle(&mut rng);
        for &index in &indices[..eval_count(indices.len())] {
            held_out[index] = true;
        }
    }

    let (eval, train): (Vec<_>, Vec<_>) = documents
        .into_iter()
        .zip(held_out)
        .partition(|(_, held_out)| *held_out);
    (
        train.into_iter().map(|(doc, _)| doc).collect(),
        eval.into_iter().map(|(doc, _)| doc).collect(),
    )
}
