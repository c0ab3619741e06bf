//! Held-out evaluation of a classifier.

use std::collections::BTreeMap;
use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::classifier::naive_bayes::NaiveBayesClassifier;
use crate::classifier::types::LabeledDocument;
use crate::error::Result;

/// Precision, recall and F1 of one label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of evaluation documents with this true label.
    pub support: usize,
}

/// Evaluation report over a set of labeled documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Fraction of correct predictions, `None` when there was nothing to evaluate.
    pub accuracy: Option<f64>,
    pub total: usize,
    pub correct: usize,
    /// Metrics per label, in lexical label order.
    pub per_label: Vec<LabelMetrics>,
}

impl Evaluation {
    /// Build a report from `(expected, predicted)` label pairs.
    ///
    /// Labels are collected from both sides, so a document whose true label
    /// the model does not know still counts as a miss.
    pub fn from_predictions<E, P>(pairs: &[(E, P)]) -> Self
    where
        E: AsRef<str>,
        P: AsRef<str>,
    {
        #[derive(Default)]
        struct Counts {
            true_positive: usize,
            false_positive: usize,
            support: usize,
        }

        let mut counts: BTreeMap<&str, Counts> = BTreeMap::new();
        let mut correct = 0;

        for (expected, predicted) in pairs {
            let (expected, predicted) = (expected.as_ref(), predicted.as_ref());
            counts.entry(expected).or_default().support += 1;
            if expected == predicted {
                correct += 1;
                counts.entry(expected).or_default().true_positive += 1;
            } else {
                counts.entry(predicted).or_default().false_positive += 1;
            }
        }

        let per_label = counts
            .into_iter()
            .map(|(label, c)| {
                let precision = ratio(c.true_positive, c.true_positive + c.false_positive);
                let recall = ratio(c.true_positive, c.support);
                let f1 = if precision + recall > 0.0 {
                    2.0 * precision * recall / (precision + recall)
                } else {
                    0.0
                };
                LabelMetrics {
                    label: label.to_string(),
                    precision,
                    recall,
                    f1,
                    support: c.support,
                }
            })
            .collect();

        Self {
            accuracy: (!pairs.is_empty()).then(|| correct as f64 / pairs.len() as f64),
            total: pairs.len(),
            correct,
            per_label,
        }
    }

    /// Unweighted mean of the per-label F1 scores over labels with support.
    pub fn macro_f1(&self) -> Option<f64> {
        let supported: Vec<f64> = self
            .per_label
            .iter()
            .filter(|m| m.support > 0)
            .map(|m| m.f1)
            .collect();
        (!supported.is_empty()).then(|| supported.iter().sum::<f64>() / supported.len() as f64)
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.accuracy {
            Some(accuracy) => writeln!(
                f,
                "accuracy: {:.4} ({}/{})",
                accuracy, self.correct, self.total
            )?,
            None => writeln!(f, "accuracy: n/a (no evaluation documents)")?,
        }
        for m in &self.per_label {
            writeln!(
                f,
                "  {:<28} precision {:.3}  recall {:.3}  f1 {:.3}  support {}",
                m.label, m.precision, m.recall, m.f1, m.support
            )?;
        }
        Ok(())
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Classify every document in parallel and compare against its label.
pub fn evaluate(classifier: &NaiveBayesClassifier, documents: &[LabeledDocument]) -> Result<Evaluation> {
    let pairs = documents
        .par_iter()
        .map(|doc| -> Result<(&str, String)> {
            Ok((doc.label.as_str(), classifier.predict(&doc.text)?))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Evaluation::from_predictions(&pairs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics() {
        let pairs = [
            ("a", "a"),
            ("a", "b"),
            ("b", "b"),
            ("b", "b"),
            ("c", "b"),
        ];
        let evaluation = Evaluation::from_predictions(&pairs);

        assert_eq!(evaluation.total, 5);
        assert_eq!(evaluation.correct, 3);
        assert_eq!(evaluation.accuracy, Some(0.6));

        let a = &evaluation.per_label[0];
        assert_eq!(a.label, "a");
        assert_eq!(a.precision, 1.0);
        assert_eq!(a.recall, 0.5);
        assert_eq!(a.support, 2);

        let b = &evaluation.per_label[1];
        assert_eq!(b.precision, 0.5);
        assert_eq!(b.recall, 1.0);
        assert!((b.f1 - 2.0 / 3.0).abs() < 1e-12);

        let c = &evaluation.per_label[2];
        assert_eq!((c.precision, c.recall, c.f1, c.support), (0.0, 0.0, 0.0, 1));
    }

    #[test]
    fn test_empty_evaluation() {
        let pairs: [(&str, &str); 0] = [];
        let evaluation = Evaluation::from_predictions(&pairs);
        assert_eq!(evaluation.accuracy, None);
        assert_eq!(evaluation.macro_f1(), None);
        assert!(evaluation.per_label.is_empty());
        assert!(evaluation.to_string().contains("n/a"));
    }

    #[test]
    fn test_macro_f1_ignores_unsupported_labels() {
        // "x" is only ever predicted, never expected.
        let evaluation = Evaluation::from_predictions(&[("a", "a"), ("a", "x")]);
        assert_eq!(evaluation.per_label.len(), 2);
        let a_f1 = evaluation.per_label[0].f1;
        assert_eq!(evaluation.macro_f1(), Some(a_f1));
    }
}
