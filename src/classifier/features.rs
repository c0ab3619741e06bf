//! Bag-of-words feature extraction.

use std::collections::BTreeMap;

use crate::classifier::vocabulary::Vocabulary;

/// Sparse term counts of one document.
///
/// Out-of-vocabulary terms are not dropped silently; they are summed into
/// `oov_count` and scored as a single pseudo-term.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureVector {
    /// `(term id, count)` pairs, sorted by id, counts always non-zero.
    pub counts: Vec<(u32, u32)>,
    /// Number of term occurrences not in the vocabulary.
    pub oov_count: u32,
}

impl FeatureVector {
    /// Total number of in-vocabulary term occurrences.
    pub fn known_terms(&self) -> u64 {
        self.counts.iter().map(|&(_, count)| count as u64).sum()
    }

    /// Total number of term occurrences, including OOV ones.
    pub fn total_terms(&self) -> u64 {
        self.known_terms() + self.oov_count as u64
    }

    /// Whether the document produced no terms at all.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty() && self.oov_count == 0
    }
}

/// Converts analyzed terms into a [`FeatureVector`] against a vocabulary.
#[derive(Debug, Clone, Copy)]
pub struct FeatureExtractor<'a> {
    vocabulary: &'a Vocabulary,
}

impl<'a> FeatureExtractor<'a> {
    pub fn new(vocabulary: &'a Vocabulary) -> Self {
        Self { vocabulary }
    }

    /// Count the terms of one document.
    pub fn extract<S: AsRef<str>>(&self, terms: &[S]) -> FeatureVector {
        let mut counts: BTreeMap<u32, u32> = BTreeMap::new();
        let mut oov_count = 0u32;

        for term in terms {
            match self.vocabulary.id(term.as_ref()) {
                Some(id) => *counts.entry(id).or_insert(0) += 1,
                None => oov_count += 1,
            }
        }

        FeatureVector {
            counts: counts.into_iter().collect(),
            oov_count,
        }
    }
}
