//! Vocabulary construction.
//!
//! The vocabulary maps each retained term to a dense id. Terms are retained by
//! document frequency: a term must appear in at least `min_df` documents, in at
//! most `max_df` of them (as a fraction), and only the `max_size` most frequent
//! survive a size cap. Frequency ties are broken lexically, and ids follow
//! the lexical order of the retained terms, so the same corpus always yields
//! the same vocabulary.

use std::cmp::Reverse;

use ahash::{AHashMap, AHashSet};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TopicaError};

/// Ordered mapping from term to dense id `0..len`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    /// Terms in id order.
    terms: Vec<String>,
    /// Reverse lookup.
    ids: AHashMap<String, u32>,
}

impl Vocabulary {
    /// Build a vocabulary from terms in any order. Duplicates are collapsed.
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut terms: Vec<String> = terms.into_iter().map(Into::into).collect();
        terms.sort();
        terms.dedup();
        Self::from_sorted(terms)
    }

    fn from_sorted(terms: Vec<String>) -> Self {
        let ids = terms
            .iter()
            .enumerate()
            .map(|(id, term)| (term.clone(), id as u32))
            .collect();
        Self { terms, ids }
    }

    /// Id of a term, or `None` when the term is out of vocabulary.
    pub fn id(&self, term: &str) -> Option<u32> {
        self.ids.get(term).copied()
    }

    /// Term for an id.
    pub fn term(&self, id: u32) -> Option<&str> {
        self.terms.get(id as usize).map(String::as_str)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.ids.contains_key(term)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Iterate terms in id order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }
}

impl TryFrom<Vec<String>> for Vocabulary {
    type Error = String;

    fn try_from(terms: Vec<String>) -> std::result::Result<Self, Self::Error> {
        if terms.windows(2).any(|w| w[0] >= w[1]) {
            return Err("vocabulary terms are not in strictly ascending order".to_string());
        }
        if terms.len() > u32::MAX as usize {
            return Err("vocabulary exceeds the id space".to_string());
        }
        Ok(Self::from_sorted(terms))
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(vocabulary: Vocabulary) -> Self {
        vocabulary.terms
    }
}

/// Builds a [`Vocabulary`] from analyzed training documents.
#[derive(Debug, Clone, PartialEq)]
pub struct VocabularyBuilder {
    /// Minimum number of documents a term must appear in.
    pub min_df: usize,
    /// Maximum fraction of documents a term may appear in.
    pub max_df: Option<f64>,
    /// Maximum number of terms to keep.
    pub max_size: Option<usize>,
}

impl Default for VocabularyBuilder {
    fn default() -> Self {
        Self {
            min_df: 1,
            max_df: None,
            max_size: None,
        }
    }
}

impl VocabularyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_df(mut self, min_df: usize) -> Self {
        self.min_df = min_df;
        self
    }

    pub fn max_df(mut self, max_df: Option<f64>) -> Self {
        self.max_df = max_df;
        self
    }

    pub fn max_size(mut self, max_size: Option<usize>) -> Self {
        self.max_size = max_size;
        self
    }

    /// Check the cut-off parameters.
    pub fn validate(&self) -> Result<()> {
        if self.min_df == 0 {
            return Err(TopicaError::invalid_config("min_df must be at least 1"));
        }
        if let Some(max_df) = self.max_df {
            if !(max_df > 0.0 && max_df <= 1.0) {
                return Err(TopicaError::invalid_config(format!(
                    "max_df must lie in (0, 1], got {max_df}"
                )));
            }
        }
        if self.max_size == Some(0) {
            return Err(TopicaError::invalid_config(
                "max_vocab_size must be at least 1",
            ));
        }
        Ok(())
    }

    /// Build the vocabulary from the terms of each training document.
    pub fn build<'a, I>(&self, documents: I) -> Result<Vocabulary>
    where
        I: IntoIterator<Item = &'a [String]>,
    {
        self.validate()?;

        let mut document_frequency: AHashMap<&'a str, usize> = AHashMap::new();
        let mut n_documents = 0usize;

        for terms in documents {
            n_documents += 1;
            let unique: AHashSet<&'a str> = terms.iter().map(String::as_str).collect();
            for term in unique {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        let max_count = self
            .max_df
            .map(|fraction| fraction * n_documents as f64)
            .unwrap_or(f64::INFINITY);

        let mut candidates: Vec<(&str, usize)> = document_frequency
            .into_iter()
            .filter(|&(_, df)| df >= self.min_df && df as f64 <= max_count)
            .collect();

        let distinct = candidates.len();
        if let Some(max_size) = self.max_size {
            candidates.sort_unstable_by_key(|&(term, df)| (Reverse(df), term));
            candidates.truncate(max_size);
        }

        debug!(
            "Vocabulary: {} of {} candidate terms kept from {} documents",
            candidates.len(),
            distinct,
            n_documents
        );

        Ok(Vocabulary::from_terms(
            candidates.into_iter().map(|(term, _)| term.to_string()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(raw: &[&str]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|d| d.split_whitespace().map(String::from).collect())
            .collect()
    }

    fn build(builder: &VocabularyBuilder, raw: &[&str]) -> Vocabulary {
        let docs = docs(raw);
        builder.build(docs.iter().map(Vec::as_slice)).unwrap()
    }

    #[test]
    fn test_ids_are_dense_and_lexical() {
        let vocabulary = build(&VocabularyBuilder::new(), &["star galaxy", "galaxy nasa"]);

        assert_eq!(vocabulary.len(), 3);
        assert_eq!(vocabulary.id("galaxy"), Some(0));
        assert_eq!(vocabulary.id("nasa"), Some(1));
        assert_eq!(vocabulary.id("star"), Some(2));
        assert_eq!(vocabulary.term(1), Some("nasa"));
        assert_eq!(vocabulary.id("comet"), None);
    }

    #[test]
    fn test_min_df_counts_documents_not_occurrences() {
        let builder = VocabularyBuilder::new().min_df(2);
        let vocabulary = build(&builder, &["car car car", "car engine", "engine"]);

        assert_eq!(vocabulary.iter().collect::<Vec<_>>(), vec!["car", "engine"]);

        let vocabulary = build(&builder, &["car car car", "engine"]);
        assert!(vocabulary.is_empty());
    }

    #[test]
    fn test_max_df_drops_ubiquitous_terms() {
        let builder = VocabularyBuilder::new().max_df(Some(0.5));
        let vocabulary = build(&builder, &["post car", "post space", "post hockey", "car"]);

        assert!(!vocabulary.contains("post"));
        assert!(vocabulary.contains("car"));
        assert!(vocabulary.contains("space"));
    }

    #[test]
    fn test_max_size_prefers_frequency_then_lexical_order() {
        let builder = VocabularyBuilder::new().max_size(Some(2));
        let vocabulary = build(&builder, &["zeta beta alpha", "zeta beta", "zeta gamma"]);

        assert_eq!(vocabulary.iter().collect::<Vec<_>>(), vec!["beta", "zeta"]);

        // alpha and gamma tie at df=1; alpha wins lexically.
        let builder = VocabularyBuilder::new().max_size(Some(3));
        let vocabulary = build(&builder, &["zeta beta alpha", "zeta beta", "zeta gamma"]);
        assert_eq!(
            vocabulary.iter().collect::<Vec<_>>(),
            vec!["alpha", "beta", "zeta"]
        );
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(VocabularyBuilder::new().min_df(0).validate().is_err());
        assert!(VocabularyBuilder::new().max_df(Some(0.0)).validate().is_err());
        assert!(VocabularyBuilder::new().max_df(Some(1.5)).validate().is_err());
        assert!(VocabularyBuilder::new().max_size(Some(0)).validate().is_err());
        assert!(VocabularyBuilder::new().max_df(Some(1.0)).validate().is_ok());
    }

    #[test]
    fn test_serde_roundtrip_and_validation() {
        let vocabulary = Vocabulary::from_terms(vec!["b", "a", "c", "a"]);
        let json = serde_json::to_string(&vocabulary).unwrap();
        assert_eq!(json, r#"["a","b","c"]"#);

        let back: Vocabulary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vocabulary);
        assert_eq!(back.id("c"), Some(2));

        assert!(serde_json::from_str::<Vocabulary>(r#"["b","a"]"#).is_err());
    }
}
