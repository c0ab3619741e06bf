//! The closed set of category labels.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::classifier::types::LabeledDocument;
use crate::error::{Result, TopicaError};

/// The 20 Newsgroups categories.
pub const NEWSGROUPS: [&str; 20] = [
    "alt.atheism",
    "comp.graphics",
    "comp.os.ms-windows.misc",
    "comp.sys.ibm.pc.hardware",
    "comp.sys.mac.hardware",
    "comp.windows.x",
    "misc.forsale",
    "rec.autos",
    "rec.motorcycles",
    "rec.sport.baseball",
    "rec.sport.hockey",
    "sci.crypt",
    "sci.electronics",
    "sci.med",
    "sci.space",
    "soc.religion.christian",
    "talk.politics.guns",
    "talk.politics.mideast",
    "talk.politics.misc",
    "talk.religion.misc",
];

/// A canonically ordered, duplicate-free set of labels.
///
/// Canonical order is lexicographic. Label indices used throughout the model
/// (priors, likelihood rows) refer to this order, and ties between equally
/// scored labels are resolved in favor of the lower index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct LabelSet {
    labels: Vec<String>,
}

impl LabelSet {
    /// Build a label set from any collection of names.
    ///
    /// Names are sorted and deduplicated. Fails when the result is empty or a
    /// name is blank.
    pub fn new<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if let Some(blank) = labels.iter().find(|l| l.trim().is_empty()) {
            return Err(TopicaError::invalid_label(blank.clone()));
        }
        labels.sort();
        labels.dedup();
        if labels.is_empty() {
            return Err(TopicaError::invalid_config("label set must not be empty"));
        }
        Ok(Self { labels })
    }

    /// The label set observed in a corpus.
    pub fn from_documents(documents: &[LabeledDocument]) -> Result<Self> {
        if documents.is_empty() {
            return Err(TopicaError::EmptyCorpus);
        }
        Self::new(documents.iter().map(|d| d.label.clone()))
    }

    /// The 20 Newsgroups categories.
    pub fn newsgroups() -> Self {
        Self {
            labels: NEWSGROUPS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Canonical index of a label.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels
            .binary_search_by(|probe| probe.as_str().cmp(label))
            .ok()
    }

    /// Whether the label belongs to the set.
    pub fn contains(&self, label: &str) -> bool {
        self.index_of(label).is_some()
    }

    /// Label at a canonical index.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterate labels in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

impl TryFrom<Vec<String>> for LabelSet {
    type Error = String;

    /// Accepts only an already canonical list, so a persisted label set is
    /// never silently reordered against its likelihood rows.
    fn try_from(labels: Vec<String>) -> std::result::Result<Self, Self::Error> {
        if labels.is_empty() {
            return Err("label set is empty".to_string());
        }
        if labels.windows(2).any(|w| w[0] >= w[1]) {
            return Err("labels are not in strictly ascending order".to_string());
        }
        if labels.iter().any(|l| l.trim().is_empty()) {
            return Err("label set contains a blank label".to_string());
        }
        Ok(Self { labels })
    }
}

impl From<LabelSet> for Vec<String> {
    fn from(set: LabelSet) -> Self {
        set.labels
    }
}

impl fmt::Display for LabelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.labels.join(", "))
    }
}
