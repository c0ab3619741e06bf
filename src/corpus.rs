//! Loading labeled corpora from disk.
//!
//! Two layouts are supported:
//!
//! - a directory tree with one subdirectory per label and one document per
//!   file, as in the 20 Newsgroups distribution;
//! - a JSON file holding either an array of `{"text", "label"}` objects or
//!   one such object per line (JSON Lines).

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::classifier::types::LabeledDocument;
use crate::error::{Result, TopicaError};

/// Options for [`load_directory`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusOptions {
    /// Read at most this many files per label.
    pub max_per_label: Option<usize>,
    /// Drop the mail header (everything up to the first blank line).
    pub strip_headers: bool,
}

impl Default for CorpusOptions {
    fn default() -> Self {
        Self {
            max_per_label: None,
            strip_headers: true,
        }
    }
}

/// Remove a mail-style header: every line up to and including the first
/// blank one. Text without a blank line is returned unchanged.
pub fn strip_headers(text: &str) -> &str {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        offset += line.len();
        if line.trim().is_empty() {
            return &text[offset..];
        }
    }
    text
}

/// Load a category-per-directory corpus.
///
/// Each subdirectory of `dir` is a label and each regular file inside it a
/// document. Entries are visited in name order so the result is
/// reproducible. Files are decoded as UTF-8 with invalid sequences replaced;
/// unreadable files are logged and skipped, as are blank documents.
pub fn load_directory<P: AsRef<Path>>(dir: P, options: &CorpusOptions) -> Result<Vec<LabeledDocument>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(TopicaError::corpus(format!(
            "corpus directory not found: {}",
            dir.display()
        )));
    }

    let categories: Vec<PathBuf> = sorted_entries(dir)?
        .into_iter()
        .filter(|p| p.is_dir())
        .collect();
    if categories.is_empty() {
        return Err(TopicaError::corpus(format!(
            "no category directories in {}",
            dir.display()
        )));
    }

    let mut documents = Vec::new();
    for category in &categories {
        let label = match category.file_name().and_then(|n| n.to_str()) {
            Some(label) => label.to_string(),
            None => {
                warn!("Skipping category with a non UTF-8 name: {}", category.display());
                continue;
            }
        };

        let files: Vec<PathBuf> = sorted_entries(category)?
            .into_iter()
            .filter(|p| p.is_file())
            .take(options.max_per_label.unwrap_or(usize::MAX))
            .collect();

        let before = documents.len();
        for file in &files {
            let bytes = match fs::read(file) {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!("Skipping unreadable file {}: {e}", file.display());
                    continue;
                }
            };
            let content = String::from_utf8_lossy(&bytes);
            let text = if options.strip_headers {
                strip_headers(&content)
            } else {
                content.as_ref()
            };
            if text.trim().is_empty() {
                debug!("Skipping blank document {}", file.display());
                continue;
            }
            documents.push(LabeledDocument::new(text, label.clone()));
        }
        debug!("Loaded {} documents for {label}", documents.len() - before);
    }

    info!(
        "Loaded {} documents from {} categories in {}",
        documents.len(),
        categories.len(),
        dir.display()
    );
    Ok(documents)
}

/// Load labeled documents from a JSON array or a JSON Lines file.
pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Vec<LabeledDocument>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        TopicaError::corpus(format!("failed to read {}: {e}", path.display()))
    })?;

    let documents: Vec<LabeledDocument> = if content.trim_start().starts_with('[') {
        serde_json::from_str(&content)
            .map_err(|e| TopicaError::corpus(format!("{}: {e}", path.display())))?
    } else {
        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(number, line)| {
                serde_json::from_str(line).map_err(|e| {
                    TopicaError::corpus(format!("{}:{}: {e}", path.display(), number + 1))
                })
            })
            .collect::<Result<_>>()?
    };

    info!("Loaded {} documents from {}", documents.len(), path.display());
    Ok(documents)
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();
    Ok(entries)
}
