//! Model persistence.
//!
//! A model is stored as a single JSON document:
//!
//! ```text
//! {"format": "topica-model", "version": 1, "checksum": <crc32>, "model": {...}}
//! ```
//!
//! The checksum is the CRC-32 of the exact bytes of the `model` member. Floats
//! are written with round-trip precision, so a loaded model is bit-identical
//! to the saved one. Writes go to a temporary sibling file that is synced and
//! then renamed over the target, so readers see either the old model or the
//! new one, never a partial file.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::classifier::model::Model;
use crate::error::{Result, TopicaError};

/// Format tag of the envelope.
pub const FORMAT_TAG: &str = "topica-model";

/// Envelope version written by this build.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    format: &'a str,
    version: u32,
    checksum: u32,
    model: &'a RawValue,
}

/// Lenient view of an envelope, so that a foreign or outdated file is
/// reported as incompatible rather than as corrupt.
#[derive(Deserialize)]
struct Envelope {
    format: Option<String>,
    version: Option<u64>,
    checksum: Option<u32>,
    model: Option<Box<RawValue>>,
}

/// Save a model to `path`, replacing any existing file atomically.
///
/// Missing parent directories are created. Returns the path written.
pub fn save<P: AsRef<Path>>(model: &Model, path: P) -> Result<PathBuf> {
    let path = path.as_ref();

    let body = serde_json::to_string(model)?;
    let checksum = crc32fast::hash(body.as_bytes());
    let raw = RawValue::from_string(body)?;
    let bytes = serde_json::to_vec(&EnvelopeRef {
        format: FORMAT_TAG,
        version: FORMAT_VERSION,
        checksum,
        model: &raw,
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let temp_path = temp_sibling(path)?;
    if let Err(e) = write_synced(&temp_path, &bytes) {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }
    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }

    info!(
        "Saved model ({} labels, {} terms, {} bytes) to {}",
        model.labels().len(),
        model.vocabulary().len(),
        bytes.len(),
        path.display()
    );
    Ok(path.to_path_buf())
}

/// Load a model saved by [`save`].
///
/// # Errors
///
/// - [`TopicaError::ModelNotFound`] when nothing exists at `path`;
/// - [`TopicaError::IncompatibleModelVersion`] when the file is not a
///   version 1 topica model;
/// - [`TopicaError::CorruptModel`] when the file is damaged or its
///   parameters violate the model invariants.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Model> {
    let path = path.as_ref();

    let bytes = fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => TopicaError::ModelNotFound(path.to_path_buf()),
        _ => TopicaError::Io(e),
    })?;

    let envelope: Envelope = serde_json::from_slice(&bytes)
        .map_err(|e| TopicaError::corrupt(format!("unreadable model file: {e}")))?;

    let expected = format!("{FORMAT_TAG} v{FORMAT_VERSION}");
    match (envelope.format.as_deref(), envelope.version) {
        (Some(FORMAT_TAG), Some(version)) if version == FORMAT_VERSION as u64 => {}
        (format, version) => {
            return Err(TopicaError::IncompatibleModelVersion {
                found: format!(
                    "{} v{}",
                    format.unwrap_or("unknown"),
                    version.map_or_else(|| "?".to_string(), |v| v.to_string())
                ),
                expected,
            });
        }
    }

    let checksum = envelope
        .checksum
        .ok_or_else(|| TopicaError::corrupt("missing checksum"))?;
    let raw = envelope
        .model
        .ok_or_else(|| TopicaError::corrupt("missing model body"))?;

    let actual = crc32fast::hash(raw.get().as_bytes());
    if actual != checksum {
        return Err(TopicaError::corrupt(format!(
            "checksum mismatch: stored {checksum:#010x}, computed {actual:#010x}"
        )));
    }

    let model: Model = serde_json::from_str(raw.get())
        .map_err(|e| TopicaError::corrupt(format!("invalid model body: {e}")))?;
    model.validate()?;

    debug!(
        "Loaded model ({} labels, {} terms) from {}",
        model.labels().len(),
        model.vocabulary().len(),
        path.display()
    );
    Ok(model)
}

fn temp_sibling(path: &Path) -> Result<PathBuf> {
    let file_name = path
        .file_name()
        .ok_or_else(|| TopicaError::invalid_config(format!("not a file path: {}", path.display())))?;
    let mut temp_name = std::ffi::OsString::from(".");
    temp_name.push(file_name);
    temp_name.push(format!(".{}.tmp", std::process::id()));
    Ok(path.with_file_name(temp_name))
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::classifier::{LabelSet, LabeledDocument, Trainer};

    fn model() -> Model {
        let docs = vec![
            LabeledDocument::new("galaxy telescope star", "sci.space"),
            LabeledDocument::new("goalie puck playoffs", "rec.sport.hockey"),
        ];
        let labels = LabelSet::from_documents(&docs).unwrap();
        Trainer::new().train(&docs, &labels).unwrap()
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("model.json");
        let model = model();

        let written = save(&model, &path).unwrap();
        assert_eq!(written, path);

        let loaded = load(&path).unwrap();
        assert_eq!(loaded, model);
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("model.json");
        save(&model(), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.json");
        assert!(matches!(load(&path), Err(TopicaError::ModelNotFound(p)) if p == path));
    }

    #[test]
    fn test_load_foreign_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("other.json");
        fs::write(&path, r#"{"hello": "world"}"#).unwrap();
        assert!(matches!(
            load(&path),
            Err(TopicaError::IncompatibleModelVersion { .. })
        ));
    }

    #[test]
    fn test_load_garbage() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("garbage.json");
        fs::write(&path, b"\x00\x01not json").unwrap();
        assert!(matches!(load(&path), Err(TopicaError::CorruptModel(_))));
    }

    #[test]
    fn test_temp_sibling_name() {
        let temp = temp_sibling(Path::new("/models/news.json")).unwrap();
        assert_eq!(temp.parent(), Some(Path::new("/models")));
        let name = temp.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(".news.json."));
        assert!(name.ends_with(".tmp"));
    }
}
