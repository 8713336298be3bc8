//! Yearly and monthly JSON index documents.

use super::WriteError;
use crate::meta::IndexEntry;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use tracing::warn;

/// Zero-padded key (`"01"`, `"02"`, …) → entry. Keys sort chronologically.
pub type IndexDocument = BTreeMap<String, IndexEntry>;

/// Load a previously published index.
///
/// A missing file is `Ok(None)`. A file that no longer parses is logged and
/// also treated as absent, so every entry in it counts as new.
pub fn load(path: &Path) -> Result<Option<IndexDocument>, WriteError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(WriteError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    match serde_json::from_str(&content) {
        Ok(doc) => Ok(Some(doc)),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable index");
            Ok(None)
        }
    }
}

/// Two-space pretty JSON with a trailing newline.
pub fn render(path: &Path, doc: &IndexDocument) -> Result<Vec<u8>, WriteError> {
    let mut bytes = serde_json::to_vec_pretty(doc).map_err(|source| WriteError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    bytes.push(b'\n');
    Ok(bytes)
}
