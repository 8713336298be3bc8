//! Static file tree output.
//!
//! Layout under the root (normally `api/`):
//! - `daily/{YYYY}/{MM}/{DD}`: plain daily rate
//! - `monthly/{YYYY}/{MM}`: plain monthly average
//! - `{YYYY}/index.json`: yearly index, keys `"01"`..`"12"`
//! - `{YYYY}/{MM}/index.json`: monthly index, one key per calendar day
//!
//! The tree is the only persisted state. Writes are atomic (write to
//! `.tmp`, rename into place) and skipped when the bytes on disk already
//! match.

pub mod index;
pub mod writer;

pub use index::IndexDocument;
pub use writer::WriteReport;

use crate::domain::YearMonth;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File-system failure while persisting one file.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to write {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to serialize {}: {source}", .path.display())]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl WriteError {
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. } | Self::Read { path, .. } | Self::Serialize { path, .. } => path,
        }
    }
}

/// What happened to a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileChange {
    Written,
    Unchanged,
    Removed,
}

/// The published file tree.
#[derive(Debug, Clone)]
pub struct FileTree {
    root: PathBuf,
}

impl FileTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `{root}/daily/{YYYY}/{MM}/{DD}`
    pub fn daily_path(&self, period: YearMonth, day: u32) -> PathBuf {
        self.root
            .join("daily")
            .join(format!("{:04}", period.year()))
            .join(period.month_key())
            .join(format!("{day:02}"))
    }

    /// `{root}/monthly/{YYYY}/{MM}`
    pub fn monthly_path(&self, period: YearMonth) -> PathBuf {
        self.root
            .join("monthly")
            .join(format!("{:04}", period.year()))
            .join(period.month_key())
    }

    /// `{root}/{YYYY}/index.json`
    pub fn year_index_path(&self, year: i32) -> PathBuf {
        self.root.join(format!("{year:04}")).join("index.json")
    }

    /// `{root}/{YYYY}/{MM}/index.json`
    pub fn month_index_path(&self, period: YearMonth) -> PathBuf {
        self.root
            .join(format!("{:04}", period.year()))
            .join(period.month_key())
            .join("index.json")
    }

    /// Read a plain value file. A missing file is `Ok(None)`.
    pub fn read_value(&self, path: &Path) -> Result<Option<String>, WriteError> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(content.trim().to_string()).filter(|v| !v.is_empty())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(WriteError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

/// Write `bytes` to `path` unless the file already holds exactly those bytes.
///
/// Parent directories are created on demand. The new content goes to a
/// sibling `.tmp` file first and is renamed into place.
pub(crate) fn write_if_changed(path: &Path, bytes: &[u8]) -> Result<FileChange, WriteError> {
    let io_err = |source: io::Error| WriteError::Io {
        path: path.to_path_buf(),
        source,
    };

    match fs::read(path) {
        Ok(existing) if existing == bytes => return Ok(FileChange::Unchanged),
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(WriteError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let tmp_path = tmp_path(path);
    fs::write(&tmp_path, bytes).map_err(io_err)?;
    fs::rename(&tmp_path, path).map_err(|e| {
        // Clean up temp file on rename failure
        let _ = fs::remove_file(&tmp_path);
        io_err(e)
    })?;

    Ok(FileChange::Written)
}

/// Remove `path` if it exists.
pub(crate) fn remove_if_exists(path: &Path) -> Result<FileChange, WriteError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(FileChange::Removed),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(FileChange::Unchanged),
        Err(source) => Err(WriteError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
