//! Memory directory enumeration and raw content access.
//!
//! The memory directory is a flat-or-nested tree of append-only markdown
//! files produced by the session capture tooling. Everything here walks
//! that tree directly; nothing depends on the search index.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use walkdir::WalkDir;

use crate::extract::{self, UNKNOWN_DATE};

/// Errors raised by direct memory-file access.
#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("Memory file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One entry in the chronological listing.
#[derive(Debug, Clone, Serialize)]
pub struct TimelineEntry {
    /// File basename.
    pub file: String,
    /// Filename-embedded date, or `"unknown"`.
    pub date: String,
    /// Full path, usable for layer-3 retrieval.
    pub path: String,
}

/// Contents and per-path failures from a batch content request.
#[derive(Debug, Default)]
pub struct ContentBatch {
    /// Raw file content keyed by basename.
    pub contents: BTreeMap<String, String>,
    /// Paths that could not be read, with the reason.
    pub failures: Vec<MemoryError>,
}

/// A directory of memory files.
#[derive(Debug, Clone)]
pub struct MemoryDir {
    root: PathBuf,
}

impl MemoryDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Enumerate candidate memory files in lexical path order.
    ///
    /// Only `.md` files count; hidden files and directories (the index
    /// directory among them) are skipped. Unwalkable entries are logged
    /// and skipped.
    #[must_use]
    pub fn documents(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_hidden(entry))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(
                        "Skipping unwalkable entry under {}: {e}",
                        self.root.display()
                    );
                    continue;
                }
            };

            if entry.file_type().is_file() && is_memory_file(entry.path()) {
                files.push(entry.into_path());
            }
        }
        files
    }

    /// Build the chronological listing straight from filenames, without
    /// touching the index.
    ///
    /// Entries come back in lexical path order, which for date-prefixed
    /// filenames is chronological. Files without a date are included with
    /// date `"unknown"`. No limit is applied here; truncation is a
    /// display concern.
    #[must_use]
    pub fn timeline(&self) -> Vec<TimelineEntry> {
        self.documents()
            .iter()
            .map(|path| {
                let file = basename(path);
                TimelineEntry {
                    date: extract::date_from_filename(&file)
                        .unwrap_or(UNKNOWN_DATE)
                        .to_string(),
                    file,
                    path: path.display().to_string(),
                }
            })
            .collect()
    }
}

/// Read one memory file in full.
pub fn read_content(path: &Path) -> Result<String, MemoryError> {
    if !path.exists() {
        return Err(MemoryError::NotFound(path.to_path_buf()));
    }

    fs::read_to_string(path).map_err(|source| MemoryError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a batch of memory files, keyed by basename.
///
/// Unreadable paths are collected as failures instead of aborting the
/// whole batch; one bad path never loses the others' results.
#[must_use]
pub fn get_content(paths: &[PathBuf]) -> ContentBatch {
    let mut batch = ContentBatch::default();
    for path in paths {
        match read_content(path) {
            Ok(content) => {
                batch.contents.insert(basename(path), content);
            }
            Err(e) => batch.failures.push(e),
        }
    }
    batch
}

pub(crate) fn basename(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().to_string(),
    )
}

// Never filter the root itself: the memory dir may legitimately live
// under a dotted path like ~/.memvault/memory.
fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

fn is_memory_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()).is_some_and(|e| e == "md")
}
