//! Command implementations shared by the CLI entry point.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::extract::MetadataExtractor;
use crate::memory::{self, ContentBatch, MemoryDir, TimelineEntry};
use crate::search::{IndexStore, Record, TantivyStore};

/// Outcome of a full index rebuild.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexReport {
    /// Files successfully indexed.
    pub indexed: usize,
    /// Files skipped because they could not be read.
    pub warnings: usize,
}

/// A display-ready search result.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    /// File basename for display.
    pub file: String,
    /// Filename-embedded date, or `"unknown"`.
    pub date: String,
    /// Bounded excerpt with match highlighting.
    pub snippet: String,
    /// Space-joined hashtag tokens.
    pub tags: String,
    /// Full path for layer-3 retrieval.
    pub path: String,
}

/// Rebuild the search index from every readable memory file under `root`.
///
/// This is a full scan-and-replace: the store is cleared, then
/// repopulated in one pass and committed once. Files that cannot be read
/// as UTF-8 text are logged and counted, never fatal to the rebuild.
///
/// # Errors
///
/// Returns an error when the store itself cannot be opened, cleared, or
/// committed.
pub fn index(root: &Path, extractor: &dyn MetadataExtractor) -> anyhow::Result<IndexReport> {
    let dir = MemoryDir::new(root);
    let mut store = TantivyStore::open_for_memory(root)?;
    store.clear_all()?;

    let mut report = IndexReport::default();
    for path in dir.documents() {
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Skipping {}: {e}", path.display());
                report.warnings += 1;
                continue;
            }
        };

        let metadata = extractor.extract(&content, &memory::basename(&path));
        store.insert(&Record {
            path: path.display().to_string(),
            content,
            date_created: metadata.date_created,
            tags: metadata.tags,
            summary: metadata.summary,
        })?;
        report.indexed += 1;
    }
    store.commit()?;

    Ok(report)
}

/// Search the index and map hits into display-ready results.
///
/// Opens (or initializes) the store first, so searching a never-indexed
/// directory returns no results rather than failing.
///
/// # Errors
///
/// Returns an error for empty or malformed query text, or when the store
/// cannot be opened.
pub fn search(root: &Path, query: &str, limit: usize) -> anyhow::Result<Vec<SearchHit>> {
    let store = TantivyStore::open_for_memory(root)?;
    let hits = store.query(query, limit)?;

    Ok(hits
        .into_iter()
        .map(|hit| SearchHit {
            file: memory::basename(Path::new(&hit.path)),
            date: hit.date_created,
            snippet: hit.snippet,
            tags: hit.tags,
            path: hit.path,
        })
        .collect())
}

/// Build the chronological listing, optionally filtered to one exact
/// date.
#[must_use]
pub fn timeline(root: &Path, date: Option<&str>) -> Vec<TimelineEntry> {
    let entries = MemoryDir::new(root).timeline();
    match date {
        Some(date) => entries.into_iter().filter(|e| e.date == date).collect(),
        None => entries,
    }
}

/// Fetch raw content for a batch of paths, keyed by basename.
#[must_use]
pub fn get_content(paths: &[PathBuf]) -> ContentBatch {
    memory::get_content(paths)
}
