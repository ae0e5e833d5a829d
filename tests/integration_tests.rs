//! Integration tests for memvault library operations.
//!
//! These exercise the indexing pipeline, the query engine, and the
//! index-free layers against temporary memory directories.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use memvault::commands;
use memvault::extract::RegexExtractor;

/// Test helper owning a temporary memory directory.
struct TestMemory {
    _temp_dir: TempDir,
    root: PathBuf,
}

impl TestMemory {
    /// Create a new empty memory directory.
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path().to_path_buf();

        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    /// Create a memory directory with capture-style documents.
    fn with_documents() -> Self {
        let memory = Self::new();

        memory.write(
            "2026-01-01-observations.md",
            "# 2026-01-01 observations\n\n## 09:00 - decision\n\n\
             Decided to use #memory and #tools today.\n",
        );
        memory.write(
            "2026-02-01-notes.md",
            "# Notes\n\nThe lighthouse keeper trims the lamp. The lighthouse shines on.\n\n\
             #lighthouse\n",
        );
        memory.write(
            "2026-03-01-notes.md",
            "# Notes\n\nA single lighthouse mention among many words about harbors and tides.\n",
        );

        memory
    }

    fn write(&self, name: &str, content: &str) {
        fs::write(self.root.join(name), content).expect("Failed to write doc");
    }
}

// =============================================================================
// Indexer Tests
// =============================================================================

mod index_tests {
    use super::*;

    #[test]
    fn rebuild_reports_indexed_count() {
        let memory = TestMemory::with_documents();

        let report = commands::index(&memory.root, &RegexExtractor).unwrap();

        assert_eq!(report.indexed, 3);
        assert_eq!(report.warnings, 0);
    }

    #[test]
    fn rebuild_is_idempotent() {
        let memory = TestMemory::with_documents();

        let first = commands::index(&memory.root, &RegexExtractor).unwrap();
        let first_hits = commands::search(&memory.root, "lighthouse", 10).unwrap();

        let second = commands::index(&memory.root, &RegexExtractor).unwrap();
        let second_hits = commands::search(&memory.root, "lighthouse", 10).unwrap();

        assert_eq!(first.indexed, second.indexed);
        assert_eq!(first_hits.len(), second_hits.len());
        for (a, b) in first_hits.iter().zip(&second_hits) {
            assert_eq!(a.path, b.path);
            assert_eq!(a.date, b.date);
            assert_eq!(a.tags, b.tags);
            assert_eq!(a.snippet, b.snippet);
        }
    }

    #[test]
    fn rebuild_replaces_records_for_deleted_files() {
        let memory = TestMemory::with_documents();
        commands::index(&memory.root, &RegexExtractor).unwrap();

        fs::remove_file(memory.root.join("2026-02-01-notes.md")).expect("Failed to remove doc");
        let report = commands::index(&memory.root, &RegexExtractor).unwrap();

        assert_eq!(report.indexed, 2);
        let hits = commands::search(&memory.root, "keeper", 10).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn rebuild_tolerates_unreadable_files() {
        let memory = TestMemory::with_documents();
        // Not valid UTF-8, so reading it as text fails.
        fs::write(memory.root.join("2026-04-01-corrupt.md"), [0xff_u8, 0xfe, 0xfd])
            .expect("Failed to write corrupt doc");

        let report = commands::index(&memory.root, &RegexExtractor).unwrap();

        assert_eq!(report.indexed, 3);
        assert_eq!(report.warnings, 1);
        let hits = commands::search(&memory.root, "lighthouse", 10).unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn rebuild_skips_hidden_files() {
        let memory = TestMemory::with_documents();
        memory.write(".draft.md", "unpublished quarantine notes");

        commands::index(&memory.root, &RegexExtractor).unwrap();

        let hits = commands::search(&memory.root, "quarantine", 10).unwrap();
        assert!(hits.is_empty());
    }
}

// =============================================================================
// Query Engine Tests
// =============================================================================

mod search_tests {
    use super::*;
    use memvault::search::tantivy::{HIGHLIGHT_CLOSE, HIGHLIGHT_OPEN};

    #[test]
    fn frequent_token_ranks_first() {
        let memory = TestMemory::with_documents();
        commands::index(&memory.root, &RegexExtractor).unwrap();

        let hits = commands::search(&memory.root, "lighthouse", 10).unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].file, "2026-02-01-notes.md");
    }

    #[test]
    fn hits_carry_display_fields_and_original_path() {
        let memory = TestMemory::with_documents();
        commands::index(&memory.root, &RegexExtractor).unwrap();

        let hits = commands::search(&memory.root, "keeper", 10).unwrap();

        assert_eq!(hits.len(), 1);
        let hit = &hits[0];
        assert_eq!(hit.file, "2026-02-01-notes.md");
        assert_eq!(hit.date, "2026-02-01");
        assert_eq!(hit.tags, "#lighthouse");
        assert!(hit.path.ends_with("2026-02-01-notes.md"));
        assert_ne!(hit.path, hit.file);
    }

    #[test]
    fn snippet_highlights_the_matched_token() {
        let memory = TestMemory::with_documents();
        commands::index(&memory.root, &RegexExtractor).unwrap();

        let hits = commands::search(&memory.root, "keeper", 10).unwrap();

        assert!(
            hits[0]
                .snippet
                .contains(&format!("{HIGHLIGHT_OPEN}keeper{HIGHLIGHT_CLOSE}"))
        );
    }

    #[test]
    fn limit_caps_results() {
        let memory = TestMemory::with_documents();
        commands::index(&memory.root, &RegexExtractor).unwrap();

        let hits = commands::search(&memory.root, "lighthouse", 1).unwrap();

        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn tags_are_searchable() {
        let memory = TestMemory::with_documents();
        commands::index(&memory.root, &RegexExtractor).unwrap();

        let hits = commands::search(&memory.root, "tools", 10).unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].file, "2026-01-01-observations.md");
    }

    #[test]
    fn empty_query_is_an_error() {
        let memory = TestMemory::with_documents();
        commands::index(&memory.root, &RegexExtractor).unwrap();

        assert!(commands::search(&memory.root, "   ", 10).is_err());
    }

    #[test]
    fn unindexed_directory_returns_no_results() {
        let memory = TestMemory::with_documents();

        let hits = commands::search(&memory.root, "lighthouse", 10).unwrap();

        assert!(hits.is_empty());
    }
}

// =============================================================================
// Timeline Tests
// =============================================================================

mod timeline_tests {
    use super::*;

    #[test]
    fn entries_come_back_in_date_order() {
        let memory = TestMemory::new();
        memory.write("2026-03-01-notes.md", "c");
        memory.write("2026-01-01-notes.md", "a");
        memory.write("2026-02-01-notes.md", "b");

        let entries = commands::timeline(&memory.root, None);

        let dates: Vec<&str> = entries.iter().map(|e| e.date.as_str()).collect();
        assert_eq!(dates, vec!["2026-01-01", "2026-02-01", "2026-03-01"]);
    }

    #[test]
    fn undated_files_are_listed_as_unknown() {
        let memory = TestMemory::new();
        memory.write("scratch.md", "no date in this name");

        let entries = commands::timeline(&memory.root, None);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].date, "unknown");
    }

    #[test]
    fn date_filter_selects_exact_matches() {
        let memory = TestMemory::with_documents();

        let entries = commands::timeline(&memory.root, Some("2026-02-01"));

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].file, "2026-02-01-notes.md");
    }

    #[test]
    fn timeline_works_without_an_index() {
        let memory = TestMemory::with_documents();

        // No index command was run.
        let entries = commands::timeline(&memory.root, None);

        assert_eq!(entries.len(), 3);
    }
}

// =============================================================================
// Content Accessor Tests
// =============================================================================

mod content_tests {
    use super::*;

    #[test]
    fn round_trips_content_exactly() {
        let memory = TestMemory::new();
        memory.write("2026-02-01-notes.md", "hello world");

        let batch = commands::get_content(&[memory.root.join("2026-02-01-notes.md")]);

        assert!(batch.failures.is_empty());
        assert_eq!(
            batch.contents.get("2026-02-01-notes.md").map(String::as_str),
            Some("hello world")
        );
    }

    #[test]
    fn one_bad_path_does_not_lose_other_results() {
        let memory = TestMemory::new();
        memory.write("2026-02-01-notes.md", "hello");

        let batch = commands::get_content(&[
            memory.root.join("2026-02-01-notes.md"),
            memory.root.join("missing.md"),
        ]);

        assert_eq!(batch.contents.len(), 1);
        assert_eq!(batch.failures.len(), 1);
    }
}

// =============================================================================
// Config Tests
// =============================================================================

mod config_tests {
    use super::*;
    use memvault::config::{expand_tilde, resolve_from};

    #[test]
    fn resolve_from_picks_first_existing_candidate() {
        let first = TempDir::new().expect("Failed to create temp dir");
        let second = TempDir::new().expect("Failed to create temp dir");

        let candidates = vec![
            PathBuf::from("/nonexistent/memvault-test"),
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ];

        assert_eq!(resolve_from(&candidates), first.path());
    }

    #[test]
    fn resolve_from_falls_back_to_current_directory() {
        let candidates = vec![PathBuf::from("/nonexistent/memvault-test")];

        assert_eq!(resolve_from(&candidates), PathBuf::from("."));
    }

    #[test]
    fn expand_tilde_with_home_prefix() {
        let result = expand_tilde("~/.memvault/memory");
        assert!(!result.to_string_lossy().starts_with('~'));
        assert!(result.to_string_lossy().ends_with("memory"));
    }

    #[test]
    fn expand_tilde_absolute_path_unchanged() {
        let result = expand_tilde("/absolute/path");
        assert_eq!(result, PathBuf::from("/absolute/path"));
    }

    #[test]
    fn expand_tilde_relative_path_unchanged() {
        let result = expand_tilde("relative/path");
        assert_eq!(result, PathBuf::from("relative/path"));
    }
}
