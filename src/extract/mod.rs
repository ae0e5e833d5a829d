//! Metadata extraction from raw memory-file text.
//!
//! Extraction is heuristic: a date embedded in the filename, hashtag
//! tokens found anywhere in the content, and a short summary taken from
//! the first prose line. The [`MetadataExtractor`] trait keeps the
//! indexer decoupled from the heuristics so a stricter parser (e.g.
//! front-matter aware) can be substituted without touching it.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Sentinel date for files without a recognizable date in their name.
pub const UNKNOWN_DATE: &str = "unknown";

/// Maximum summary length in characters.
pub const SUMMARY_MAX_CHARS: usize = 200;

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("valid regex"));

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#\w+").expect("valid regex"));

/// Metadata derived from a single memory file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    /// `YYYY-MM-DD` from the filename, or [`UNKNOWN_DATE`].
    pub date_created: String,
    /// Space-joined hashtag tokens, duplicates removed, in
    /// first-occurrence order.
    pub tags: String,
    /// First non-heading prose line, truncated to [`SUMMARY_MAX_CHARS`].
    pub summary: String,
}

/// Trait for metadata extractors.
pub trait MetadataExtractor {
    /// Derive metadata from raw content and the file's name.
    fn extract(&self, content: &str, filename: &str) -> Metadata;
}

/// Regex-based extractor matching the memory-file writing convention.
#[derive(Debug, Default)]
pub struct RegexExtractor;

impl MetadataExtractor for RegexExtractor {
    fn extract(&self, content: &str, filename: &str) -> Metadata {
        Metadata {
            date_created: date_from_filename(filename)
                .unwrap_or(UNKNOWN_DATE)
                .to_string(),
            tags: extract_tags(content),
            summary: extract_summary(content),
        }
    }
}

/// First `YYYY-MM-DD`-shaped token in a filename.
///
/// The digits are not validated as a calendar date; any token of that
/// shape is accepted.
#[must_use]
pub fn date_from_filename(filename: &str) -> Option<&str> {
    DATE_RE.find(filename).map(|m| m.as_str())
}

/// Collect `#word` tokens from the entire content, not just a dedicated
/// tag line. First-occurrence order keeps the joined string stable
/// across runs.
fn extract_tags(content: &str) -> String {
    let mut seen = HashSet::new();
    let mut tags: Vec<&str> = Vec::new();
    for token in TAG_RE.find_iter(content) {
        if seen.insert(token.as_str()) {
            tags.push(token.as_str());
        }
    }
    tags.join(" ")
}

/// First line that is non-empty after trimming and does not start with a
/// heading marker, truncated to [`SUMMARY_MAX_CHARS`]. Falls back to the
/// first [`SUMMARY_MAX_CHARS`] characters of the raw content when every
/// line is blank or a heading.
fn extract_summary(content: &str) -> String {
    content
        .trim()
        .lines()
        .find(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .map_or_else(
            || content.chars().take(SUMMARY_MAX_CHARS).collect(),
            |line| line.trim().chars().take(SUMMARY_MAX_CHARS).collect(),
        )
}
