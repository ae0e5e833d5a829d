//! Persistent full-text index store over memory files.
//!
//! The store keeps one record per memory file and answers ranked queries
//! with highlighted snippets. [`TantivyStore`] is the shipped
//! implementation; the [`IndexStore`] trait is the seam for alternatives.

pub mod tantivy;

use thiserror::Error;

pub use self::tantivy::TantivyStore;

/// Errors from the persistent index store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The index directory or schema could not be created or opened.
    #[error("Failed to open search index: {0}")]
    Init(String),

    /// A record was missing a required field on insert.
    #[error("Record missing required field: {0}")]
    Record(&'static str),

    /// The query text was empty.
    #[error("Search query is empty")]
    EmptyQuery,

    /// The query text did not parse.
    #[error("Malformed search query '{query}': {reason}")]
    Query { query: String, reason: String },

    /// Any other index operation failure.
    #[error("Index operation failed: {0}")]
    Index(#[from] ::tantivy::TantivyError),
}

/// One indexed memory file. Records are rebuilt wholesale on every
/// `index` run; there are no partial updates.
#[derive(Debug, Clone, Default)]
pub struct Record {
    /// Full path; unique key within one rebuild pass.
    pub path: String,
    /// Verbatim content, used for matching and snippet extraction.
    pub content: String,
    /// `YYYY-MM-DD` or `"unknown"`.
    pub date_created: String,
    /// Space-joined hashtag tokens.
    pub tags: String,
    /// Short derived summary.
    pub summary: String,
}

/// One ranked hit from the store, with a highlighted snippet.
#[derive(Debug, Clone)]
pub struct QueryHit {
    pub path: String,
    pub date_created: String,
    pub tags: String,
    pub snippet: String,
    pub score: f32,
}

/// Trait for index stores.
pub trait IndexStore {
    /// Remove every indexed record. Queries return nothing until the
    /// store is repopulated.
    ///
    /// # Errors
    ///
    /// Returns an error if the deletion cannot be committed.
    fn clear_all(&mut self) -> Result<(), StoreError>;

    /// Buffer one record for insertion; it becomes visible to queries
    /// after [`IndexStore::commit`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Record`] when a required field is missing.
    fn insert(&mut self, record: &Record) -> Result<(), StoreError>;

    /// Make buffered insertions visible to queries.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails.
    fn commit(&mut self) -> Result<(), StoreError>;

    /// Return up to `limit` records ranked by relevance to `text`, each
    /// paired with a highlighted snippet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::EmptyQuery`] or [`StoreError::Query`] for
    /// empty or malformed query text.
    fn query(&self, text: &str, limit: usize) -> Result<Vec<QueryHit>, StoreError>;
}
