//! Tantivy-based index store with BM25 ranking and snippet extraction.
//!
//! The index lives in a hidden `.index/` directory inside the memory
//! root, so document enumeration never picks it up. Matching is
//! token-based with tantivy's default tokenizer: lowercased, split on
//! non-alphanumeric boundaries, no stemming. Queries run against the
//! `content`, `tags`, and `summary` fields; snippets are cut from
//! `content` only.
//!
//! Concurrency: the writer takes tantivy's advisory lock file, so a
//! second process rebuilding the same index fails fast instead of
//! interleaving. Readers always search the last committed snapshot.

use std::path::{Path, PathBuf};

use tantivy::collector::TopDocs;
use tantivy::directory::MmapDirectory;
use tantivy::query::QueryParser;
use tantivy::schema::{Field, STORED, STRING, Schema, TEXT, Value};
use tantivy::snippet::{Snippet, SnippetGenerator};
use tantivy::{Index, IndexReader, IndexSettings, IndexWriter, ReloadPolicy, TantivyDocument};

use crate::search::{IndexStore, QueryHit, Record, StoreError};

/// Index directory name within the memory root.
const INDEX_DIR: &str = ".index";

/// Default heap size for the index writer (50MB).
const WRITER_HEAP_SIZE: usize = 50_000_000;

/// Maximum snippet window length in characters.
const SNIPPET_MAX_CHARS: usize = 150;

/// Marker inserted before each matched term in a snippet.
pub const HIGHLIGHT_OPEN: &str = "<mark>";

/// Marker inserted after each matched term in a snippet.
pub const HIGHLIGHT_CLOSE: &str = "</mark>";

/// Marker for truncated snippet context.
const ELLIPSIS: &str = "...";

/// Schema field handles for the tantivy index.
#[derive(Debug, Clone)]
struct SchemaFields {
    path: Field,
    content: Field,
    date_created: Field,
    tags: Field,
    summary: Field,
}

/// Tantivy-backed index store.
///
/// The writer is created lazily, so stores opened only for querying
/// never take the writer lock.
pub struct TantivyStore {
    index: Index,
    reader: IndexReader,
    writer: Option<IndexWriter>,
    fields: SchemaFields,
    index_path: PathBuf,
}

impl TantivyStore {
    /// Build the tantivy schema for memory-file records.
    ///
    /// Fields:
    /// - `path`: exact-match key, stored for result retrieval
    /// - `content`: searchable text, stored for snippet extraction
    /// - `date_created`: stored for display
    /// - `tags`: searchable text, stored for display
    /// - `summary`: searchable text, stored as the snippet fallback
    fn build_schema() -> (Schema, SchemaFields) {
        let mut schema_builder = Schema::builder();

        let path = schema_builder.add_text_field("path", STRING | STORED);
        let content = schema_builder.add_text_field("content", TEXT | STORED);
        let date_created = schema_builder.add_text_field("date_created", STRING | STORED);
        let tags = schema_builder.add_text_field("tags", TEXT | STORED);
        let summary = schema_builder.add_text_field("summary", TEXT | STORED);

        let schema = schema_builder.build();
        let fields = SchemaFields {
            path,
            content,
            date_created,
            tags,
            summary,
        };

        (schema, fields)
    }

    /// Open or create the index at the given path.
    ///
    /// Safe to call on every process start: an existing index is opened
    /// with its stored schema and its data left intact.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Init`] if the index cannot be opened or
    /// created.
    pub fn open(index_path: &Path) -> Result<Self, StoreError> {
        let index = if index_path.exists() {
            let directory =
                MmapDirectory::open(index_path).map_err(|e| init_error(index_path, &e))?;
            Index::open(directory).map_err(|e| init_error(index_path, &e))?
        } else {
            let (schema, _) = Self::build_schema();
            std::fs::create_dir_all(index_path).map_err(|e| init_error(index_path, &e))?;
            let directory =
                MmapDirectory::open(index_path).map_err(|e| init_error(index_path, &e))?;
            Index::create(directory, schema, IndexSettings::default())
                .map_err(|e| init_error(index_path, &e))?
        };

        // Resolve fields from the actual index schema, not the builder.
        let schema = index.schema();
        let fields = SchemaFields {
            path: schema
                .get_field("path")
                .map_err(|e| init_error(index_path, &e))?,
            content: schema
                .get_field("content")
                .map_err(|e| init_error(index_path, &e))?,
            date_created: schema
                .get_field("date_created")
                .map_err(|e| init_error(index_path, &e))?,
            tags: schema
                .get_field("tags")
                .map_err(|e| init_error(index_path, &e))?,
            summary: schema
                .get_field("summary")
                .map_err(|e| init_error(index_path, &e))?,
        };

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::OnCommitWithDelay)
            .try_into()
            .map_err(|e: tantivy::TantivyError| init_error(index_path, &e))?;

        Ok(Self {
            index,
            reader,
            writer: None,
            fields,
            index_path: index_path.to_path_buf(),
        })
    }

    /// Open or create the index for a memory root directory.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Init`] if the index cannot be opened or
    /// created.
    pub fn open_for_memory(root: &Path) -> Result<Self, StoreError> {
        Self::open(&root.join(INDEX_DIR))
    }

    /// Check whether an index already exists under a memory root.
    #[must_use]
    pub fn index_exists(root: &Path) -> bool {
        root.join(INDEX_DIR).exists()
    }

    /// Get the index path.
    #[must_use]
    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    fn writer(&mut self) -> Result<&mut IndexWriter, StoreError> {
        if self.writer.is_none() {
            self.writer = Some(self.index.writer(WRITER_HEAP_SIZE)?);
        }
        self.writer
            .as_mut()
            .ok_or_else(|| StoreError::Init("index writer unavailable".to_string()))
    }

    fn doc_to_hit(&self, doc: &TantivyDocument, snippet: &Snippet, score: f32) -> QueryHit {
        let stored = |field: Field| {
            doc.get_first(field)
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string()
        };

        let content = doc
            .get_first(self.fields.content)
            .and_then(|v| v.as_str())
            .unwrap_or("");

        QueryHit {
            snippet: render_snippet(snippet, content, &stored(self.fields.summary)),
            path: stored(self.fields.path),
            date_created: stored(self.fields.date_created),
            tags: stored(self.fields.tags),
            score,
        }
    }
}

impl IndexStore for TantivyStore {
    fn clear_all(&mut self) -> Result<(), StoreError> {
        let writer = self.writer()?;
        writer.delete_all_documents()?;
        writer.commit()?;
        self.reader.reload()?;
        Ok(())
    }

    fn insert(&mut self, record: &Record) -> Result<(), StoreError> {
        if record.path.is_empty() {
            return Err(StoreError::Record("path"));
        }

        let mut doc = TantivyDocument::new();
        doc.add_text(self.fields.path, &record.path);
        doc.add_text(self.fields.content, &record.content);
        doc.add_text(self.fields.date_created, &record.date_created);
        doc.add_text(self.fields.tags, &record.tags);
        doc.add_text(self.fields.summary, &record.summary);

        self.writer()?.add_document(doc)?;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        self.writer()?.commit()?;
        self.reader.reload()?;
        Ok(())
    }

    /// Ranked by BM25 relevance; ties keep the store's internal document
    /// order, which after a full rebuild is insertion order (lexical path
    /// order).
    fn query(&self, text: &str, limit: usize) -> Result<Vec<QueryHit>, StoreError> {
        if text.trim().is_empty() {
            return Err(StoreError::EmptyQuery);
        }
        if limit == 0 {
            return Ok(Vec::new());
        }

        let parser = QueryParser::for_index(
            &self.index,
            vec![self.fields.content, self.fields.tags, self.fields.summary],
        );
        let query = parser.parse_query(text).map_err(|e| StoreError::Query {
            query: text.to_string(),
            reason: e.to_string(),
        })?;

        let searcher = self.reader.searcher();
        let top_docs = searcher.search(&query, &TopDocs::with_limit(limit))?;

        let mut snippet_generator =
            SnippetGenerator::create(&searcher, &*query, self.fields.content)?;
        snippet_generator.set_max_num_chars(SNIPPET_MAX_CHARS);

        let mut hits = Vec::with_capacity(top_docs.len());
        for (score, doc_address) in top_docs {
            let doc: TantivyDocument = searcher.doc(doc_address)?;
            let snippet = snippet_generator.snippet_from_doc(&doc);
            hits.push(self.doc_to_hit(&doc, &snippet, score));
        }

        Ok(hits)
    }
}

fn init_error(path: &Path, err: &dyn std::fmt::Display) -> StoreError {
    StoreError::Init(format!("{}: {err}", path.display()))
}

/// Wrap each matched range of the snippet window in highlight markers,
/// with an ellipsis on each side that was clipped out of the full
/// content. Falls back to the stored summary when the match did not land
/// in the content field.
fn render_snippet(snippet: &Snippet, content: &str, fallback: &str) -> String {
    let fragment = snippet.fragment();
    if fragment.is_empty() || snippet.highlighted().is_empty() {
        return fallback.to_string();
    }

    let mut rendered = String::with_capacity(fragment.len() + 32);
    if !content.starts_with(fragment) {
        rendered.push_str(ELLIPSIS);
    }

    let mut cursor = 0;
    for range in snippet.highlighted() {
        rendered.push_str(&fragment[cursor..range.start]);
        rendered.push_str(HIGHLIGHT_OPEN);
        rendered.push_str(&fragment[range.start..range.end]);
        rendered.push_str(HIGHLIGHT_CLOSE);
        cursor = range.end;
    }
    rendered.push_str(&fragment[cursor..]);

    if !content.ends_with(fragment) {
        rendered.push_str(ELLIPSIS);
    }

    rendered
}
