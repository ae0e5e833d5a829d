//! CLI interface for memvault.
//!
//! Provides command-line argument parsing using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Default number of search results to return.
pub const DEFAULT_SEARCH_LIMIT: usize = 5;

/// Command-line interface for memvault.
#[derive(Parser)]
#[command(name = "memvault")]
#[command(author, version, about = "Search agent memory files", long_about = None)]
pub struct Cli {
    /// Memory directory to operate on (overrides config and defaults).
    #[arg(long, global = true, value_name = "DIR")]
    pub memory_dir: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Rebuild the search index from every memory file.
    Index,

    /// Search memory files, returning ranked and highlighted snippets.
    Search {
        /// The search query string.
        query: String,

        /// Maximum number of results to return.
        #[arg(short, long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: usize,

        /// Emit the full ranked result list as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List memory files chronologically by their filename dates.
    Timeline {
        /// Only show entries for this date (YYYY-MM-DD).
        #[arg(long)]
        date: Option<String>,

        /// Emit the full listing as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the full raw content of a memory file.
    Get {
        /// Path to the memory file, as reported by search results.
        path: PathBuf,

        /// Emit the content as JSON keyed by filename.
        #[arg(long)]
        json: bool,
    },
}
