use clap::Parser;
use memvault::cli::{Cli, Commands};
use memvault::extract::RegexExtractor;
use memvault::{commands, config, logging};

fn main() -> anyhow::Result<()> {
    logging::init();

    let cli = Cli::parse();
    let root = config::resolve_memory_dir(cli.memory_dir.as_deref())?;

    match cli.command {
        Some(Commands::Index) => {
            let report = commands::index(&root, &RegexExtractor)?;
            if report.warnings > 0 {
                tracing::warn!("Skipped {} unreadable file(s)", report.warnings);
            }
            println!("Indexed {} files in {}", report.indexed, root.display());
            Ok(())
        }
        Some(Commands::Search { query, limit, json }) => {
            let results = commands::search(&root, &query, limit)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else if results.is_empty() {
                println!("No matches found for '{query}'");
            } else {
                for hit in &results {
                    let prefix: String = hit.snippet.chars().take(80).collect();
                    println!("{} ({}): {prefix}...", hit.file, hit.date);
                }
            }
            Ok(())
        }
        Some(Commands::Timeline { date, json }) => {
            let entries = commands::timeline(&root, date.as_deref());
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                // Text mode shows the most recent ten; the full list is
                // available via --json.
                let start = entries.len().saturating_sub(10);
                for entry in &entries[start..] {
                    println!("{} - {}", entry.date, entry.file);
                }
            }
            Ok(())
        }
        Some(Commands::Get { path, json }) => {
            let batch = commands::get_content(std::slice::from_ref(&path));
            if let Some(failure) = batch.failures.first() {
                anyhow::bail!("{failure}");
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&batch.contents)?);
            } else if let Some(content) = batch.contents.values().next() {
                print!("{content}");
            }
            Ok(())
        }
        None => {
            Cli::parse_from(["memvault", "--help"]);
            Ok(())
        }
    }
}
