//! Diagnostic logging setup.
//!
//! Everything goes to stderr so JSON output on stdout stays clean.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Install the global stderr subscriber. The level defaults to `warn`
/// and can be changed with `MEMVAULT_LOG` (e.g. `MEMVAULT_LOG=debug`).
pub fn init() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .with_env_var("MEMVAULT_LOG")
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
