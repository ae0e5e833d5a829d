//! Configuration loading and memory-root resolution.

use std::path::{Path, PathBuf};

use directories::{BaseDirs, ProjectDirs};
use serde::Deserialize;

/// Top-level configuration loaded from config.toml.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub memory: MemoryConfig,
}

/// Configuration for the memory directory location.
#[derive(Debug, Default, Deserialize)]
pub struct MemoryConfig {
    /// Explicit memory directory; bypasses the fallback candidates.
    pub dir: Option<String>,
}

impl Config {
    /// Load config from the path in `$MEMVAULT_CONFIG`, or from
    /// ~/.config/memvault/config.toml, or return defaults when neither
    /// exists.
    pub fn load() -> anyhow::Result<Self> {
        if let Some(path) = Self::config_path()
            && path.exists()
        {
            let contents = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&contents)?;
            return Ok(config);
        }

        Ok(Config::default())
    }

    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("MEMVAULT_CONFIG") {
            return Some(PathBuf::from(path));
        }

        ProjectDirs::from("", "", "memvault")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

/// Expand ~ to the user's home directory.
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(base_dirs) = BaseDirs::new()
    {
        return base_dirs.home_dir().join(rest);
    }
    PathBuf::from(path)
}

/// The ordered fallback locations probed when no explicit directory is
/// given: `./memory`, then `~/.memvault/memory`, then the current
/// directory itself.
#[must_use]
pub fn default_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from("memory")];
    if let Some(base_dirs) = BaseDirs::new() {
        candidates.push(base_dirs.home_dir().join(".memvault/memory"));
    }
    candidates.push(PathBuf::from("."));
    candidates
}

/// Pick the first existing candidate, falling back to the current
/// directory when none exist.
#[must_use]
pub fn resolve_from(candidates: &[PathBuf]) -> PathBuf {
    candidates
        .iter()
        .find(|candidate| candidate.exists())
        .cloned()
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Resolve the memory directory: explicit override first, then the config
/// file, then the default fallback candidates.
pub fn resolve_memory_dir(override_dir: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(dir) = override_dir {
        return Ok(dir.to_path_buf());
    }

    let config = Config::load()?;
    if let Some(dir) = config.memory.dir {
        return Ok(expand_tilde(&dir));
    }

    Ok(resolve_from(&default_candidates()))
}
