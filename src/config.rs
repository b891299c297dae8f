//! Command-line configuration persistence
//!
//! Stores default reader settings in `~/.config/customcsv/config.yaml`.
//! Flags passed on the command line take precedence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::csv::{ReaderOptions, DEFAULT_CHUNK_SIZE};

/// Defaults applied by the `customcsv` binary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Read buffer size in bytes
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Parse RFC 4180 quoted fields
    #[serde(default)]
    pub quoting: bool,

    /// Replace invalid UTF-8 instead of failing
    #[serde(default)]
    pub lossy_utf8: bool,

    /// Reads per tokenizer in `customcsv bench`
    #[serde(default = "default_bench_iterations")]
    pub bench_iterations: usize,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_bench_iterations() -> usize {
    1_000
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            quoting: false,
            lossy_utf8: false,
            bench_iterations: default_bench_iterations(),
        }
    }
}

impl CliConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        Self::load_from(&path)
    }

    /// Load config from a specific file, falling back to defaults on any error
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to a specific file
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Reader options described by this config
    pub fn reader_options(&self) -> ReaderOptions {
        ReaderOptions::default()
            .with_chunk_size(self.chunk_size)
            .quoting(self.quoting)
            .lossy_utf8(self.lossy_utf8)
    }
}
