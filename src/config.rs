//! Generation configuration.
//!
//! Process-wide, immutable settings for a run: where sources live, where
//! generated artifacts go, how many files are processed in parallel, and
//! the stream write granularity. Loaded from an optional `iconsmith.toml`
//! (CLI flags override file values) and validated exactly once before any
//! file is touched — an invalid configuration aborts the run before it
//! starts.
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! source_dir = "assets"      # Raw SVG tree: <source_dir>/<brand>/<name>.svg
//! output_dir = ".assets"     # Output root, cleared and recreated per run
//! max_concurrency = 64       # Parallel asset tasks
//! chunk_size = 65536         # Stream write granularity (bytes)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Process-wide generation settings.
///
/// All fields have defaults; a config file need only specify overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    /// Directory tree of raw SVG sources, one subdirectory per brand.
    pub source_dir: PathBuf,
    /// Output root for generated artifacts. Never the source root.
    pub output_dir: PathBuf,
    /// Maximum number of asset files processed in parallel.
    pub max_concurrency: usize,
    /// Write granularity for the index/catalog streams, in bytes.
    pub chunk_size: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("assets"),
            output_dir: PathBuf::from(".assets"),
            max_concurrency: 64,
            chunk_size: 64 * 1024,
        }
    }
}

impl GenerationConfig {
    /// Load from a TOML file, or fall back to defaults when the file does
    /// not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate before any processing. Failures here are fatal.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.source_dir.is_dir() {
            return Err(ConfigError::Validation(format!(
                "source directory does not exist: {}",
                self.source_dir.display()
            )));
        }
        if self.max_concurrency == 0 {
            return Err(ConfigError::Validation(
                "max_concurrency must be greater than 0".into(),
            ));
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::Validation(
                "chunk_size must be greater than 0".into(),
            ));
        }
        if self.output_dir == self.source_dir {
            return Err(ConfigError::Validation(
                "output_dir must not be the source directory".into(),
            ));
        }
        Ok(())
    }
}

/// The stock config file printed by `iconsmith gen-config`.
pub fn stock_config_toml() -> String {
    let defaults = GenerationConfig::default();
    format!(
        r#"# iconsmith configuration
# All options are optional - defaults shown below.

# Directory tree of raw SVG sources, organized as <source_dir>/<brand>/<name>.svg
source_dir = "{}"

# Output root for generated artifacts. Cleared and recreated on every run,
# so it must not be the source directory.
output_dir = "{}"

# How many asset files are processed in parallel.
max_concurrency = {}

# Stream write granularity in bytes for the export index and the metadata
# catalog.
chunk_size = {}
"#,
        defaults.source_dir.display(),
        defaults.output_dir.display(),
        defaults.max_concurrency,
        defaults.chunk_size,
    )
}
