//! Configuration file support.
//!
//! Configuration is read from `~/.config/tarsplit/config.toml` unless a path
//! is given with `--config`. Every field has a default, so an empty or absent
//! file yields the built-in behavior.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tarsplit_core::{
    DEFAULT_BUFFER_SIZE, DEFAULT_MAX_SIZE_GB, MAX_BUFFER_SIZE, MIB, MIN_BUFFER_SIZE,
};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Splitting parameters
    pub split: SplitConfig,
    /// Console output
    pub output: OutputConfig,
}

/// `[split]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SplitConfig {
    /// Default maximum part size in GiB
    pub max_size_gb: f64,
    /// Copy buffer size in MiB
    pub buffer_size_mib: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            max_size_gb: DEFAULT_MAX_SIZE_GB,
            buffer_size_mib: DEFAULT_BUFFER_SIZE as u64 / MIB,
        }
    }
}

/// `[output]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Show a progress bar while writing parts
    pub progress: bool,
    /// Log filter when neither `--verbose` nor `--debug` is given
    pub log_level: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            progress: true,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Default configuration file location
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("tarsplit")
            .join("config.toml")
    }

    /// Load configuration from `path`
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Load the default configuration file, or fall back to defaults when it
    /// does not exist
    pub fn load_or_default() -> anyhow::Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load(&path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML text
    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Check value ranges
    pub fn validate(&self) -> anyhow::Result<()> {
        let gb = self.split.max_size_gb;
        if !gb.is_finite() || gb <= 0.0 {
            anyhow::bail!("split.max_size_gb must be a positive number, got {gb}");
        }

        let buffer = self.buffer_size();
        if !(MIN_BUFFER_SIZE..=MAX_BUFFER_SIZE).contains(&buffer) {
            anyhow::bail!(
                "split.buffer_size_mib must be between {} and {}, got {}",
                MIN_BUFFER_SIZE as u64 / MIB,
                MAX_BUFFER_SIZE as u64 / MIB,
                self.split.buffer_size_mib
            );
        }

        if self.output.log_level.trim().is_empty() {
            anyhow::bail!("output.log_level must not be empty");
        }

        Ok(())
    }

    /// Copy buffer size in bytes
    pub fn buffer_size(&self) -> usize {
        usize::try_from(self.split.buffer_size_mib.saturating_mul(MIB)).unwrap_or(usize::MAX)
    }
}
