//! Configuration for the `chunkwise` binary.
//!
//! Read from `chunkwise.toml` in the working directory, or from the file named
//! by `$CHUNKWISE_CONFIG`. A few environment variables override file values.

use anyhow::{bail, Context, Result};
use chunkwise_core::{SourceType, SplitConfig};
use ingestion::LoaderOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_FILE: &str = "chunkwise.toml";

/// Environment variable naming an alternative config file
const CONFIG_ENV: &str = "CHUNKWISE_CONFIG";

const CHUNK_SIZE_ENV: &str = "CHUNKWISE_CHUNK_SIZE";
const CHUNK_OVERLAP_ENV: &str = "CHUNKWISE_CHUNK_OVERLAP";
#[cfg(feature = "wikipedia")]
const WIKIPEDIA_LANG_ENV: &str = "CHUNKWISE_WIKIPEDIA_LANG";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub split: SplitConfig,
    pub loaders: LoaderOptions,
    pub preview: Option<PreviewConfig>,
}

/// A source loaded and displayed once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct PreviewConfig {
    pub source: String,
    #[serde(default)]
    pub source_type: Option<SourceType>,
    /// Splitting used for the preview; falls back to `[split]`
    #[serde(default)]
    pub split: Option<SplitConfig>,
}

impl Config {
    /// Load the config file (if any) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let (path, explicit) = match std::env::var(CONFIG_ENV) {
            Ok(path) => (PathBuf::from(path), true),
            Err(_) => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else if explicit {
            bail!("config file {} (from ${}) does not exist", path.display(), CONFIG_ENV);
        } else {
            tracing::debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&raw)
            .with_context(|| format!("invalid config file {}", path.display()))?;

        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply `CHUNKWISE_*` overrides, looking variables up through `var`.
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        let size = parse_usize(&var, CHUNK_SIZE_ENV)?;
        let overlap = parse_usize(&var, CHUNK_OVERLAP_ENV)?;

        if size.is_some() || overlap.is_some() {
            let split = SplitConfig::new(
                size.unwrap_or(self.split.chunk_size()),
                overlap.unwrap_or(self.split.chunk_overlap()),
            )
            .context("invalid chunking overrides")?;
            self.split = split.with_start_index(self.split.add_start_index());
        }

        #[cfg(feature = "wikipedia")]
        if let Some(lang) = var(WIKIPEDIA_LANG_ENV) {
            self.loaders.wikipedia.lang = lang;
        }

        Ok(())
    }
}

fn parse_usize(var: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<usize>> {
    var(key)
        .map(|v| {
            v.trim()
                .parse::<usize>()
                .with_context(|| format!("${} must be a non-negative integer, got {:?}", key, v))
        })
        .transpose()
}
