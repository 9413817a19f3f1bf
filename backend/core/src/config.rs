use crate::{Error, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_CHUNK_OVERLAP: usize = 150;

/// Chunking parameters. Always valid once constructed: `chunk_size > 0` and
/// `chunk_overlap < chunk_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSplitConfig")]
pub struct SplitConfig {
    chunk_size: usize,
    chunk_overlap: usize,
    add_start_index: bool,
}

impl SplitConfig {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::Config("chunk_size must be positive, got 0".into()));
        }
        if chunk_overlap >= chunk_size {
            return Err(Error::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                chunk_overlap, chunk_size
            )));
        }

        Ok(Self {
            chunk_size,
            chunk_overlap,
            add_start_index: true,
        })
    }

    pub fn with_start_index(mut self, add_start_index: bool) -> Self {
        self.add_start_index = add_start_index;
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    pub fn add_start_index(&self) -> bool {
        self.add_start_index
    }
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            add_start_index: true,
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct RawSplitConfig {
    chunk_size: usize,
    chunk_overlap: usize,
    add_start_index: bool,
}

impl Default for RawSplitConfig {
    fn default() -> Self {
        let defaults = SplitConfig::default();
        Self {
            chunk_size: defaults.chunk_size,
            chunk_overlap: defaults.chunk_overlap,
            add_start_index: defaults.add_start_index,
        }
    }
}

impl TryFrom<RawSplitConfig> for SplitConfig {
    type Error = Error;

    fn try_from(raw: RawSplitConfig) -> Result<Self> {
        Ok(SplitConfig::new(raw.chunk_size, raw.chunk_overlap)?.with_start_index(raw.add_start_index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_must_be_smaller_than_size() {
        let err = SplitConfig::new(10, 10).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("chunk_overlap (10)"));

        assert!(SplitConfig::new(10, 11).is_err());
        assert!(SplitConfig::new(10, 9).is_ok());
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(SplitConfig::new(0, 0), Err(Error::Config(_))));
    }

    #[test]
    fn test_defaults() {
        let cfg = SplitConfig::default();
        assert_eq!(cfg.chunk_size(), 1000);
        assert_eq!(cfg.chunk_overlap(), 150);
        assert!(cfg.add_start_index());
    }

    #[test]
    fn test_deserialize_validates() {
        let cfg: SplitConfig = toml::from_str("chunk_size = 500\nchunk_overlap = 50").unwrap();
        assert_eq!(cfg.chunk_size(), 500);
        assert!(cfg.add_start_index());

        let bad = toml::from_str::<SplitConfig>("chunk_size = 10\nchunk_overlap = 10");
        assert!(bad.is_err());
    }
}
