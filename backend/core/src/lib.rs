use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub mod config;
pub mod error;
pub mod vector;

pub use config::SplitConfig;
pub use error::{BoxError, Error, Result};

/// Free-form metadata attached to documents and chunks (e.g. `source`, `page`, `start_index`).
pub type Metadata = serde_json::Map<String, Value>;

/// Metadata key every loader fills with the origin of a document.
pub const SOURCE_KEY: &str = "source";

/// Metadata key holding a chunk's character offset within its document.
pub const START_INDEX_KEY: &str = "start_index";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Text,
    Pdf,
    Csv,
    Web,
    Arxiv,
    Wikipedia,
}

impl SourceType {
    pub const ALL: [SourceType; 6] = [
        SourceType::Text,
        SourceType::Pdf,
        SourceType::Csv,
        SourceType::Web,
        SourceType::Arxiv,
        SourceType::Wikipedia,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Text => "text",
            SourceType::Pdf => "pdf",
            SourceType::Csv => "csv",
            SourceType::Web => "web",
            SourceType::Arxiv => "arxiv",
            SourceType::Wikipedia => "wikipedia",
        }
    }

    /// Whether sources of this type are local paths that must exist before loading.
    pub fn is_file_based(&self) -> bool {
        matches!(self, SourceType::Text | SourceType::Pdf | SourceType::Csv)
    }

    /// Infer the type of a local file from its extension.
    ///
    /// Only the last extension segment is considered, so `report.tar.pdf` is a PDF.
    /// Web, ArXiv and Wikipedia sources are never inferred.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())?;

        match ext.as_str() {
            "txt" | "md" | "rst" => Some(SourceType::Text),
            "pdf" => Some(SourceType::Pdf),
            "csv" => Some(SourceType::Csv),
            _ => None,
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        SourceType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| Error::UnresolvedSourceType {
                input: s.to_string(),
            })
    }
}

/// What a caller hands to the router: one path/URL/query or several.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    One(String),
    Many(Vec<String>),
}

impl Source {
    pub fn targets(&self) -> &[String] {
        match self {
            Source::One(s) => std::slice::from_ref(s),
            Source::Many(all) => all,
        }
    }
}

impl From<&str> for Source {
    fn from(s: &str) -> Self {
        Source::One(s.to_string())
    }
}

impl From<String> for Source {
    fn from(s: String) -> Self {
        Source::One(s)
    }
}

impl From<&Path> for Source {
    fn from(p: &Path) -> Self {
        Source::One(p.to_string_lossy().to_string())
    }
}

impl From<Vec<String>> for Source {
    fn from(all: Vec<String>) -> Self {
        Source::Many(all)
    }
}

impl From<&[&str]> for Source {
    fn from(all: &[&str]) -> Self {
        Source::Many(all.iter().map(|s| s.to_string()).collect())
    }
}

/// A unit of loaded content, as produced by a loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    pub metadata: Metadata,
}

impl Document {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: Metadata::new(),
        }
    }

    pub fn with_source(content: impl Into<String>, source: impl Into<String>) -> Self {
        let source: String = source.into();
        Self::new(content).with_metadata(SOURCE_KEY, source)
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn source(&self) -> Option<&str> {
        self.metadata.get(SOURCE_KEY).and_then(Value::as_str)
    }
}

/// A bounded window of a document's content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Substring of the originating document's content
    pub content: String,
    /// Originating document's metadata, plus `start_index` when enabled
    pub metadata: Metadata,
}

impl Chunk {
    /// Character offset of this chunk in its document, if it was recorded.
    pub fn start_index(&self) -> Option<usize> {
        self.metadata
            .get(START_INDEX_KEY)
            .and_then(Value::as_u64)
            .map(|v| v as usize)
    }

    pub fn source(&self) -> Option<&str> {
        self.metadata.get(SOURCE_KEY).and_then(Value::as_str)
    }
}

impl From<Chunk> for Document {
    fn from(chunk: Chunk) -> Self {
        Document {
            content: chunk.content,
            metadata: chunk.metadata,
        }
    }
}

/// Read access shared by documents and chunks, used by printers and stores.
pub trait Content {
    fn content(&self) -> &str;
    fn metadata(&self) -> &Metadata;
}

impl Content for Document {
    fn content(&self) -> &str {
        &self.content
    }

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

impl Content for Chunk {
    fn content(&self) -> &str {
        &self.content
    }

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}
