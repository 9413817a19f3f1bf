//! Error taxonomy shared by the loaders, the router and the splitters.

use crate::SourceType;
use std::path::PathBuf;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A local file source does not exist
    #[error("{kind} file not found: {}", .path.display())]
    NotFound { kind: SourceType, path: PathBuf },

    /// No source type was given and none could be inferred
    #[error(
        "unable to determine source type for `{input}`; pass one of \
         text, pdf, csv, web, arxiv, wikipedia or use a file with a known extension"
    )]
    UnresolvedSourceType { input: String },

    /// The loader for this source type is not registered in this build
    #[error("{0} loader is not available; enable the `{0}` feature or register a loader")]
    CapabilityUnavailable(SourceType),

    /// Invalid chunking configuration
    #[error("invalid split config: {0}")]
    Config(String),

    /// An external loader failed; the underlying error is kept as the source
    #[error("{source_type} loader failed for {target}")]
    Loader {
        source_type: SourceType,
        target: String,
        #[source]
        source: BoxError,
    },

    #[error("tokenization failed")]
    Tokenizer(#[source] BoxError),

    #[error("embedding failed")]
    Embedding(#[source] BoxError),

    #[error("vector store operation failed")]
    Store(#[source] BoxError),
}

impl Error {
    pub fn loader(
        source_type: SourceType,
        target: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Error::Loader {
            source_type,
            target: target.into(),
            source: source.into(),
        }
    }
}
