use chunkwise_core::{Document, Error, Result, SourceType};
use std::path::Path;

pub mod extract;
pub use extract::pdf_text;

pub mod http;
pub use http::HttpOptions;

pub mod local;
pub use local::{TextLoader, TextOptions};

pub mod pdf;
pub use pdf::PdfLoader;

pub mod csv;
pub use crate::csv::{CsvLoader, CsvOptions};

pub mod web;
pub use web::{WebLoader, WebOptions};

#[cfg(feature = "arxiv")]
pub mod arxiv;
#[cfg(feature = "arxiv")]
pub use arxiv::{ArxivLoader, ArxivOptions};

#[cfg(feature = "wikipedia")]
pub mod wikipedia;
#[cfg(feature = "wikipedia")]
pub use wikipedia::{WikipediaLoader, WikipediaOptions};

pub mod registry;
pub use registry::{LoaderOptions, LoaderRegistry};

pub mod remote;
pub use remote::{split_html_from_url, split_json_from_url};

pub mod router;
pub use router::{AutoInput, Loaded, SourceRouter};

/// A loading capability: turns one path, URL or query into documents.
pub trait Loader: Send + Sync {
    fn load(&self, target: &str) -> Result<Vec<Document>>;
}

impl<F> Loader for F
where
    F: Fn(&str) -> Result<Vec<Document>> + Send + Sync,
{
    fn load(&self, target: &str) -> Result<Vec<Document>> {
        self(target)
    }
}

/// Fail with `NotFound` unless `path` exists.
pub fn require_file(kind: SourceType, path: &str) -> Result<&Path> {
    let p = Path::new(path);
    if p.exists() {
        Ok(p)
    } else {
        Err(Error::NotFound {
            kind,
            path: p.to_path_buf(),
        })
    }
}
