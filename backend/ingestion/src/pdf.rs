use chunkwise_core::{Document, Error, Result, SourceType};

use crate::extract::{pdf_pages, pdf_text};
use crate::{require_file, Loader};

/// Loads a PDF, one document per page that has text.
#[derive(Debug, Clone, Default)]
pub struct PdfLoader;

impl Loader for PdfLoader {
    fn load(&self, target: &str) -> Result<Vec<Document>> {
        let path = require_file(SourceType::Pdf, target)?;
        let bytes = std::fs::read(path).map_err(|e| Error::loader(SourceType::Pdf, target, e))?;
        let text = pdf_text(&bytes).map_err(|e| Error::loader(SourceType::Pdf, target, e))?;

        let docs: Vec<Document> = pdf_pages(&text)
            .into_iter()
            .map(|(page, content)| Document::with_source(content, target).with_metadata("page", page))
            .collect();

        tracing::debug!("Extracted {} pages from {}", docs.len(), target);
        Ok(docs)
    }
}
