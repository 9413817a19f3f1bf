//! Fetch a page or a JSON payload and split it in one step.

use chunkwise_core::{Document, Error, Result, SourceType};
use reqwest::blocking::Response;
use serde_json::Value;
use splitter::{HtmlHeaderSplitter, JsonSplitter};

use crate::http::HttpOptions;

/// Fetch `url` and split its HTML into header sections.
pub fn split_html_from_url(url: &str, splitter: &HtmlHeaderSplitter, http: &HttpOptions) -> Result<Vec<Document>> {
    let html = fetch(url, http)?
        .text()
        .map_err(|e| Error::loader(SourceType::Web, url, e))?;

    let base = Document::with_source(html, url);
    let sections = splitter.split_documents(&[base]);
    tracing::debug!("Split {} into {} sections", url, sections.len());
    Ok(sections)
}

/// Fetch `url`, parse the body as JSON and split it into size-bounded documents.
pub fn split_json_from_url(url: &str, splitter: &JsonSplitter, http: &HttpOptions) -> Result<Vec<Document>> {
    let data: Value = fetch(url, http)?
        .json()
        .map_err(|e| Error::loader(SourceType::Web, url, e))?;

    let docs: Vec<Document> = splitter
        .split_text(&data)
        .into_iter()
        .map(|chunk| Document::with_source(chunk, url))
        .collect();
    tracing::debug!("Split JSON from {} into {} documents", url, docs.len());
    Ok(docs)
}

fn fetch(url: &str, http: &HttpOptions) -> Result<Response> {
    let fail = |e: reqwest::Error| Error::loader(SourceType::Web, url, e);

    http.client()
        .map_err(fail)?
        .get(url)
        .send()
        .and_then(|resp| resp.error_for_status())
        .map_err(fail)
}
