use chunkwise_core::{Document, Error, Result, SourceType};
use roxmltree::Node;
use serde::Deserialize;

use crate::extract::pdf_text;
use crate::http::HttpOptions;
use crate::Loader;

const ATOM: &str = "http://www.w3.org/2005/Atom";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArxivOptions {
    pub load_max_docs: usize,
    /// Download each paper's PDF and use its text instead of the abstract
    pub full_text: bool,
    pub base_url: String,
}

impl Default for ArxivOptions {
    fn default() -> Self {
        Self {
            load_max_docs: 2,
            full_text: true,
            base_url: "https://export.arxiv.org".to_string(),
        }
    }
}

/// Loads papers from the arXiv API by search query or by identifier (e.g. `1706.03762`).
#[derive(Debug, Clone, Default)]
pub struct ArxivLoader {
    pub options: ArxivOptions,
    pub http: HttpOptions,
}

struct Entry {
    id: String,
    title: String,
    summary: String,
    published: String,
    authors: Vec<String>,
    pdf_url: Option<String>,
}

impl ArxivLoader {
    pub fn new(options: ArxivOptions, http: HttpOptions) -> Self {
        Self { options, http }
    }

    fn to_document(&self, client: &reqwest::blocking::Client, entry: Entry, query: &str) -> Result<Document> {
        let content = match (&entry.pdf_url, self.options.full_text) {
            (Some(pdf_url), true) => {
                let bytes = client
                    .get(pdf_url)
                    .send()
                    .and_then(|resp| resp.error_for_status())
                    .and_then(|resp| resp.bytes())
                    .map_err(|e| Error::loader(SourceType::Arxiv, query, e))?;
                pdf_text(&bytes).map_err(|e| Error::loader(SourceType::Arxiv, query, e))?
            }
            _ => entry.summary.clone(),
        };

        Ok(Document::with_source(content, entry.id)
            .with_metadata("published", entry.published)
            .with_metadata("title", entry.title)
            .with_metadata("authors", entry.authors.join(", "))
            .with_metadata("summary", entry.summary))
    }
}

impl Loader for ArxivLoader {
    fn load(&self, target: &str) -> Result<Vec<Document>> {
        let fail = |e: reqwest::Error| Error::loader(SourceType::Arxiv, target, e);

        let max_results = self.options.load_max_docs.to_string();
        let query_key = if is_arxiv_identifier(target) {
            "id_list"
        } else {
            "search_query"
        };

        let client = self.http.client().map_err(fail)?;
        let feed = client
            .get(format!("{}/api/query", self.options.base_url.trim_end_matches('/')))
            .query(&[(query_key, target), ("max_results", max_results.as_str())])
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.text())
            .map_err(fail)?;

        let entries = parse_feed(&feed).map_err(|e| Error::loader(SourceType::Arxiv, target, e))?;
        tracing::debug!("arXiv returned {} entries for {}", entries.len(), target);

        entries
            .into_iter()
            .take(self.options.load_max_docs)
            .map(|entry| self.to_document(&client, entry, target))
            .collect()
    }
}

fn parse_feed(xml: &str) -> std::result::Result<Vec<Entry>, roxmltree::Error> {
    let doc = roxmltree::Document::parse(xml)?;

    Ok(doc
        .root_element()
        .children()
        .filter(|n| n.has_tag_name((ATOM, "entry")))
        .map(|entry| Entry {
            id: child_text(entry, "id"),
            title: child_text(entry, "title"),
            summary: child_text(entry, "summary"),
            published: child_text(entry, "published").chars().take(10).collect(),
            authors: entry
                .children()
                .filter(|n| n.has_tag_name((ATOM, "author")))
                .map(|a| child_text(a, "name"))
                .collect(),
            pdf_url: entry
                .children()
                .find(|n| n.has_tag_name((ATOM, "link")) && n.attribute("title") == Some("pdf"))
                .and_then(|n| n.attribute("href"))
                .map(str::to_string),
        })
        .collect())
}

/// Text of the first Atom child called `name`, with whitespace collapsed.
fn child_text(node: Node, name: &str) -> String {
    node.children()
        .find(|n| n.has_tag_name((ATOM, name)))
        .and_then(|n| n.text())
        .map(|t| t.split_whitespace().collect::<Vec<_>>().join(" "))
        .unwrap_or_default()
}

/// New-style (`1706.03762`, `2101.00001v2`) or old-style (`hep-th/9901001`) identifiers,
/// possibly several separated by whitespace.
fn is_arxiv_identifier(query: &str) -> bool {
    let mut ids = query.split_whitespace().peekable();
    ids.peek().is_some() && ids.all(|id| is_new_style(id) || is_old_style(id))
}

fn is_new_style(id: &str) -> bool {
    let id = id.split_once('v').map_or(id, |(base, version)| {
        if !version.is_empty() && version.chars().all(|c| c.is_ascii_digit()) {
            base
        } else {
            ""
        }
    });
    match id.split_once('.') {
        Some((yymm, num)) => {
            yymm.len() == 4
                && (4..=5).contains(&num.len())
                && yymm.chars().chain(num.chars()).all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

fn is_old_style(id: &str) -> bool {
    match id.split_once('/') {
        Some((archive, num)) => {
            !archive.is_empty()
                && archive
                    .chars()
                    .all(|c| c.is_ascii_alphabetic() || c == '-' || c == '.')
                && num.len() == 7
                && num.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}
