use chunkwise_core::{Document, Error, Result, SourceType};
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::http::HttpOptions;
use crate::Loader;

/// MediaWiki refuses larger search pages.
const MAX_QUERY_RESULTS: usize = 300;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WikipediaOptions {
    pub lang: String,
    pub load_max_docs: usize,
    pub doc_content_chars_max: usize,
    /// Replaces `https://{lang}.wikipedia.org`
    pub base_url: Option<String>,
}

impl Default for WikipediaOptions {
    fn default() -> Self {
        Self {
            lang: "en".to_string(),
            load_max_docs: 2,
            doc_content_chars_max: 4000,
            base_url: None,
        }
    }
}

/// Searches Wikipedia and loads the plain-text extract of each hit.
#[derive(Debug, Clone, Default)]
pub struct WikipediaLoader {
    pub options: WikipediaOptions,
    pub http: HttpOptions,
}

#[derive(Deserialize)]
struct SearchResponse {
    query: SearchQuery,
}

#[derive(Deserialize)]
struct SearchQuery {
    search: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Deserialize)]
struct PageResponse {
    query: PageQuery,
}

#[derive(Deserialize)]
struct PageQuery {
    pages: Vec<Page>,
}

#[derive(Deserialize)]
struct Page {
    title: String,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    fullurl: Option<String>,
    #[serde(default)]
    extract: Option<String>,
}

impl WikipediaLoader {
    pub fn new(options: WikipediaOptions, http: HttpOptions) -> Self {
        Self { options, http }
    }

    fn api_url(&self) -> String {
        match &self.options.base_url {
            Some(base) => format!("{}/w/api.php", base.trim_end_matches('/')),
            None => format!("https://{}.wikipedia.org/w/api.php", self.options.lang),
        }
    }

    fn search(&self, client: &Client, query: &str) -> reqwest::Result<Vec<String>> {
        let limit = self.options.load_max_docs.min(MAX_QUERY_RESULTS).to_string();
        let resp: SearchResponse = client
            .get(self.api_url())
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query),
                ("srlimit", limit.as_str()),
                ("format", "json"),
                ("formatversion", "2"),
            ])
            .send()?
            .error_for_status()?
            .json()?;

        Ok(resp.query.search.into_iter().map(|hit| hit.title).collect())
    }

    fn page(&self, client: &Client, title: &str) -> reqwest::Result<Option<Page>> {
        let resp: PageResponse = client
            .get(self.api_url())
            .query(&[
                ("action", "query"),
                ("prop", "extracts|info"),
                ("explaintext", "1"),
                ("inprop", "url"),
                ("redirects", "1"),
                ("titles", title),
                ("format", "json"),
                ("formatversion", "2"),
            ])
            .send()?
            .error_for_status()?
            .json()?;

        Ok(resp.query.pages.into_iter().find(|p| !p.missing))
    }

    fn to_document(&self, page: Page) -> Document {
        let extract = page.extract.unwrap_or_default();
        let summary = extract
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or_default()
            .to_string();
        let content: String = extract.chars().take(self.options.doc_content_chars_max).collect();
        let source = page
            .fullurl
            .unwrap_or_else(|| format!("https://{}.wikipedia.org/wiki/{}", self.options.lang, page.title.replace(' ', "_")));

        Document::with_source(content, source)
            .with_metadata("title", page.title)
            .with_metadata("summary", summary)
    }
}

impl Loader for WikipediaLoader {
    fn load(&self, target: &str) -> Result<Vec<Document>> {
        let fail = |e: reqwest::Error| Error::loader(SourceType::Wikipedia, target, e);

        let client = self.http.client().map_err(fail)?;
        let titles = self.search(&client, target).map_err(fail)?;
        tracing::debug!("Wikipedia search for {:?} matched {:?}", target, titles);

        let mut docs = Vec::with_capacity(titles.len());
        for title in titles.iter().take(self.options.load_max_docs.min(MAX_QUERY_RESULTS)) {
            match self.page(&client, title).map_err(fail)? {
                Some(page) => docs.push(self.to_document(page)),
                None => tracing::debug!("Skipping missing page {}", title),
            }
        }
        Ok(docs)
    }
}
