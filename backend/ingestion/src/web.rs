use chunkwise_core::{Document, Error, Result, SourceType};
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use url::Url;

use crate::http::HttpOptions;
use crate::Loader;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebOptions {
    /// Only text inside elements carrying one of these classes is kept;
    /// an empty list keeps the whole body
    pub css_classes: Vec<String>,
}

impl Default for WebOptions {
    fn default() -> Self {
        Self {
            css_classes: vec![
                "post-title".to_string(),
                "post-content".to_string(),
                "post-header".to_string(),
            ],
        }
    }
}

/// Fetches a single page and keeps the text of the selected elements.
#[derive(Debug, Clone, Default)]
pub struct WebLoader {
    pub options: WebOptions,
    pub http: HttpOptions,
}

impl WebLoader {
    pub fn new(options: WebOptions, http: HttpOptions) -> Self {
        Self { options, http }
    }

    fn content_selector(&self) -> std::result::Result<Selector, String> {
        let css = if self.options.css_classes.is_empty() {
            "body".to_string()
        } else {
            self.options
                .css_classes
                .iter()
                .map(|c| format!(".{}", c))
                .collect::<Vec<_>>()
                .join(", ")
        };
        Selector::parse(&css).map_err(|e| format!("invalid selector `{}`: {}", css, e))
    }

    fn parse(&self, url: &Url, html: &str, selector: &Selector) -> Document {
        let document = Html::parse_document(html);

        // Nested matches would repeat their text; keep outermost ones only.
        let sections: Vec<String> = document
            .select(selector)
            .filter(|el| {
                !el.ancestors()
                    .filter_map(ElementRef::wrap)
                    .any(|parent| selector.matches(&parent))
            })
            .map(|el| element_text(&el))
            .filter(|text| !text.is_empty())
            .collect();

        let mut doc = Document::with_source(sections.join("\n\n"), url.as_str());

        if let Some(title) = first_text(&document, "title") {
            doc = doc.with_metadata("title", title);
        }
        if let Some(description) = first_attr(&document, r#"meta[name="description"]"#, "content") {
            doc = doc.with_metadata("description", description);
        }
        if let Some(language) = first_attr(&document, "html", "lang") {
            doc = doc.with_metadata("language", language);
        }
        doc
    }
}

impl Loader for WebLoader {
    fn load(&self, target: &str) -> Result<Vec<Document>> {
        let fail = |e: reqwest::Error| Error::loader(SourceType::Web, target, e);

        let url = Url::parse(target).map_err(|e| Error::loader(SourceType::Web, target, e))?;
        let selector = self
            .content_selector()
            .map_err(|e| Error::loader(SourceType::Web, target, e))?;

        let client = self.http.client().map_err(fail)?;
        let html = client
            .get(url.clone())
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.text())
            .map_err(fail)?;

        tracing::debug!("Fetched {} ({} bytes)", url, html.len());
        Ok(vec![self.parse(&url, &html, &selector)])
    }
}

fn element_text(el: &ElementRef) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn first_text(document: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    let text = element_text(&document.select(&selector).next()?);
    (!text.is_empty()).then_some(text)
}

fn first_attr(document: &Html, css: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    let el = document.select(&selector).next()?;
    el.value().attr(attr).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const POST: &str = r#"
        <html lang="en">
            <head>
                <title>LLM Powered Agents</title>
                <meta name="description" content="A survey of agents">
            </head>
            <body>
                <nav>Home | About</nav>
                <header class="post-header"><h1 class="post-title">Agents</h1></header>
                <div class="post-content">
                    <p>Planning is key.</p>
                    <p>Memory helps.</p>
                </div>
                <footer>Copyright</footer>
            </body>
        </html>
    "#;

    async fn serve(body: &str, status: u16) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/post"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;
        mock_server
    }

    async fn load(loader: WebLoader, url: String) -> Result<Vec<Document>> {
        tokio::task::spawn_blocking(move || loader.load(&url))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_web_loading_keeps_selected_classes() -> Result<()> {
        let mock_server = serve(POST, 200).await;
        let url = format!("{}/post", mock_server.uri());

        let docs = load(WebLoader::default(), url.clone()).await?;

        assert_eq!(docs.len(), 1);
        let doc = &docs[0];
        assert_eq!(doc.content, "Agents\n\nPlanning is key. Memory helps.");
        assert!(!doc.content.contains("Home"));
        assert_eq!(doc.source(), Some(url.as_str()));
        assert_eq!(doc.metadata["title"], "LLM Powered Agents");
        assert_eq!(doc.metadata["description"], "A survey of agents");
        assert_eq!(doc.metadata["language"], "en");

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_class_list_keeps_body() -> Result<()> {
        let mock_server = serve(POST, 200).await;
        let loader = WebLoader::new(WebOptions { css_classes: vec![] }, HttpOptions::default());

        let docs = load(loader, format!("{}/post", mock_server.uri())).await?;

        assert!(docs[0].content.contains("Home | About"));
        assert!(docs[0].content.contains("Copyright"));
        Ok(())
    }

    #[tokio::test]
    async fn test_http_errors_propagate() {
        let mock_server = serve("gone", 404).await;

        let err = load(WebLoader::default(), format!("{}/post", mock_server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Loader { source_type: SourceType::Web, .. }));
    }

    #[test]
    fn test_invalid_url() {
        let err = WebLoader::default().load("not a url").unwrap_err();
        assert!(matches!(err, Error::Loader { .. }));
    }
}
