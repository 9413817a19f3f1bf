use chunkwise_core::{Document, Metadata};
use scraper::{ElementRef, Html, Node};

/// Elements whose text never ends up in a section.
const SKIPPED: [&str; 6] = ["head", "script", "style", "noscript", "template", "title"];

/// Elements that continue the line of their parent instead of starting a new one.
const INLINE: [&str; 18] = [
    "a", "abbr", "b", "cite", "code", "em", "i", "kbd", "label", "mark", "q", "s", "small", "span",
    "strong", "sub", "sup", "u",
];

/// Splits an HTML page into one document per header section, recording the
/// enclosing headers (`Header 1`, `Header 2`, ...) as metadata.
///
/// Text is collected in document order; each block element starts a new line.
pub struct HtmlHeaderSplitter {
    /// `(tag, metadata key)`, e.g. `("h2", "Header 2")`
    headers: Vec<(String, String)>,
}

struct OpenHeader {
    level: usize,
    key: String,
    title: String,
}

impl HtmlHeaderSplitter {
    pub fn new<I, T, K>(headers: I) -> Self
    where
        I: IntoIterator<Item = (T, K)>,
        T: Into<String>,
        K: Into<String>,
    {
        Self {
            headers: headers
                .into_iter()
                .map(|(t, k)| (t.into().to_ascii_lowercase(), k.into()))
                .collect(),
        }
    }

    pub fn split_text(&self, html: &str) -> Vec<Document> {
        self.split_with(html, &Metadata::new())
    }

    /// Split every document's HTML; sections inherit the document's metadata.
    pub fn split_documents(&self, docs: &[Document]) -> Vec<Document> {
        docs.iter()
            .flat_map(|doc| self.split_with(&doc.content, &doc.metadata))
            .collect()
    }

    fn split_with(&self, html: &str, base: &Metadata) -> Vec<Document> {
        let document = Html::parse_document(html);

        let mut sections = Vec::new();
        let mut open: Vec<OpenHeader> = Vec::new();
        let mut lines: Vec<String> = Vec::new();
        let mut current_block = None;

        for node in document.tree.root().descendants() {
            match node.value() {
                Node::Element(el) => {
                    let Some((level, key)) = self.header_for(el.name()) else {
                        continue;
                    };
                    let title = ElementRef::wrap(node).map(|el| element_text(&el)).unwrap_or_default();

                    flush(&mut sections, &mut lines, base, &open);
                    current_block = None;

                    while open.last().is_some_and(|h| h.level >= level) {
                        open.pop();
                    }
                    open.push(OpenHeader {
                        level,
                        key: key.to_string(),
                        title,
                    });
                }
                Node::Text(text) => {
                    let text = text.trim();
                    if text.is_empty() {
                        continue;
                    }

                    let mut block = None;
                    let mut hidden = false;
                    for ancestor in node.ancestors() {
                        let Node::Element(el) = ancestor.value() else {
                            continue;
                        };
                        let name = el.name();
                        if SKIPPED.contains(&name) || self.header_for(name).is_some() {
                            hidden = true;
                            break;
                        }
                        if block.is_none() && !INLINE.contains(&name) {
                            block = Some(ancestor.id());
                        }
                    }
                    if hidden {
                        continue;
                    }

                    match lines.last_mut() {
                        Some(line) if block.is_some() && block == current_block => {
                            line.push(' ');
                            line.push_str(text);
                        }
                        _ => lines.push(text.to_string()),
                    }
                    current_block = block;
                }
                _ => {}
            }
        }

        flush(&mut sections, &mut lines, base, &open);
        sections
    }

    fn header_for(&self, tag: &str) -> Option<(usize, &str)> {
        self.headers
            .iter()
            .position(|(t, _)| t == tag)
            .map(|i| {
                let level = tag
                    .strip_prefix('h')
                    .and_then(|n| n.parse().ok())
                    .unwrap_or(i + 1);
                (level, self.headers[i].1.as_str())
            })
    }
}

impl Default for HtmlHeaderSplitter {
    fn default() -> Self {
        Self::new([
            ("h1", "Header 1"),
            ("h2", "Header 2"),
            ("h3", "Header 3"),
            ("h4", "Header 4"),
        ])
    }
}

fn element_text(el: &ElementRef) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn flush(sections: &mut Vec<Document>, lines: &mut Vec<String>, base: &Metadata, open: &[OpenHeader]) {
    if lines.is_empty() {
        return;
    }
    let content = lines.join("\n");
    lines.clear();

    let mut metadata = base.clone();
    for header in open {
        metadata.insert(header.key.clone(), header.title.clone().into());
    }
    sections.push(Document { content, metadata });
}
