use chunkwise_core::{Document, Metadata};

/// Splits markdown into one document per section, recording the enclosing
/// headers (`Header 1`, `Header 2`, ...) as metadata.
pub struct MarkdownHeaderSplitter {
    /// `(prefix, metadata key)`, longest prefix first
    headers: Vec<(String, String)>,
    strip_headers: bool,
}

struct OpenHeader {
    level: usize,
    key: String,
    title: String,
}

impl MarkdownHeaderSplitter {
    pub fn new<I, P, K>(headers: I) -> Self
    where
        I: IntoIterator<Item = (P, K)>,
        P: Into<String>,
        K: Into<String>,
    {
        let mut headers: Vec<(String, String)> = headers
            .into_iter()
            .map(|(p, k)| (p.into(), k.into()))
            .collect();
        headers.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        Self {
            headers,
            strip_headers: true,
        }
    }

    /// Keep header lines in the section content.
    pub fn keep_headers(mut self) -> Self {
        self.strip_headers = false;
        self
    }

    pub fn split_text(&self, text: &str) -> Vec<Document> {
        self.split_with(text, &Metadata::new())
    }

    /// Split every document; sections inherit the document's metadata.
    pub fn split_documents(&self, docs: &[Document]) -> Vec<Document> {
        docs.iter()
            .flat_map(|doc| self.split_with(&doc.content, &doc.metadata))
            .collect()
    }

    fn split_with(&self, text: &str, base: &Metadata) -> Vec<Document> {
        let mut sections = Vec::new();
        let mut open: Vec<OpenHeader> = Vec::new();
        let mut lines: Vec<&str> = Vec::new();
        let mut fence: Option<&str> = None;

        for raw in text.lines() {
            let line = raw.trim();

            if let Some(marker) = fence {
                lines.push(raw);
                if line.starts_with(marker) {
                    fence = None;
                }
                continue;
            }
            if line.starts_with("```") || line.starts_with("~~~") {
                fence = Some(&line[..3]);
                lines.push(raw);
                continue;
            }

            if let Some((prefix, key)) = self.header_for(line) {
                flush(&mut sections, &mut lines, base, &open);

                let level = prefix.matches('#').count().max(1);
                while open.last().is_some_and(|h| h.level >= level) {
                    open.pop();
                }
                open.push(OpenHeader {
                    level,
                    key: key.to_string(),
                    title: line[prefix.len()..].trim().to_string(),
                });

                if !self.strip_headers {
                    lines.push(line);
                }
                continue;
            }

            lines.push(line);
        }

        flush(&mut sections, &mut lines, base, &open);
        sections
    }

    fn header_for<'a>(&'a self, line: &str) -> Option<(&'a str, &'a str)> {
        self.headers
            .iter()
            .find(|(prefix, _)| {
                line.starts_with(prefix.as_str())
                    && (line.len() == prefix.len() || line[prefix.len()..].starts_with(' '))
            })
            .map(|(p, k)| (p.as_str(), k.as_str()))
    }
}

impl Default for MarkdownHeaderSplitter {
    fn default() -> Self {
        Self::new([
            ("#", "Header 1"),
            ("##", "Header 2"),
            ("###", "Header 3"),
            ("####", "Header 4"),
        ])
    }
}

fn flush(sections: &mut Vec<Document>, lines: &mut Vec<&str>, base: &Metadata, open: &[OpenHeader]) {
    let content = lines.join("\n");
    lines.clear();

    let content = content.trim();
    if content.is_empty() {
        return;
    }

    let mut metadata = base.clone();
    for header in open {
        metadata.insert(header.key.clone(), header.title.clone().into());
    }
    sections.push(Document {
        content: content.to_string(),
        metadata,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_carry_headers() {
        let md = "# Title\n\n## Section A\ncontent a\n\n## Section B\ncontent b";
        let sections = MarkdownHeaderSplitter::default().split_text(md);

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].content, "content a");
        assert_eq!(sections[0].metadata["Header 1"], "Title");
        assert_eq!(sections[0].metadata["Header 2"], "Section A");
        assert_eq!(sections[1].content, "content b");
        assert_eq!(sections[1].metadata["Header 2"], "Section B");
    }

    #[test]
    fn test_sibling_header_replaces_deeper_ones() {
        let md = "# A\n## A.1\n### A.1.a\ntext\n## A.2\nmore";
        let sections = MarkdownHeaderSplitter::default().split_text(md);

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].metadata["Header 3"], "A.1.a");
        assert!(!sections[1].metadata.contains_key("Header 3"));
        assert_eq!(sections[1].metadata["Header 2"], "A.2");
    }

    #[test]
    fn test_headers_inside_code_fences_are_ignored() {
        let md = "# Doc\n```sh\n# not a header\n  indented\n```\nafter";
        let sections = MarkdownHeaderSplitter::default().split_text(md);

        assert_eq!(sections.len(), 1);
        assert!(sections[0].content.contains("# not a header"));
        assert!(sections[0].content.contains("\n  indented\n"));
    }

    #[test]
    fn test_hashtags_are_not_headers() {
        let sections = MarkdownHeaderSplitter::default().split_text("#tag line");
        assert_eq!(sections.len(), 1);
        assert!(sections[0].metadata.is_empty());
    }

    #[test]
    fn test_keep_headers_and_inherit_metadata() {
        let doc = Document::with_source("# Intro\nhello", "notes.md");
        let sections = MarkdownHeaderSplitter::default()
            .keep_headers()
            .split_documents(&[doc]);

        assert_eq!(sections[0].content, "# Intro\nhello");
        assert_eq!(sections[0].source(), Some("notes.md"));
    }
}
