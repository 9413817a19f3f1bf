//! Splitting documents into overlapping, size-bounded chunks.
//!
//! Every splitter works on byte [`Span`]s of the input so a chunk is always an
//! exact substring of its document and `start_index` can be computed precisely.

use chunkwise_core::{Chunk, Document, Metadata, Result, SplitConfig, START_INDEX_KEY};
use std::ops::Range;

pub mod chunker;
pub mod html;
pub mod json;
pub mod language;
pub mod markdown;
mod merge;
pub mod token;

pub use chunker::{CharacterSplitter, RecursiveSplitter};
pub use html::HtmlHeaderSplitter;
pub use json::JsonSplitter;
pub use language::Language;
pub use markdown::MarkdownHeaderSplitter;
pub use token::{TokenSplitter, Tokenize, WhitespaceTokenizer};

/// Byte range of a chunk within the text it was cut from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// The same span without leading/trailing whitespace, or `None` if nothing is left.
    pub fn trimmed(&self, text: &str) -> Option<Span> {
        let slice = &text[self.range()];
        let trimmed = slice.trim();
        if trimmed.is_empty() {
            return None;
        }
        let lead = slice.len() - slice.trim_start().len();
        let start = self.start + lead;
        Some(Span::new(start, start + trimmed.len()))
    }
}

/// Measures how "long" a piece of text is for chunking purposes.
pub trait ChunkSizer: Send + Sync {
    /// Fails when the text cannot be measured, e.g. a tokenizer error.
    fn size(&self, text: &str) -> Result<usize>;
}

/// Length in Unicode scalar values.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharSizer;

impl ChunkSizer for CharSizer {
    fn size(&self, text: &str) -> Result<usize> {
        Ok(text.chars().count())
    }
}

impl<T: ChunkSizer + ?Sized> ChunkSizer for &T {
    fn size(&self, text: &str) -> Result<usize> {
        (**self).size(text)
    }
}

pub trait TextSplitter {
    /// Cut `text` into chunk spans, in document order.
    fn split_text(&self, text: &str) -> Result<Vec<Span>>;

    fn config(&self) -> &SplitConfig;

    /// Hook for splitters that tag their chunks.
    fn annotate(&self, _metadata: &mut Metadata) {}

    /// Split each document, copying its metadata onto every chunk.
    fn split_documents(&self, docs: &[Document]) -> Result<Vec<Chunk>> {
        let mut chunks = Vec::new();

        for doc in docs {
            let spans = self.split_text(&doc.content)?;
            let mut offsets = CharOffsets::new(&doc.content);

            for span in spans {
                let mut metadata = doc.metadata.clone();
                if self.config().add_start_index() {
                    metadata.insert(START_INDEX_KEY.to_string(), offsets.at(span.start).into());
                }
                self.annotate(&mut metadata);

                chunks.push(Chunk {
                    content: doc.content[span.range()].to_string(),
                    metadata,
                });
            }
        }

        tracing::debug!("Split {} documents into {} chunks", docs.len(), chunks.len());
        Ok(chunks)
    }

    /// Split raw texts that carry no metadata of their own.
    fn create_documents(&self, texts: &[&str]) -> Result<Vec<Chunk>> {
        let docs: Vec<Document> = texts.iter().map(|t| Document::new(*t)).collect();
        self.split_documents(&docs)
    }
}

/// Converts byte offsets to character offsets, walking forward from the last lookup.
struct CharOffsets<'a> {
    text: &'a str,
    byte: usize,
    chars: usize,
}

impl<'a> CharOffsets<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            byte: 0,
            chars: 0,
        }
    }

    fn at(&mut self, byte: usize) -> usize {
        if byte < self.byte {
            self.byte = 0;
            self.chars = 0;
        }
        self.chars += self.text[self.byte..byte].chars().count();
        self.byte = byte;
        self.chars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_trimmed() {
        let text = "  hello \n";
        let span = Span::new(0, text.len()).trimmed(text).unwrap();
        assert_eq!(&text[span.range()], "hello");
        assert_eq!(span.start, 2);
        assert!(Span::new(0, 2).trimmed(text).is_none());
    }

    #[test]
    fn test_char_offsets_handle_multibyte() {
        let text = "héllo wörld";
        let mut offsets = CharOffsets::new(text);
        let w = text.find('w').unwrap();
        assert_eq!(offsets.at(w), 6);
        assert_eq!(offsets.at(0), 0);
        assert_eq!(offsets.at(text.len()), 11);
    }

    #[test]
    fn test_char_sizer_counts_chars() {
        assert_eq!(CharSizer.size("héllo").unwrap(), 5);
        assert_eq!((&CharSizer).size("").unwrap(), 0);
    }
}
