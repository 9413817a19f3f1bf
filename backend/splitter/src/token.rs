//! Token-count based splitting.

use crate::{ChunkSizer, Span, TextSplitter};
use chunkwise_core::{BoxError, Error, Metadata, Result, SplitConfig};
use tokenizers::Tokenizer;

/// Anything that can report where each token sits in a text.
pub trait Tokenize: Send + Sync {
    /// Byte offsets `(start, end)` of every token in `text`, in order.
    fn token_offsets(&self, text: &str) -> std::result::Result<Vec<(usize, usize)>, BoxError>;
}

impl Tokenize for Tokenizer {
    fn token_offsets(&self, text: &str) -> std::result::Result<Vec<(usize, usize)>, BoxError> {
        let encoding = self.encode(text, false)?;
        Ok(encoding.get_offsets().to_vec())
    }
}

impl ChunkSizer for Tokenizer {
    fn size(&self, chunk: &str) -> Result<usize> {
        self.encode(chunk, false)
            .map(|encoding| encoding.len())
            .map_err(Error::Tokenizer)
    }
}

/// Treats every run of non-whitespace as one token.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl Tokenize for WhitespaceTokenizer {
    fn token_offsets(&self, text: &str) -> std::result::Result<Vec<(usize, usize)>, BoxError> {
        let mut offsets = Vec::new();
        let mut start = None;

        for (i, c) in text.char_indices() {
            match (c.is_whitespace(), start) {
                (true, Some(s)) => {
                    offsets.push((s, i));
                    start = None;
                }
                (false, None) => start = Some(i),
                _ => {}
            }
        }
        if let Some(s) = start {
            offsets.push((s, text.len()));
        }

        Ok(offsets)
    }
}

impl ChunkSizer for WhitespaceTokenizer {
    fn size(&self, text: &str) -> Result<usize> {
        Ok(text.split_whitespace().count())
    }
}

/// Fixed windows of `chunk_size` tokens, each starting `chunk_size - chunk_overlap`
/// tokens after the previous one.
pub struct TokenSplitter<T> {
    config: SplitConfig,
    tokenizer: T,
}

impl<T: Tokenize> TokenSplitter<T> {
    pub fn new(tokenizer: T, config: SplitConfig) -> Self {
        Self { config, tokenizer }
    }
}

impl<T: Tokenize> TextSplitter for TokenSplitter<T> {
    fn split_text(&self, text: &str) -> Result<Vec<Span>> {
        let offsets: Vec<(usize, usize)> = self
            .tokenizer
            .token_offsets(text)
            .map_err(Error::Tokenizer)?
            .into_iter()
            .filter(|(start, end)| start < end)
            .collect();

        let size = self.config.chunk_size();
        let stride = size - self.config.chunk_overlap();
        let mut spans = Vec::new();

        let mut start = 0;
        while start < offsets.len() {
            let end = (start + size).min(offsets.len());
            spans.push(Span::new(
                floor_boundary(text, offsets[start].0),
                ceil_boundary(text, offsets[end - 1].1),
            ));
            if end == offsets.len() {
                break;
            }
            start += stride;
        }

        Ok(spans)
    }

    fn config(&self) -> &SplitConfig {
        &self.config
    }

    fn annotate(&self, metadata: &mut Metadata) {
        metadata.insert("splitter".to_string(), "token".into());
    }
}

// Byte-level tokenizers may report offsets inside a multi-byte character.
fn floor_boundary(text: &str, mut at: usize) -> usize {
    at = at.min(text.len());
    while !text.is_char_boundary(at) {
        at -= 1;
    }
    at
}

fn ceil_boundary(text: &str, mut at: usize) -> usize {
    at = at.min(text.len());
    while !text.is_char_boundary(at) {
        at += 1;
    }
    at
}
