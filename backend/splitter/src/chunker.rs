use crate::language::Language;
use crate::merge::{merge_pieces, split_keep_start};
use crate::{CharSizer, ChunkSizer, Span, TextSplitter};
use chunkwise_core::{Result, SplitConfig};

/// Paragraphs, then lines, then words, then characters.
pub const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Splits text on the coarsest separator that occurs in it and recurses into
/// pieces that are still too large with the next separator in the hierarchy.
///
/// Pieces keep their separator at the start. Chunks are trimmed by default;
/// with `strip_whitespace(false)` they are untouched substrings that cover the
/// whole input.
pub struct RecursiveSplitter<S = CharSizer> {
    config: SplitConfig,
    separators: Vec<String>,
    sizer: S,
    strip_whitespace: bool,
}

impl RecursiveSplitter<CharSizer> {
    /// Create a splitter with the default separator hierarchy, measuring characters
    pub fn new(config: SplitConfig) -> Self {
        Self {
            config,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
            sizer: CharSizer,
            strip_whitespace: true,
        }
    }

    /// Create a splitter that prefers the syntactic boundaries of `language`
    pub fn for_language(language: Language, config: SplitConfig) -> Self {
        Self::new(config).with_separators(language.separators())
    }
}

impl<S: ChunkSizer> RecursiveSplitter<S> {
    pub fn with_separators<I, T>(mut self, separators: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.separators = separators.into_iter().map(Into::into).collect();
        self
    }

    /// Measure chunks with another sizer, e.g. a `tokenizers::Tokenizer`.
    pub fn with_sizer<T: ChunkSizer>(self, sizer: T) -> RecursiveSplitter<T> {
        RecursiveSplitter {
            config: self.config,
            separators: self.separators,
            sizer,
            strip_whitespace: self.strip_whitespace,
        }
    }

    /// Trim every chunk and drop chunks that are only whitespace (on by default).
    pub fn strip_whitespace(mut self, strip: bool) -> Self {
        self.strip_whitespace = strip;
        self
    }

    pub fn separators(&self) -> &[String] {
        &self.separators
    }

    fn split_span(&self, text: &str, span: Span, separators: &[String], out: &mut Vec<Span>) -> Result<()> {
        let slice = &text[span.range()];
        let position = separators
            .iter()
            .position(|s| s.is_empty() || slice.contains(s.as_str()));

        let (pieces, remaining) = match position {
            Some(i) => (
                split_keep_start(text, span, &separators[i]),
                &separators[i + 1..],
            ),
            None => (vec![span], &separators[separators.len()..]),
        };

        let mut fitting = Vec::new();
        for piece in pieces {
            if self.sizer.size(&text[piece.range()])? <= self.config.chunk_size() {
                fitting.push(piece);
                continue;
            }

            if !fitting.is_empty() {
                merge_pieces(text, &fitting, &self.config, &self.sizer, out)?;
                fitting.clear();
            }

            if remaining.is_empty() {
                out.push(piece);
            } else {
                self.split_span(text, piece, remaining, out)?;
            }
        }

        if !fitting.is_empty() {
            merge_pieces(text, &fitting, &self.config, &self.sizer, out)?;
        }
        Ok(())
    }
}

impl<S: ChunkSizer> TextSplitter for RecursiveSplitter<S> {
    fn split_text(&self, text: &str) -> Result<Vec<Span>> {
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let whole = Span::new(0, text.len());
        let mut spans = Vec::new();
        if self.sizer.size(text)? <= self.config.chunk_size() {
            spans.push(whole);
        } else {
            self.split_span(text, whole, &self.separators, &mut spans)?;
        }

        Ok(finish(text, spans, self.strip_whitespace))
    }

    fn config(&self) -> &SplitConfig {
        &self.config
    }
}

/// Splits on a single separator and merges the pieces; pieces larger than
/// `chunk_size` are kept whole.
///
/// By default the separator is left out at chunk edges and chunks are trimmed.
pub struct CharacterSplitter {
    config: SplitConfig,
    separator: String,
    keep_separator: bool,
    strip_whitespace: bool,
}

impl CharacterSplitter {
    pub fn new(config: SplitConfig) -> Self {
        Self::with_separator("\n\n", config)
    }

    pub fn with_separator(separator: impl Into<String>, config: SplitConfig) -> Self {
        Self {
            config,
            separator: separator.into(),
            keep_separator: false,
            strip_whitespace: true,
        }
    }

    /// Keep the separator at the start of the chunk that follows it.
    pub fn keep_separator(mut self, keep: bool) -> Self {
        self.keep_separator = keep;
        self
    }

    pub fn strip_whitespace(mut self, strip: bool) -> Self {
        self.strip_whitespace = strip;
        self
    }
}

impl TextSplitter for CharacterSplitter {
    fn split_text(&self, text: &str) -> Result<Vec<Span>> {
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let pieces = split_keep_start(text, Span::new(0, text.len()), &self.separator);
        let mut spans = Vec::new();
        merge_pieces(text, &pieces, &self.config, &CharSizer, &mut spans)?;

        if !self.keep_separator && !self.separator.is_empty() {
            for span in &mut spans {
                if text[span.range()].starts_with(self.separator.as_str()) {
                    span.start += self.separator.len();
                }
            }
        }

        Ok(finish(text, spans, self.strip_whitespace))
    }

    fn config(&self) -> &SplitConfig {
        &self.config
    }
}

fn finish(text: &str, spans: Vec<Span>, strip_whitespace: bool) -> Vec<Span> {
    if strip_whitespace {
        spans.iter().filter_map(|s| s.trimmed(text)).collect()
    } else {
        spans.into_iter().filter(|s| !s.is_empty()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chunkwise_core::{Document, START_INDEX_KEY};

    fn config(size: usize, overlap: usize) -> SplitConfig {
        SplitConfig::new(size, overlap).unwrap()
    }

    fn contents(splitter: &impl TextSplitter, text: &str) -> Vec<String> {
        splitter
            .split_text(text)
            .unwrap()
            .iter()
            .map(|s| text[s.range()].to_string())
            .collect()
    }

    #[test]
    fn test_paragraphs_are_not_merged_across_lines() {
        let splitter = RecursiveSplitter::new(config(10, 2));
        let chunks = splitter
            .split_documents(&[Document::new("line1\n\nline2\n\nline3")])
            .unwrap();

        let lines: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(lines, vec!["line1", "line2", "line3"]);

        let starts: Vec<usize> = chunks.iter().filter_map(|c| c.start_index()).collect();
        assert_eq!(starts, vec![0, 7, 14]);
    }

    #[test]
    fn test_without_stripping_chunks_keep_their_separator() {
        let splitter = RecursiveSplitter::new(config(10, 2)).strip_whitespace(false);
        let text = "line1\n\nline2\n\nline3";
        assert_eq!(
            contents(&splitter, text),
            vec!["line1", "\n\nline2", "\n\nline3"]
        );

        let chunks = splitter.split_documents(&[Document::new(text)]).unwrap();
        assert_eq!(chunks[1].start_index(), Some(5));
        assert_eq!(chunks[2].start_index(), Some(12));
    }

    #[test]
    fn test_overlap_carries_whole_words() {
        let text = "aaa bbb ccc ddd";

        let exact = RecursiveSplitter::new(config(11, 4)).strip_whitespace(false);
        assert_eq!(contents(&exact, text), vec!["aaa bbb ccc", " ccc ddd"]);

        let chunks = RecursiveSplitter::new(config(11, 4))
            .split_documents(&[Document::new(text)])
            .unwrap();
        assert_eq!(chunks[0].content, "aaa bbb ccc");
        assert_eq!(chunks[1].content, "ccc ddd");
        assert_eq!(chunks[1].start_index(), Some(8));
    }

    struct FailingSizer;

    impl ChunkSizer for FailingSizer {
        fn size(&self, _text: &str) -> Result<usize> {
            Err(chunkwise_core::Error::Tokenizer("vocabulary not loaded".into()))
        }
    }

    #[test]
    fn test_sizer_errors_are_returned() {
        let splitter = RecursiveSplitter::new(config(10, 2)).with_sizer(FailingSizer);
        let err = splitter.split_text("some text that needs measuring").unwrap_err();
        assert!(matches!(err, chunkwise_core::Error::Tokenizer(_)));

        let err = splitter
            .split_documents(&[Document::new("short")])
            .unwrap_err();
        assert!(matches!(err, chunkwise_core::Error::Tokenizer(_)));
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        let splitter = RecursiveSplitter::new(config(100, 10));
        let doc = Document::with_source("short text", "a.txt");
        let chunks = splitter.split_documents(&[doc]).unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "short text");
        assert_eq!(chunks[0].start_index(), Some(0));
        assert_eq!(chunks[0].source(), Some("a.txt"));
    }

    #[test]
    fn test_empty_text() {
        let splitter = RecursiveSplitter::new(SplitConfig::default());
        let chunks = splitter.split_documents(&[Document::new("")]).unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_character_fallback_overlaps_exactly() {
        let splitter = RecursiveSplitter::new(config(10, 3));
        let text = "abcdefghijklmnopqrstuvwxyz";
        let chunks = splitter.split_documents(&[Document::new(text)]).unwrap();

        let starts: Vec<usize> = chunks.iter().filter_map(|c| c.start_index()).collect();
        assert_eq!(starts, vec![0, 7, 14, 21]);
        assert_eq!(chunks[0].content, "abcdefghij");
        assert_eq!(chunks[3].content, "vwxyz");

        for pair in chunks.windows(2) {
            let prev = &pair[0].content;
            let next = &pair[1].content;
            assert_eq!(&prev[prev.len() - 3..], &next[..3]);
        }
    }

    #[test]
    fn test_falls_back_to_words_then_chars() {
        let splitter = RecursiveSplitter::new(config(8, 0)).strip_whitespace(false);
        let text = "tiny supercalifragilistic word";
        let pieces = contents(&splitter, text);

        assert!(pieces.iter().all(|p| p.chars().count() <= 8));
        assert_eq!(pieces.concat(), text);
        assert_eq!(pieces[0], "tiny");
    }

    #[test]
    fn test_spans_reconstruct_original() {
        let text = "The quick brown fox.\n\nJumps over the lazy dog.\nAnd runs away quickly\n\n\
                    Then it rests under a tree for a long while.";
        let splitter = RecursiveSplitter::new(config(20, 5)).strip_whitespace(false);
        let chunks = splitter.split_documents(&[Document::new(text)]).unwrap();

        let chars: Vec<char> = text.chars().collect();
        let mut rebuilt = String::new();
        let mut covered = 0;
        for chunk in &chunks {
            let start = chunk.start_index().unwrap();
            let len = chunk.content.chars().count();
            assert_eq!(chars[start..start + len].iter().collect::<String>(), chunk.content);
            assert!(start <= covered, "gap before chunk at {}", start);
            rebuilt.extend(chunk.content.chars().skip(covered - start));
            covered = start + len;
        }
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_resplitting_a_small_chunk_is_identity() {
        let splitter = RecursiveSplitter::new(config(12, 4));
        let chunks = splitter
            .split_documents(&[Document::new("alpha beta gamma delta epsilon")])
            .unwrap();

        for chunk in chunks {
            let again = splitter.split_documents(&[chunk.clone().into()]).unwrap();
            assert_eq!(again.len(), 1);
            assert_eq!(again[0].content, chunk.content);
        }
    }

    #[test]
    fn test_start_index_disabled() {
        let splitter = RecursiveSplitter::new(config(5, 0).with_start_index(false));
        let chunks = splitter.create_documents(&["aaaa bbbb"]).unwrap();
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| !c.metadata.contains_key(START_INDEX_KEY)));
    }

    #[test]
    fn test_start_index_counts_chars_not_bytes() {
        let splitter = RecursiveSplitter::new(config(6, 0));
        let chunks = splitter.create_documents(&["ééééé ààààà"]).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].content, "ààààà");
        assert_eq!(chunks[1].start_index(), Some(6));
    }

    #[test]
    fn test_custom_separators_without_match_keep_piece() {
        let splitter = RecursiveSplitter::new(config(3, 0)).with_separators(["|"]);
        assert_eq!(contents(&splitter, "abcdef"), vec!["abcdef"]);
    }

    #[test]
    fn test_character_splitter_keeps_large_pieces() {
        let splitter = CharacterSplitter::new(config(10, 2));
        let text = "short\n\nthis paragraph is too long\n\nend";
        assert_eq!(
            contents(&splitter, text),
            vec!["short", "this paragraph is too long", "end"]
        );
    }

    #[test]
    fn test_character_splitter_merges_small_pieces() {
        let splitter = CharacterSplitter::with_separator(" ", config(11, 0));
        assert_eq!(contents(&splitter, "a b c d e f"), vec!["a b c d e f"]);
        assert_eq!(contents(&splitter, "aaa bbb ccc ddd"), vec!["aaa bbb ccc", "ddd"]);
    }

    #[test]
    fn test_character_splitter_drops_separator() {
        let splitter = CharacterSplitter::new(config(10, 2));
        let text = "line1\n\nline2\n\nline3";
        assert_eq!(contents(&splitter, text), vec!["line1", "line2", "line3"]);

        let pipes = CharacterSplitter::with_separator("|", config(7, 0));
        assert_eq!(contents(&pipes, "aaa|bbb|ccc"), vec!["aaa|bbb", "ccc"]);
    }

    #[test]
    fn test_character_splitter_can_keep_separator() {
        let splitter = CharacterSplitter::new(config(10, 2))
            .keep_separator(true)
            .strip_whitespace(false);
        let text = "line1\n\nline2\n\nline3";
        assert_eq!(
            contents(&splitter, text),
            vec!["line1", "\n\nline2", "\n\nline3"]
        );
    }
}
