use crate::{ChunkSizer, Span};
use chunkwise_core::{Result, SplitConfig};
use std::collections::VecDeque;

/// Cut `span` of `text` at every occurrence of `separator`, keeping the
/// separator at the start of the piece that follows it. An empty separator
/// cuts between characters. Pieces concatenate back to the input.
pub(crate) fn split_keep_start(text: &str, span: Span, separator: &str) -> Vec<Span> {
    let slice = &text[span.range()];

    if separator.is_empty() {
        return slice
            .char_indices()
            .map(|(i, c)| Span::new(span.start + i, span.start + i + c.len_utf8()))
            .collect();
    }

    let mut pieces = Vec::new();
    let mut from = 0;
    for (at, _) in slice.match_indices(separator) {
        if at > from {
            pieces.push(Span::new(span.start + from, span.start + at));
        }
        from = at;
    }
    if from < slice.len() {
        pieces.push(Span::new(span.start + from, span.end));
    }
    pieces
}

/// Greedily join consecutive pieces into windows of at most `chunk_size`.
///
/// After a window is emitted, pieces are dropped from its front until what is
/// left is no longer than `chunk_overlap` and the next piece fits; the
/// remainder becomes the start of the next window.
pub(crate) fn merge_pieces(
    text: &str,
    pieces: &[Span],
    config: &SplitConfig,
    sizer: &dyn ChunkSizer,
    out: &mut Vec<Span>,
) -> Result<()> {
    let chunk_size = config.chunk_size();
    let overlap = config.chunk_overlap();

    let mut window: VecDeque<(Span, usize)> = VecDeque::new();
    let mut total = 0;

    for &piece in pieces {
        let len = sizer.size(&text[piece.range()])?;

        if total + len > chunk_size && !window.is_empty() {
            emit(&window, total, chunk_size, out);

            while total > overlap || (total + len > chunk_size && total > 0) {
                match window.pop_front() {
                    Some((_, dropped)) => total -= dropped,
                    None => break,
                }
            }
        }

        window.push_back((piece, len));
        total += len;
    }

    if !window.is_empty() {
        emit(&window, total, chunk_size, out);
    }
    Ok(())
}

fn emit(window: &VecDeque<(Span, usize)>, total: usize, chunk_size: usize, out: &mut Vec<Span>) {
    if let (Some((first, _)), Some((last, _))) = (window.front(), window.back()) {
        if total > chunk_size {
            tracing::warn!(
                "Created a chunk of size {}, which is longer than the specified {}",
                total,
                chunk_size
            );
        }
        out.push(Span::new(first.start, last.end));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CharSizer;

    fn texts<'a>(text: &'a str, spans: &[Span]) -> Vec<&'a str> {
        spans.iter().map(|s| &text[s.range()]).collect()
    }

    #[test]
    fn test_split_keeps_separator_at_start() {
        let text = "a\n\nb\n\nc";
        let pieces = split_keep_start(text, Span::new(0, text.len()), "\n\n");
        assert_eq!(texts(text, &pieces), vec!["a", "\n\nb", "\n\nc"]);
    }

    #[test]
    fn test_split_leading_separator() {
        let text = "\n\na";
        let pieces = split_keep_start(text, Span::new(0, text.len()), "\n\n");
        assert_eq!(texts(text, &pieces), vec!["\n\na"]);
    }

    #[test]
    fn test_split_empty_separator_is_per_char() {
        let text = "xaéb";
        let pieces = split_keep_start(text, Span::new(1, text.len()), "");
        assert_eq!(texts(text, &pieces), vec!["a", "é", "b"]);
    }

    #[test]
    fn test_merge_with_overlap() {
        let text = "abcdefghij";
        let pieces = split_keep_start(text, Span::new(0, text.len()), "");
        let config = SplitConfig::new(4, 2).unwrap();
        let mut out = Vec::new();
        merge_pieces(text, &pieces, &config, &CharSizer, &mut out).unwrap();
        assert_eq!(texts(text, &out), vec!["abcd", "cdef", "efgh", "ghij"]);
    }

    #[test]
    fn test_merge_without_overlap() {
        let text = "aa bb cc";
        let pieces = split_keep_start(text, Span::new(0, text.len()), " ");
        let config = SplitConfig::new(5, 0).unwrap();
        let mut out = Vec::new();
        merge_pieces(text, &pieces, &config, &CharSizer, &mut out).unwrap();
        assert_eq!(texts(text, &out), vec!["aa bb", " cc"]);
    }
}
