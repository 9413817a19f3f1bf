use chunkwise_core::{Chunk, Content, SOURCE_KEY};
use colored::Colorize;
use std::io::{self, Write};

/// Print documents line by line, each under a `--- Source: ... ---` header.
///
/// Items without a `source` are labelled `doc_<n>`, counting from 1.
pub fn print_docs_pretty<T: Content, W: Write>(docs: &[T], show_source: bool, out: &mut W) -> io::Result<()> {
    if docs.is_empty() {
        return writeln!(out, "[no documents]");
    }

    for (idx, doc) in docs.iter().enumerate() {
        if show_source {
            let source = match doc.metadata().get(SOURCE_KEY) {
                Some(serde_json::Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => format!("doc_{}", idx + 1),
            };
            writeln!(out, "{}", format!("--- Source: {} ---", source).cyan())?;
        }
        for line in doc.content().lines() {
            writeln!(out, "{}", line)?;
        }
    }
    Ok(())
}

/// One line per chunk: its position, `start_index` when present and the quoted content.
pub fn print_chunks<W: Write>(chunks: &[Chunk], out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", format!("{} chunks", chunks.len()).bold())?;
    for (idx, chunk) in chunks.iter().enumerate() {
        let position = match chunk.start_index() {
            Some(start) => format!("[{} @{}]", idx, start),
            None => format!("[{}]", idx),
        };
        writeln!(out, "{} {:?}", position.dimmed(), chunk.content)?;
    }
    Ok(())
}
