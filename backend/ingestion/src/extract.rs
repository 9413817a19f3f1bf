//! Text extraction for binary document formats.

use chunkwise_core::BoxError;

/// Extract the text layer of a PDF held in memory.
///
/// Pages are separated by form feeds when the PDF's content streams mark page
/// breaks. A PDF without any extractable text yields an empty string.
pub fn pdf_text(bytes: &[u8]) -> Result<String, BoxError> {
    let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| e.to_string())?;
    if text.trim().is_empty() {
        tracing::debug!("PDF has no extractable text ({} bytes)", bytes.len());
    }
    Ok(text)
}

/// Split extracted PDF text into `(page_number, text)` pairs, dropping blank pages.
pub fn pdf_pages(text: &str) -> Vec<(usize, &str)> {
    text.split('\u{c}')
        .enumerate()
        .filter(|(_, page)| !page.trim().is_empty())
        .collect()
}
