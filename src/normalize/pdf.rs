//! PDF text extraction via lopdf.

use lopdf::Document;
use tracing::debug;

use crate::error::NormalizeError;

/// Extract text from PDF bytes, page by page, joined with newlines.
///
/// Pages without extractable text (scanned images, unsupported encodings)
/// contribute nothing rather than failing the document; a fully empty
/// result is still a valid extraction. Only an unparseable PDF stream is a
/// `Decode` error.
pub(super) fn extract_text(bytes: &[u8]) -> Result<String, NormalizeError> {
    let doc = Document::load_mem(bytes).map_err(|e| NormalizeError::Decode {
        kind: "pdf".into(),
        reason: e.to_string(),
    })?;

    let mut pages = Vec::new();
    for page_number in doc.get_pages().keys() {
        match doc.extract_text(&[*page_number]) {
            Ok(text) => pages.push(text),
            Err(e) => {
                debug!(page = *page_number, error = %e, "Page has no extractable text");
            }
        }
    }

    Ok(pages.join("\n"))
}
