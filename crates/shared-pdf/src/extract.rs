//! Linear PDF text extraction
//!
//! Text is read page by page in page order with `lopdf`. There is no
//! column or table reconstruction: each page contributes whatever linear
//! text its content streams decode to.

use std::fmt;

use lopdf::Document;
use tracing::{debug, warn};

use crate::error::PdfError;

/// Extract the text of every page of a PDF, in page order.
///
/// Each page's text is followed by a newline. A page whose content cannot
/// be decoded contributes nothing (best effort); a document that cannot be
/// parsed at all is an error.
pub fn extract_pdf_text(pdf_bytes: &[u8]) -> Result<String, PdfError> {
    let doc = Document::load_mem(pdf_bytes).map_err(|e| {
        let msg = e.to_string();
        if msg.to_lowercase().contains("encrypt") || msg.to_lowercase().contains("password") {
            PdfError::PasswordProtected
        } else {
            PdfError::Parse(msg)
        }
    })?;

    if doc.is_encrypted() {
        return Err(PdfError::PasswordProtected);
    }

    // get_pages() is a BTreeMap keyed by 1-based page number
    let pages = doc.get_pages();
    debug!("Extracting text from {} pages", pages.len());

    let page_texts = pages
        .keys()
        .map(|&page_number| page_text_or_empty(page_number, doc.extract_text(&[page_number])));

    Ok(join_pages(page_texts))
}

/// A page that fails to decode contributes an empty string.
fn page_text_or_empty<E: fmt::Display>(page_number: u32, result: Result<String, E>) -> String {
    result.unwrap_or_else(|e| {
        warn!("Could not extract text from page {}: {}", page_number, e);
        String::new()
    })
}

/// Concatenate page texts in order, each followed by a newline.
pub fn join_pages<I>(pages: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut text = String::new();
    for page in pages {
        text.push_str(page.as_ref());
        text.push('\n');
    }
    text
}
