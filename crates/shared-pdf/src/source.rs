//! Resolution of the contract text from the two input widgets.
//!
//! The PDF is read first and pasted text, when present, overwrites it
//! (last write wins). Whether that precedence is intended is an open
//! product question; it is kept as-is.

use tracing::{info, warn};

use crate::error::PdfError;
use crate::extract::extract_pdf_text;

/// Contract text gathered from an upload and/or the paste area
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractSource {
    pub pdf_text: Option<String>,
    pub pasted_text: Option<String>,
}

impl ContractSource {
    /// Build a source from raw inputs, extracting the PDF if one was given.
    ///
    /// Extraction failure is only an error when there is no pasted text to
    /// fall back on, since pasted text would overwrite the PDF anyway.
    pub fn from_inputs(
        pdf_bytes: Option<&[u8]>,
        pasted_text: Option<String>,
    ) -> Result<Self, PdfError> {
        // Whitespace-only paste counts as no paste: it neither hides an
        // uploaded PDF nor gets sent for analysis on its own.
        let pasted_text = pasted_text.filter(|t| has_content(t));

        let pdf_text = match pdf_bytes.filter(|b| !b.is_empty()) {
            None => None,
            Some(bytes) => match extract_pdf_text(bytes) {
                Ok(text) => {
                    info!("PDF read: {} bytes -> {} chars", bytes.len(), text.len());
                    Some(text)
                }
                Err(e) if pasted_text.is_some() => {
                    warn!("PDF extraction failed, using pasted text instead: {}", e);
                    None
                }
                Err(e) => return Err(e),
            },
        };

        Ok(Self {
            pdf_text,
            pasted_text,
        })
    }

    /// True when a PDF was read and yielded some text
    pub fn pdf_loaded(&self) -> bool {
        self.pdf_text.as_deref().is_some_and(has_content)
    }

    /// Final text to analyse, or `None` when there is nothing to send.
    ///
    /// Non-blank pasted text wins over PDF text; the winning value is
    /// returned verbatim.
    pub fn resolve(&self) -> Option<&str> {
        let mut text: Option<&str> = None;
        if let Some(pdf) = self.pdf_text.as_deref() {
            text = Some(pdf);
        }
        if let Some(pasted) = self.pasted_text.as_deref().filter(|t| has_content(t)) {
            text = Some(pasted);
        }
        text.filter(|t| has_content(t))
    }
}

fn has_content(text: &str) -> bool {
    !text.trim().is_empty()
}
