//! Contract text sources
//!
//! Turns an uploaded PDF or pasted text into the single contract string the
//! auditor analyses.

pub mod error;
pub mod extract;
pub mod source;

pub use error::PdfError;
pub use extract::{extract_pdf_text, join_pages};
pub use source::ContractSource;
