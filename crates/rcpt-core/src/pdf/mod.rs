//! PDF text extraction.

mod extractor;

pub use extractor::PdfExtractor;

use std::path::Path;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF processing implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Extract text from the entire PDF.
    fn extract_text(&self) -> Result<String>;
}

/// Trait for turning a source document into raw text.
pub trait TextExtractor {
    /// Raw (not yet normalized) text of the document at `path`.
    fn extract_document_text(&self, path: &Path) -> crate::Result<String>;
}

/// [`TextExtractor`] for PDF files, backed by [`PdfExtractor`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract_document_text(&self, path: &Path) -> crate::Result<String> {
        let data = std::fs::read(path)?;
        let mut extractor = PdfExtractor::new();
        extractor.load(&data)?;
        Ok(extractor.extract_text()?)
    }
}
