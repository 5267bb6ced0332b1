//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::{debug, trace};

use super::{PdfProcessor, Result};
use crate::error::PdfError;

/// Loads a receipt with lopdf and reads its text layer with pdf-extract.
#[derive(Default)]
pub struct PdfExtractor {
    /// Bytes handed to pdf-extract, decrypted when the file was encrypted.
    text_source: Option<Vec<u8>>,
}

impl PdfExtractor {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Serialize a decrypted document so pdf-extract can read it.
fn decrypted_bytes(doc: &mut Document) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
    Ok(bytes)
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Receipts are often encrypted with an empty user password
        let encrypted = doc.is_encrypted();
        if encrypted {
            doc.decrypt("").map_err(|_| PdfError::Encrypted)?;
            debug!("Decrypted receipt with empty password");
        }
        if doc.get_pages().is_empty() {
            return Err(PdfError::NoPages);
        }

        self.text_source = Some(if encrypted {
            decrypted_bytes(&mut doc)?
        } else {
            data.to_vec()
        });
        Ok(())
    }

    fn extract_text(&self) -> Result<String> {
        let data = self
            .text_source
            .as_deref()
            .ok_or_else(|| PdfError::Parse("No document loaded".to_string()))?;

        // pdf-extract panics on some malformed content streams
        let mut text = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(data))
            .map_err(|_| PdfError::TextExtraction("text extraction panicked".to_string()))?
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;
        if !text.ends_with('\n') {
            text.push('\n');
        }

        trace!("Extracted {} chars of text", text.len());
        Ok(text)
    }
}
