//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::debug;

use crate::error::PdfError;
use crate::text::DocumentText;

/// Direct text-layer extractor for statement PDFs.
///
/// Recovers the embedded text layer only; scanned statements come back
/// empty here and are handed to an OCR provider by the caller.
#[derive(Debug)]
pub struct PdfTextExtractor {
    raw_data: Vec<u8>,
    page_count: usize,
}

impl PdfTextExtractor {
    /// Load a PDF from bytes.
    ///
    /// PDFs encrypted with an empty password are decrypted transparently;
    /// anything needing a real password is rejected.
    pub fn load(data: &[u8]) -> Result<Self, PdfError> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        let raw_data = if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("decrypted PDF with empty password");

            let mut decrypted = Vec::new();
            doc.save_to(&mut decrypted)
                .map_err(|e| PdfError::Parse(format!("failed to save decrypted PDF: {e}")))?;
            decrypted
        } else {
            data.to_vec()
        };

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("loaded PDF with {} pages", page_count);
        Ok(Self {
            raw_data,
            page_count,
        })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Extract the text layer of all pages.
    pub fn extract_text(&self) -> Result<DocumentText, PdfError> {
        let text = pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;
        Ok(DocumentText::from_full_text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_garbage_bytes() {
        let err = PdfTextExtractor::load(b"not a pdf").unwrap_err();
        assert!(matches!(err, PdfError::Parse(_)));
    }
}
