//! Text acquisition: direct text layer first, OCR for scanned statements.

use tracing::{debug, info};

use crate::error::Result;
use crate::ocr::{create_provider, OcrConfig, OcrProvider};
use crate::pdf::PdfTextExtractor;

/// Recovered text of one document.
#[derive(Debug, Clone, Default)]
pub struct DocumentText {
    /// All pages' text, concatenated.
    pub full_text: String,
    /// Trimmed, non-empty lines in page order.
    pub lines: Vec<String>,
}

impl DocumentText {
    /// Build from full text, deriving the line list.
    pub fn from_full_text(full_text: impl Into<String>) -> Self {
        let full_text = full_text.into();
        let lines = full_text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        Self { full_text, lines }
    }

    /// Build from a line list, deriving the full text.
    pub fn from_lines(lines: Vec<String>) -> Self {
        let full_text = lines.join("\n");
        Self { full_text, lines }
    }
}

/// A text-native document must have a non-empty text layer and at least
/// this many recovered lines; anything less is treated as a scan.
const MIN_TEXT_LINES: usize = 3;

/// Two-tier text acquisition for statement PDFs.
///
/// The OCR provider is built lazily on the first scanned document, so a
/// batch of text-native PDFs never needs OCR credentials. Provider failure
/// is fatal for the document; there is no fallback between providers.
pub struct TextExtractor {
    config: OcrConfig,
    provider: Option<Box<dyn OcrProvider>>,
}

impl TextExtractor {
    pub fn new(config: OcrConfig) -> Self {
        Self {
            config,
            provider: None,
        }
    }

    /// Recover the text of one document.
    pub fn extract(&mut self, pdf_bytes: &[u8]) -> Result<DocumentText> {
        let extractor = PdfTextExtractor::load(pdf_bytes)?;
        let direct = extractor.extract_text().unwrap_or_default();

        if !direct.full_text.trim().is_empty() && direct.lines.len() >= MIN_TEXT_LINES {
            debug!(
                lines = direct.lines.len(),
                chars = direct.full_text.len(),
                "document is text-native"
            );
            return Ok(direct);
        }

        info!(
            lines = direct.lines.len(),
            "text layer insufficient, delegating to OCR"
        );
        let provider = match self.provider.take() {
            Some(p) => p,
            None => create_provider(&self.config)?,
        };
        let result = provider.extract_text(pdf_bytes);
        let name = provider.name();
        self.provider = Some(provider);

        let text = result?;
        debug!(
            provider = name,
            lines = text.lines.len(),
            "OCR returned text"
        );
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_lines_from_full_text() {
        let text = DocumentText::from_full_text("  Tax Escrow: $1.00  \n\n Second \n");
        assert_eq!(text.lines, vec!["Tax Escrow: $1.00", "Second"]);
    }

    #[test]
    fn derives_full_text_from_lines() {
        let text = DocumentText::from_lines(vec!["a".into(), "b".into()]);
        assert_eq!(text.full_text, "a\nb");
    }
}
