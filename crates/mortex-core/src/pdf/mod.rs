//! PDF text-layer processing.

mod extractor;

pub use extractor::PdfTextExtractor;
