//! Error types for the mortex-core library.

use thiserror::Error;

/// Main error type for the mortex library.
#[derive(Error, Debug)]
pub enum MortexError {
    /// Input table is missing required columns.
    #[error("input schema error: {0}")]
    InputSchema(String),

    /// Vendor rule table failed validation.
    #[error("vendor log invalid: {0}")]
    VendorLog(#[from] VendorLogError),

    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// OCR provider error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Property attribution error.
    #[error("{0}")]
    Property(#[from] PropertyError),

    /// Workbook preparation or serialization error.
    #[error("workbook error: {0}")]
    Workbook(#[from] WorkbookError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while validating the vendor rule table.
#[derive(Error, Debug)]
pub enum VendorLogError {
    /// A rule maps to a header outside the canonical set.
    #[error("vendor '{vendor}' maps pattern '{pattern}' to unknown header '{header}'")]
    UnknownHeader {
        vendor: String,
        pattern: String,
        header: String,
    },

    /// A detection pattern is not a valid regular expression.
    #[error("vendor '{vendor}' has invalid detect pattern '{pattern}': {source}")]
    BadDetectPattern {
        vendor: String,
        pattern: String,
        source: regex::Error,
    },

    /// A rule row is missing its vendor or pattern.
    #[error("vendor rule row {row} is missing a {field}")]
    MissingField { row: usize, field: &'static str },
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from the PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors related to OCR providers.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The selected provider has no credentials configured.
    #[error("missing credentials for OCR provider '{0}'")]
    MissingCredentials(&'static str),

    /// The provider request could not be sent or the response read.
    #[error("OCR request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider reported an API-level error.
    #[error("OCR provider '{provider}' error: {message}")]
    Api {
        provider: &'static str,
        message: String,
    },

    /// The provider response was missing an expected element.
    #[error("unexpected OCR response from '{provider}': {detail}")]
    BadResponse {
        provider: &'static str,
        detail: String,
    },
}

/// Errors related to property attribution.
#[derive(Error, Debug)]
pub enum PropertyError {
    /// No property could be confidently attributed to a document.
    /// This is the one "ask the operator" signal the pipeline raises.
    #[error("clarification needed: no property code or name matched document '{document}'")]
    NotResolved { document: String },
}

/// Errors related to the output workbook.
#[derive(Error, Debug)]
pub enum WorkbookError {
    /// The supplied template could not be loaded.
    #[error("failed to load template workbook: {0}")]
    TemplateLoad(String),

    /// The workbook could not be serialized.
    #[error("failed to serialize workbook: {0}")]
    Save(String),
}

/// Result type for the mortex library.
pub type Result<T> = std::result::Result<T, MortexError>;
