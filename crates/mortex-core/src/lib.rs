//! Core library for mortgage statement consolidation.
//!
//! This crate provides:
//! - PDF text-layer recovery with OCR fallback for scanned statements
//! - Vendor (lender/servicer) detection from statement text
//! - Label/value line parsing and mapping to canonical financial headers
//! - Property attribution against a code/name directory
//! - Assembly of accepted fields into a fixed-layout import workbook

pub mod error;
pub mod extract;
pub mod models;
pub mod ocr;
pub mod pdf;
pub mod pipeline;
pub mod text;
pub mod workbook;

pub use error::{MortexError, Result};
pub use extract::{detect_vendor, parse_amount, parse_line, resolve_property, HeaderMapper};
pub use models::{
    CanonicalHeader, OutputRow, ParsedField, PropertyDirectory, RawVendorRule, VendorRule,
    VendorRuleSet,
};
pub use ocr::{create_provider, OcrConfig, OcrProvider, OcrProviderKind};
pub use pdf::PdfTextExtractor;
pub use pipeline::{BatchOutput, BatchPolicy, Pipeline, SkippedDocument};
pub use text::{DocumentText, TextExtractor};
pub use workbook::WorkbookAssembler;
