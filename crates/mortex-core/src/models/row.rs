//! Transient and output records produced by the pipeline.

use serde::Serialize;

use super::CanonicalHeader;

/// A label/value candidate recovered from one statement line.
///
/// Exists only while one document is being processed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedField {
    /// Raw label text, as written on the statement.
    pub label: String,
    /// Parsed numeric value (negative for parenthesized amounts).
    pub value: f64,
}

/// One accepted field, materialized as one spreadsheet row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRow {
    /// Global sequence number across the whole batch, starting at 1.
    pub sequence: u32,
    /// Resolved property code the field belongs to.
    pub property_code: String,
    /// Canonical header the field's value lands under.
    pub header: CanonicalHeader,
    /// The field's numeric value.
    pub value: f64,
}
