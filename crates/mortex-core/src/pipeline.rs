//! Batch orchestration: PDFs in, one import workbook out.

use serde::Serialize;
use tracing::{info, trace, warn};

use crate::error::{MortexError, Result};
use crate::extract::{detect_vendor, parse_line, resolve_property, HeaderMapper};
use crate::models::{OutputRow, PropertyDirectory, VendorRuleSet};
use crate::ocr::OcrConfig;
use crate::text::{DocumentText, TextExtractor};
use crate::workbook::WorkbookAssembler;

/// What to do when one document in a batch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchPolicy {
    /// Stop the whole batch at the first failing document.
    #[default]
    AbortOnError,
    /// Drop the failing document, record why, and keep going.
    SkipAndReport,
}

/// A document dropped under [`BatchPolicy::SkipAndReport`].
#[derive(Debug, Clone, Serialize)]
pub struct SkippedDocument {
    pub file: String,
    pub reason: String,
}

/// Result of a batch run.
pub struct BatchOutput {
    /// Serialized xlsx workbook.
    pub workbook: Vec<u8>,
    /// Accepted rows in workbook order.
    pub rows: Vec<OutputRow>,
    /// Documents dropped under [`BatchPolicy::SkipAndReport`].
    pub skipped: Vec<SkippedDocument>,
}

/// End-to-end statement consolidation.
///
/// Documents are processed strictly in the order given and the row
/// sequence counter is global across the batch, so the same inputs always
/// produce the same workbook.
pub struct Pipeline {
    ocr: OcrConfig,
    policy: BatchPolicy,
}

impl Pipeline {
    pub fn new(ocr: OcrConfig) -> Self {
        Self {
            ocr,
            policy: BatchPolicy::default(),
        }
    }

    pub fn with_policy(ocr: OcrConfig, policy: BatchPolicy) -> Self {
        Self { ocr, policy }
    }

    /// Run the batch: `(file name, pdf bytes)` pairs to a finished workbook.
    pub fn run(
        &self,
        documents: &[(String, Vec<u8>)],
        directory: &PropertyDirectory,
        rules: Option<&VendorRuleSet>,
        template: Option<&[u8]>,
    ) -> Result<BatchOutput> {
        let mut extractor = TextExtractor::new(self.ocr.clone());
        let mut assembler = WorkbookAssembler::prepare(template)?;
        let mut rows = Vec::new();
        let mut skipped = Vec::new();
        let mut sequence = 0u32;

        for (file, bytes) in documents {
            let outcome = extractor.extract(bytes).and_then(|text| {
                self.process_document(&text, file, directory, rules, &mut sequence)
            });
            match outcome {
                Ok(doc_rows) => {
                    for row in &doc_rows {
                        assembler.append(row)?;
                    }
                    rows.extend(doc_rows);
                }
                Err(err) => match self.policy {
                    BatchPolicy::AbortOnError => return Err(err),
                    BatchPolicy::SkipAndReport => {
                        warn!(file, error = %err, "skipping document");
                        skipped.push(SkippedDocument {
                            file: file.clone(),
                            reason: err.to_string(),
                        });
                    }
                },
            }
        }

        info!(
            documents = documents.len(),
            rows = rows.len(),
            skipped = skipped.len(),
            "batch complete"
        );
        Ok(BatchOutput {
            workbook: assembler.finish()?,
            rows,
            skipped,
        })
    }

    /// Process one already-extracted document.
    ///
    /// Property resolution happens before any field is accepted, so a
    /// failing document never advances the shared sequence counter.
    pub fn process_document(
        &self,
        text: &DocumentText,
        document: &str,
        directory: &PropertyDirectory,
        rules: Option<&VendorRuleSet>,
        sequence: &mut u32,
    ) -> Result<Vec<OutputRow>> {
        let vendor = rules.and_then(|r| detect_vendor(&text.full_text, r));
        let property = resolve_property(&text.full_text, directory, document)
            .map_err(MortexError::from)?;

        let mapper = HeaderMapper::new();
        let mut rows = Vec::new();
        for line in &text.lines {
            let Some(field) = parse_line(line) else {
                continue;
            };
            match mapper.map(&field.label, vendor, rules) {
                Some(header) => {
                    *sequence += 1;
                    rows.push(OutputRow {
                        sequence: *sequence,
                        property_code: property.to_string(),
                        header,
                        value: field.value,
                    });
                }
                None => trace!(label = %field.label, "label not mapped, dropping field"),
            }
        }

        info!(
            document,
            vendor = vendor.unwrap_or("-"),
            property,
            rows = rows.len(),
            "document processed"
        );
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CanonicalHeader;

    fn directory() -> PropertyDirectory {
        PropertyDirectory::new(vec![("105-Main", "Main Street Apartments")])
    }

    #[test]
    fn sequence_is_global_across_documents() {
        let pipeline = Pipeline::new(OcrConfig::default());
        let mut sequence = 0;

        let first = DocumentText::from_full_text("105-Main\nTax Escrow: $100.00");
        let second = DocumentText::from_full_text("105-Main\nEscrow-Insurance: $50.00");
        let rows_a = pipeline
            .process_document(&first, "a.pdf", &directory(), None, &mut sequence)
            .unwrap();
        let rows_b = pipeline
            .process_document(&second, "b.pdf", &directory(), None, &mut sequence)
            .unwrap();

        assert_eq!(rows_a[0].sequence, 1);
        assert_eq!(rows_b[0].sequence, 2);
        assert_eq!(rows_b[0].header, CanonicalHeader::EscrowInsurance);
    }

    #[test]
    fn unresolved_property_does_not_consume_sequence() {
        let pipeline = Pipeline::new(OcrConfig::default());
        let mut sequence = 0;

        let text = DocumentText::from_full_text("Unknown place\nTax Escrow: $100.00");
        let err = pipeline
            .process_document(&text, "x.pdf", &directory(), None, &mut sequence)
            .unwrap_err();
        assert!(matches!(err, MortexError::Property(_)));
        assert_eq!(sequence, 0);
    }

    #[test]
    fn unmapped_labels_are_dropped() {
        let pipeline = Pipeline::new(OcrConfig::default());
        let mut sequence = 0;

        let text =
            DocumentText::from_full_text("105-Main\nLate Fee: $25.00\nTax Escrow: $100.00");
        let rows = pipeline
            .process_document(&text, "a.pdf", &directory(), None, &mut sequence)
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].header, CanonicalHeader::TaxEscrow);
        assert_eq!(rows[0].value, 100.0);
    }
}
