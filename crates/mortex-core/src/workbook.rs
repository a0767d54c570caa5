//! Assembly of accepted fields into the mortgage import workbook.

use std::io::Cursor;

use tracing::debug;
use umya_spreadsheet::{reader, writer, Spreadsheet};

use crate::error::WorkbookError;
use crate::models::{CanonicalHeader, OutputRow};

/// Name of the sheet the import tool reads; always the first sheet.
pub const SHEET_NAME: &str = "Mortgage Import";

/// Row carrying the `#` index label and the canonical headers.
pub const HEADER_ROW: u32 = 4;

/// First data row, immediately below the header row.
pub const DATA_START_ROW: u32 = 5;

/// Builds the output workbook: one row per accepted field.
///
/// Preparation wipes the data region from the header row down and
/// rewrites the header row, so rows left over from a previous run of the
/// template can never leak into the output.
pub struct WorkbookAssembler {
    book: Spreadsheet,
    next_row: u32,
}

impl WorkbookAssembler {
    /// Load the supplied template (or start a fresh workbook), ensure the
    /// import sheet exists first, and reset its data region.
    pub fn prepare(template: Option<&[u8]>) -> Result<Self, WorkbookError> {
        let mut book = match template {
            Some(bytes) => reader::xlsx::read_reader(Cursor::new(bytes), true)
                .map_err(|e| WorkbookError::TemplateLoad(e.to_string()))?,
            None => umya_spreadsheet::new_file(),
        };

        if book.get_sheet_by_name(SHEET_NAME).is_none() {
            book.new_sheet(SHEET_NAME)
                .map_err(|e| WorkbookError::TemplateLoad(e.to_string()))?;
        }

        // The import tool reads the first sheet.
        let sheets = book.get_sheet_collection_mut();
        if let Some(pos) = sheets.iter().position(|s| s.get_name() == SHEET_NAME) {
            if pos > 0 {
                let sheet = sheets.remove(pos);
                sheets.insert(0, sheet);
            }
        }

        let sheet = book
            .get_sheet_by_name_mut(SHEET_NAME)
            .ok_or_else(|| WorkbookError::TemplateLoad(format!("sheet '{SHEET_NAME}' missing")))?;

        let highest_row = sheet.get_highest_row();
        let highest_col = sheet.get_highest_column().max(1 + CanonicalHeader::ALL.len() as u32);
        let mut cleared = 0u32;
        for row in HEADER_ROW..=highest_row.max(HEADER_ROW) {
            for col in 1..=highest_col {
                sheet.get_cell_mut((col, row)).set_value_string("");
            }
            cleared += 1;
        }
        debug!(rows = cleared, "cleared workbook data region");

        sheet.get_cell_mut((1, HEADER_ROW)).set_value_string("#");
        for (idx, header) in CanonicalHeader::ALL.iter().enumerate() {
            sheet
                .get_cell_mut((idx as u32 + 2, HEADER_ROW))
                .set_value_string(header.as_str());
        }

        Ok(Self {
            book,
            next_row: DATA_START_ROW,
        })
    }

    /// Append one accepted field as one row.
    pub fn append(&mut self, row: &OutputRow) -> Result<(), WorkbookError> {
        let sheet = self
            .book
            .get_sheet_by_name_mut(SHEET_NAME)
            .ok_or_else(|| WorkbookError::Save(format!("sheet '{SHEET_NAME}' missing")))?;

        let r = self.next_row;
        sheet
            .get_cell_mut((1, r))
            .set_value_number(row.sequence as f64);
        sheet
            .get_cell_mut((2, r))
            .set_value_string(row.property_code.as_str());
        let value_col = row.header.position() as u32 + 2;
        sheet.get_cell_mut((value_col, r)).set_value_number(row.value);

        self.next_row += 1;
        Ok(())
    }

    /// Number of data rows appended so far.
    pub fn row_count(&self) -> u32 {
        self.next_row - DATA_START_ROW
    }

    /// Serialize the workbook.
    pub fn finish(self) -> Result<Vec<u8>, WorkbookError> {
        let mut cursor = Cursor::new(Vec::new());
        writer::xlsx::write_writer(&self.book, &mut cursor)
            .map_err(|e| WorkbookError::Save(e.to_string()))?;
        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_back(bytes: &[u8]) -> Spreadsheet {
        reader::xlsx::read_reader(Cursor::new(bytes), true).unwrap()
    }

    #[test]
    fn fresh_workbook_gets_header_row() {
        let assembler = WorkbookAssembler::prepare(None).unwrap();
        let bytes = assembler.finish().unwrap();

        let book = read_back(&bytes);
        let sheet = book.get_sheet_by_name(SHEET_NAME).unwrap();
        assert_eq!(sheet.get_value((1, HEADER_ROW)), "#");
        assert_eq!(sheet.get_value((2, HEADER_ROW)), "Property");
        assert_eq!(sheet.get_value((7, HEADER_ROW)), "Tax Escrow");
        assert_eq!(sheet.get_value((14, HEADER_ROW)), "Other Escrows");
    }

    #[test]
    fn appends_field_in_header_column() {
        let mut assembler = WorkbookAssembler::prepare(None).unwrap();
        assembler
            .append(&OutputRow {
                sequence: 1,
                property_code: "105-Main".to_string(),
                header: CanonicalHeader::TaxEscrow,
                value: 1200.0,
            })
            .unwrap();
        assert_eq!(assembler.row_count(), 1);
        let bytes = assembler.finish().unwrap();

        let book = read_back(&bytes);
        let sheet = book.get_sheet_by_name(SHEET_NAME).unwrap();
        assert_eq!(sheet.get_value((1, DATA_START_ROW)), "1");
        assert_eq!(sheet.get_value((2, DATA_START_ROW)), "105-Main");
        // Tax Escrow sits at column 7 (5 headers precede it).
        assert_eq!(sheet.get_value((7, DATA_START_ROW)), "1200");
    }

    #[test]
    fn stale_template_rows_are_cleared() {
        // First run leaves data in the template.
        let mut assembler = WorkbookAssembler::prepare(None).unwrap();
        assembler
            .append(&OutputRow {
                sequence: 1,
                property_code: "OLD".to_string(),
                header: CanonicalHeader::OtherEscrows,
                value: 9.0,
            })
            .unwrap();
        let template = assembler.finish().unwrap();

        // Second run reuses the template without appending anything.
        let assembler = WorkbookAssembler::prepare(Some(&template)).unwrap();
        let bytes = assembler.finish().unwrap();

        let book = read_back(&bytes);
        let sheet = book.get_sheet_by_name(SHEET_NAME).unwrap();
        assert_eq!(sheet.get_value((2, DATA_START_ROW)), "");
        assert_eq!(sheet.get_value((14, DATA_START_ROW)), "");
        // Header row is rewritten, not lost.
        assert_eq!(sheet.get_value((2, HEADER_ROW)), "Property");
    }

    #[test]
    fn import_sheet_is_moved_first() {
        let assembler = WorkbookAssembler::prepare(None).unwrap();
        let bytes = assembler.finish().unwrap();

        let book = read_back(&bytes);
        let first = book.get_sheet(&0).unwrap();
        assert_eq!(first.get_name(), SHEET_NAME);
    }
}
