//! Loaders for the property directory and vendor log tables.
//!
//! Both tables arrive as operator-maintained csv or xlsx files with
//! loosely spelled column names, so columns are matched by normalized
//! aliases rather than exact headers.

use std::path::Path;

use anyhow::{bail, Context};
use calamine::{open_workbook_auto, Reader};

use mortex_core::{MortexError, PropertyDirectory, RawVendorRule, VendorRuleSet};

const CODE_ALIASES: &[&str] = &["property", "propertycode", "code"];
const NAME_ALIASES: &[&str] = &["description", "propertyname", "name"];

const VENDOR_ALIASES: &[&str] = &["vendor", "servicer", "lender"];
const PATTERN_ALIASES: &[&str] = &[
    "pattern", "field", "label", "line", "item", "keyword", "match", "matchtext", "description",
];
const HEADER_ALIASES: &[&str] = &[
    "mappedheader",
    "header",
    "mapto",
    "mapped",
    "column",
    "destination",
    "templateheader",
];
const DETECT_ALIASES: &[&str] = &["detectpattern", "detect", "vendordetect", "identifier", "regex"];

/// A loaded table: one header row plus data rows, cells trimmed.
#[derive(Debug)]
struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Load the property directory from a csv or xlsx file.
pub fn load_property_directory(path: &Path) -> anyhow::Result<PropertyDirectory> {
    let table = load_table(path)?;
    let (Some(code_col), Some(name_col)) = (
        find_column(&table, CODE_ALIASES),
        find_column(&table, NAME_ALIASES),
    ) else {
        return Err(MortexError::InputSchema(format!(
            "property table {} needs a code column ({}) and a name column ({}); found columns: {}",
            path.display(),
            CODE_ALIASES.join("/"),
            NAME_ALIASES.join("/"),
            table.headers.join(", ")
        ))
        .into());
    };

    let directory = PropertyDirectory::new(
        table
            .rows
            .iter()
            .map(|row| (cell(row, code_col), cell(row, name_col))),
    );
    if directory.is_empty() {
        return Err(
            MortexError::InputSchema(format!("property table {} has no usable rows", path.display()))
                .into(),
        );
    }
    Ok(directory)
}

/// Load the vendor rule table from a csv or xlsx file.
pub fn load_vendor_rules(path: &Path) -> anyhow::Result<VendorRuleSet> {
    let table = load_table(path)?;
    let (Some(vendor_col), Some(pattern_col), Some(header_col)) = (
        find_column(&table, VENDOR_ALIASES),
        find_column(&table, PATTERN_ALIASES),
        find_column(&table, HEADER_ALIASES),
    ) else {
        return Err(MortexError::InputSchema(format!(
            "vendor log {} needs vendor ({}), pattern ({}) and mapped header ({}) columns; found columns: {}",
            path.display(),
            VENDOR_ALIASES.join("/"),
            PATTERN_ALIASES.join("/"),
            HEADER_ALIASES.join("/"),
            table.headers.join(", ")
        ))
        .into());
    };
    let detect_col = find_column(&table, DETECT_ALIASES);

    let rows = table
        .rows
        .iter()
        .filter(|row| row.iter().any(|c| !c.is_empty()))
        .map(|row| {
            RawVendorRule::new(
                cell(row, vendor_col),
                cell(row, pattern_col),
                cell(row, header_col),
                detect_col.map(|c| cell(row, c)).unwrap_or_default(),
            )
        });

    VendorRuleSet::from_rows(rows).with_context(|| format!("invalid vendor log {}", path.display()))
}

fn load_table(path: &Path) -> anyhow::Result<Table> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "csv" => load_csv(path),
        "xlsx" | "xlsm" | "xls" => load_xlsx(path),
        _ => bail!(
            "unsupported table format '{}' for {} (expected csv or xlsx)",
            extension,
            path.display()
        ),
    }
}

fn load_csv(path: &Path) -> anyhow::Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("cannot read table {}", path.display()))?;

    let headers = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|c| c.trim().to_string()).collect());
    }

    Ok(Table { headers, rows })
}

fn load_xlsx(path: &Path) -> anyhow::Result<Table> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("cannot read table {}", path.display()))?;
    let range = workbook
        .worksheet_range_at(0)
        .with_context(|| format!("table {} has no sheets", path.display()))??;

    let mut iter = range.rows();
    let headers = iter
        .next()
        .map(|row| row.iter().map(|c| c.to_string().trim().to_string()).collect())
        .unwrap_or_default();
    let rows = iter
        .map(|row| row.iter().map(|c| c.to_string().trim().to_string()).collect())
        .collect();

    Ok(Table { headers, rows })
}

/// Normalize a column name for alias comparison.
fn normalize_column(name: &str) -> String {
    name.trim().to_lowercase().replace([' ', '_', '-'], "")
}

fn find_column(table: &Table, aliases: &[&str]) -> Option<usize> {
    table
        .headers
        .iter()
        .position(|h| aliases.contains(&normalize_column(h).as_str()))
}

fn cell(row: &[String], col: usize) -> String {
    row.get(col).cloned().unwrap_or_default()
}
