//! Inspect command: show what one statement would contribute.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use console::style;
use serde::Serialize;

use mortex_core::{detect_vendor, parse_line, resolve_property, HeaderMapper, TextExtractor};

use crate::tables::{load_property_directory, load_vendor_rules};

use super::load_ocr_config;

/// Arguments for the inspect command.
#[derive(Args)]
pub struct InspectArgs {
    /// Statement PDF
    input: PathBuf,

    /// Property directory table; enables property resolution
    #[arg(short, long)]
    properties: Option<PathBuf>,

    /// Vendor log table
    #[arg(long)]
    vendor_log: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    Text,
    /// JSON report
    Json,
}

#[derive(Serialize)]
struct Report {
    file: String,
    vendor: Option<String>,
    property: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    unresolved: Option<String>,
    fields: Vec<ReportField>,
}

#[derive(Serialize)]
struct ReportField {
    label: String,
    value: f64,
    header: Option<String>,
}

pub fn run(args: InspectArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let bytes =
        fs::read(&args.input).with_context(|| format!("cannot read {}", args.input.display()))?;
    let rules = args
        .vendor_log
        .as_deref()
        .map(load_vendor_rules)
        .transpose()?;
    let directory = args
        .properties
        .as_deref()
        .map(load_property_directory)
        .transpose()?;

    let mut extractor = TextExtractor::new(load_ocr_config(config_path, None)?);
    let text = extractor.extract(&bytes)?;

    let file = args
        .input
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("statement.pdf")
        .to_string();

    let vendor = rules.as_ref().and_then(|r| detect_vendor(&text.full_text, r));
    let (property, unresolved) = match &directory {
        Some(dir) => match resolve_property(&text.full_text, dir, &file) {
            Ok(code) => (Some(code.to_string()), None),
            Err(e) => (None, Some(e.to_string())),
        },
        None => (None, None),
    };

    let mapper = HeaderMapper::new();
    let fields: Vec<ReportField> = text
        .lines
        .iter()
        .filter_map(|line| parse_line(line))
        .map(|field| {
            let header = mapper.map(&field.label, vendor, rules.as_ref());
            ReportField {
                label: field.label,
                value: field.value,
                header: header.map(|h| h.to_string()),
            }
        })
        .collect();

    let report = Report {
        file,
        vendor: vendor.map(str::to_string),
        property,
        unresolved,
        fields,
    };

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_report(&report),
    }

    Ok(())
}

fn print_report(report: &Report) {
    println!("{} {}", style("File:").bold(), report.file);
    println!(
        "{} {}",
        style("Vendor:").bold(),
        report.vendor.as_deref().unwrap_or("(none detected)")
    );
    match (&report.property, &report.unresolved) {
        (Some(code), _) => println!("{} {}", style("Property:").bold(), code),
        (None, Some(reason)) => {
            println!("{} {}", style("Property:").bold(), style(reason).yellow())
        }
        (None, None) => {}
    }

    println!();
    if report.fields.is_empty() {
        println!("No label/value fields found.");
        return;
    }
    for field in &report.fields {
        match &field.header {
            Some(header) => {
                println!("  {:<40} {:>12.2}  -> {}", field.label, field.value, header)
            }
            None => println!(
                "  {:<40} {:>12.2}  {}",
                field.label,
                field.value,
                style("(dropped)").dim()
            ),
        }
    }
}
