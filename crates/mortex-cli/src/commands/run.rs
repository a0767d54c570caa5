//! Batch consolidation command.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use mortex_core::{BatchPolicy, OcrProviderKind, Pipeline};

use crate::tables::{load_property_directory, load_vendor_rules};

use super::{collect_pdfs, load_ocr_config};

/// Arguments for the run command.
#[derive(Args)]
pub struct RunArgs {
    /// Statement PDFs, or directories containing them
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Property directory table (csv or xlsx) with code and name columns
    #[arg(short, long)]
    properties: PathBuf,

    /// Vendor log table (csv or xlsx) with per-lender label patterns
    #[arg(long)]
    vendor_log: Option<PathBuf>,

    /// Workbook template whose import sheet layout is reused
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Output workbook path
    #[arg(short, long, default_value = "mortgage_import.xlsx")]
    output: PathBuf,

    /// OCR provider for scanned statements (overrides OCR_PROVIDER)
    #[arg(long)]
    ocr_provider: Option<OcrProviderKind>,

    /// What to do when one document fails
    #[arg(long, value_enum, default_value = "abort")]
    policy: PolicyArg,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum PolicyArg {
    /// Stop the batch at the first failing document
    Abort,
    /// Skip failing documents and report them at the end
    Skip,
}

impl From<PolicyArg> for BatchPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Abort => BatchPolicy::AbortOnError,
            PolicyArg::Skip => BatchPolicy::SkipAndReport,
        }
    }
}

pub fn run(args: RunArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let directory = load_property_directory(&args.properties)?;
    let rules = args
        .vendor_log
        .as_deref()
        .map(load_vendor_rules)
        .transpose()?;
    let template = args
        .template
        .as_ref()
        .map(|p| fs::read(p).with_context(|| format!("cannot read template {}", p.display())))
        .transpose()?;

    let documents = collect_pdfs(&args.inputs)?;
    println!(
        "{} Found {} statement PDFs, {} known properties",
        style("ℹ").blue(),
        documents.len(),
        directory.len()
    );

    let pipeline = Pipeline::with_policy(
        load_ocr_config(config_path, args.ocr_provider)?,
        args.policy.into(),
    );

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message("Extracting statements...");

    let result = pipeline.run(&documents, &directory, rules.as_ref(), template.as_deref());
    pb.finish_and_clear();
    let output = result?;

    fs::write(&args.output, &output.workbook)
        .with_context(|| format!("cannot write {}", args.output.display()))?;

    println!(
        "{} Wrote {} rows from {} documents to {} in {:.1?}",
        style("✓").green(),
        output.rows.len(),
        documents.len() - output.skipped.len(),
        args.output.display(),
        start.elapsed()
    );

    if !output.skipped.is_empty() {
        println!();
        println!("{}", style("Skipped documents:").red());
        for doc in &output.skipped {
            println!("  - {}: {}", doc.file, doc.reason);
        }
    }

    Ok(())
}
