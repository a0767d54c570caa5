//! Subcommands and shared helpers.

pub mod inspect;
pub mod run;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};

use mortex_core::ocr::{AzureCredentials, GcvCredentials};
use mortex_core::{OcrConfig, OcrProviderKind};

/// Resolve the OCR configuration for a command.
///
/// A `--config` JSON file replaces the environment lookup entirely;
/// otherwise the provider comes from `OCR_PROVIDER` (default `gcv`) and
/// credentials from `GOOGLE_VISION_API_KEY` and `AZURE_DOCINTEL_ENDPOINT`
/// / `AZURE_DOCINTEL_KEY`. A `--ocr-provider` flag overrides the provider
/// in both cases. Missing credentials are not an error here; they only
/// fail once a scanned document actually needs OCR.
pub fn load_ocr_config(
    config_path: Option<&str>,
    provider: Option<OcrProviderKind>,
) -> anyhow::Result<OcrConfig> {
    let mut config = match config_path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("cannot read config file {path}"))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("invalid config file {path}"))?
        }
        None => ocr_config_from_env()?,
    };
    if let Some(kind) = provider {
        config.provider = kind;
    }
    Ok(config)
}

fn ocr_config_from_env() -> anyhow::Result<OcrConfig> {
    let provider = match env::var("OCR_PROVIDER") {
        Ok(value) if !value.trim().is_empty() => value
            .parse::<OcrProviderKind>()
            .map_err(|e| anyhow::anyhow!(e))?,
        _ => OcrProviderKind::default(),
    };

    let gcv = env::var("GOOGLE_VISION_API_KEY")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(|api_key| GcvCredentials { api_key });

    let azure = match (
        env::var("AZURE_DOCINTEL_ENDPOINT").ok().filter(|v| !v.trim().is_empty()),
        env::var("AZURE_DOCINTEL_KEY").ok().filter(|v| !v.trim().is_empty()),
    ) {
        (Some(endpoint), Some(key)) => Some(AzureCredentials { endpoint, key }),
        _ => None,
    };

    Ok(OcrConfig {
        provider,
        gcv,
        azure,
    })
}

/// Collect `(file name, pdf bytes)` pairs from files and directories.
///
/// Directories are expanded non-recursively to their PDF entries, sorted
/// by path so a batch is processed in a stable order.
pub fn collect_pdfs(inputs: &[PathBuf]) -> anyhow::Result<Vec<(String, Vec<u8>)>> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut entries: Vec<PathBuf> = fs::read_dir(input)
                .with_context(|| format!("cannot read directory {}", input.display()))?
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| is_pdf(p))
                .collect();
            entries.sort();
            paths.extend(entries);
        } else if input.exists() {
            paths.push(input.clone());
        } else {
            bail!("input not found: {}", input.display());
        }
    }

    if paths.is_empty() {
        bail!("no PDF files among the inputs");
    }

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("statement.pdf")
            .to_string();
        let bytes =
            fs::read(&path).with_context(|| format!("cannot read {}", path.display()))?;
        documents.push((name, bytes));
    }
    Ok(documents)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_directories_in_sorted_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.pdf"), b"x").unwrap();
        fs::write(dir.path().join("a.PDF"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let documents = collect_pdfs(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<_> = documents.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["a.PDF", "b.pdf"]);
    }

    #[test]
    fn missing_input_is_an_error() {
        let err = collect_pdfs(&[PathBuf::from("no-such.pdf")]).unwrap_err();
        assert!(err.to_string().contains("input not found"));
    }

    #[test]
    fn config_file_wins_and_flag_overrides_provider() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ocr.json");
        fs::write(
            &path,
            r#"{"provider":"azure","azure":{"endpoint":"https://x.example","key":"k"}}"#,
        )
        .unwrap();
        let path = path.to_string_lossy().into_owned();

        let config = load_ocr_config(Some(&path), None).unwrap();
        assert_eq!(config.provider, OcrProviderKind::Azure);
        assert!(config.azure.is_some());

        let config = load_ocr_config(Some(&path), Some(OcrProviderKind::Gcv)).unwrap();
        assert_eq!(config.provider, OcrProviderKind::Gcv);
    }
}
