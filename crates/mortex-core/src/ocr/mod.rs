//! OCR providers for scanned statements.
//!
//! Each provider is a thin REST client behind the [`OcrProvider`]
//! capability trait; the pipeline never depends on a specific vendor SDK.
//! Selection and credentials arrive as an explicit [`OcrConfig`] value,
//! never from ambient process state.

mod azure;
mod gcv;

pub use azure::AzureReadOcr;
pub use gcv::GoogleVisionOcr;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::OcrError;
use crate::text::DocumentText;

/// Capability interface for OCR providers.
pub trait OcrProvider: fmt::Debug {
    /// Run OCR over a whole PDF and return its recovered text.
    fn extract_text(&self, pdf_bytes: &[u8]) -> Result<DocumentText, OcrError>;

    /// Short provider identifier for logs and error messages.
    fn name(&self) -> &'static str;
}

/// Which OCR provider to use for scanned documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrProviderKind {
    /// Google Cloud Vision document text detection.
    #[default]
    Gcv,
    /// Azure Document Intelligence prebuilt-read.
    Azure,
}

impl FromStr for OcrProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gcv" => Ok(Self::Gcv),
            "azure" => Ok(Self::Azure),
            other => Err(format!("unknown OCR provider '{other}' (expected gcv or azure)")),
        }
    }
}

impl fmt::Display for OcrProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gcv => f.write_str("gcv"),
            Self::Azure => f.write_str("azure"),
        }
    }
}

/// Google Cloud Vision credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GcvCredentials {
    /// API key passed as the `key` query parameter.
    pub api_key: String,
}

/// Azure Document Intelligence credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzureCredentials {
    /// Resource endpoint, e.g. `https://<name>.cognitiveservices.azure.com`.
    pub endpoint: String,
    /// Subscription key.
    pub key: String,
}

/// OCR configuration injected into the text extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Provider used for scanned documents.
    pub provider: OcrProviderKind,

    /// Google Cloud Vision credentials, required when `provider` is `gcv`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gcv: Option<GcvCredentials>,

    /// Azure credentials, required when `provider` is `azure`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub azure: Option<AzureCredentials>,
}

/// Build the configured provider.
///
/// Missing credentials for the selected provider fail here, so the error
/// only surfaces when a scanned document actually needs OCR.
pub fn create_provider(config: &OcrConfig) -> Result<Box<dyn OcrProvider>, OcrError> {
    match config.provider {
        OcrProviderKind::Gcv => {
            let creds = config
                .gcv
                .as_ref()
                .ok_or(OcrError::MissingCredentials("gcv"))?;
            Ok(Box::new(GoogleVisionOcr::new(creds.api_key.clone())))
        }
        OcrProviderKind::Azure => {
            let creds = config
                .azure
                .as_ref()
                .ok_or(OcrError::MissingCredentials("azure"))?;
            Ok(Box::new(AzureReadOcr::new(
                creds.endpoint.clone(),
                creds.key.clone(),
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_provider_kind() {
        assert_eq!("gcv".parse::<OcrProviderKind>().unwrap(), OcrProviderKind::Gcv);
        assert_eq!(
            " Azure ".parse::<OcrProviderKind>().unwrap(),
            OcrProviderKind::Azure
        );
        assert!("tesseract".parse::<OcrProviderKind>().is_err());
    }

    #[test]
    fn default_provider_is_gcv() {
        assert_eq!(OcrConfig::default().provider, OcrProviderKind::Gcv);
    }

    #[test]
    fn missing_credentials_fail_at_construction() {
        let err = create_provider(&OcrConfig::default()).unwrap_err();
        assert!(matches!(err, OcrError::MissingCredentials("gcv")));

        let config = OcrConfig {
            provider: OcrProviderKind::Azure,
            ..Default::default()
        };
        let err = create_provider(&config).unwrap_err();
        assert!(matches!(err, OcrError::MissingCredentials("azure")));
    }
}
