//! Google Cloud Vision OCR provider.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::OcrError;
use crate::text::DocumentText;

use super::OcrProvider;

const ENDPOINT: &str = "https://vision.googleapis.com/v1/images:annotate";

/// `images:annotate` client running `DOCUMENT_TEXT_DETECTION`.
#[derive(Debug)]
pub struct GoogleVisionOcr {
    api_key: String,
    client: Client,
}

impl GoogleVisionOcr {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: Client::new(),
        }
    }

    fn build_request(pdf_bytes: &[u8]) -> AnnotateRequest {
        AnnotateRequest {
            requests: vec![AnnotateEntry {
                image: ImageContent {
                    content: BASE64.encode(pdf_bytes),
                },
                features: vec![Feature {
                    feature_type: "DOCUMENT_TEXT_DETECTION".to_string(),
                }],
            }],
        }
    }

    fn parse_response(body: AnnotateResponse) -> Result<DocumentText, OcrError> {
        let response = body
            .responses
            .into_iter()
            .next()
            .ok_or(OcrError::BadResponse {
                provider: "gcv",
                detail: "empty responses array".to_string(),
            })?;

        if let Some(error) = response.error {
            return Err(OcrError::Api {
                provider: "gcv",
                message: error.message,
            });
        }

        let text = response
            .full_text_annotation
            .map(|a| a.text)
            .unwrap_or_default();
        Ok(DocumentText::from_full_text(text.trim()))
    }
}

impl OcrProvider for GoogleVisionOcr {
    fn extract_text(&self, pdf_bytes: &[u8]) -> Result<DocumentText, OcrError> {
        debug!(bytes = pdf_bytes.len(), "sending document to Google Vision");

        let response = self
            .client
            .post(ENDPOINT)
            .query(&[("key", self.api_key.as_str())])
            .json(&Self::build_request(pdf_bytes))
            .send()?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(OcrError::Api {
                provider: "gcv",
                message: format!("HTTP {status}: {body}"),
            });
        }

        Self::parse_response(response.json()?)
    }

    fn name(&self) -> &'static str {
        "gcv"
    }
}

#[derive(Debug, Serialize)]
struct AnnotateRequest {
    requests: Vec<AnnotateEntry>,
}

#[derive(Debug, Serialize)]
struct AnnotateEntry {
    image: ImageContent,
    features: Vec<Feature>,
}

#[derive(Debug, Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Debug, Serialize)]
struct Feature {
    #[serde(rename = "type")]
    feature_type: String,
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateResult {
    full_text_annotation: Option<FullTextAnnotation>,
    error: Option<ApiStatus>,
}

#[derive(Debug, Deserialize)]
struct FullTextAnnotation {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct ApiStatus {
    #[serde(default)]
    message: String,
}
