//! Azure Document Intelligence OCR provider (prebuilt-read).

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::thread;
use std::time::Duration;
use tracing::{debug, trace};

use crate::error::OcrError;
use crate::text::DocumentText;

use super::OcrProvider;

const API_VERSION: &str = "2024-11-30";
const KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// `prebuilt-read` analyze client.
///
/// Analysis is asynchronous on the service side: the initial request
/// returns 202 with an `Operation-Location` URL which is polled until the
/// operation reports `succeeded` or `failed`.
#[derive(Debug)]
pub struct AzureReadOcr {
    endpoint: String,
    key: String,
    client: Client,
    poll_interval: Duration,
    max_polls: u32,
}

impl AzureReadOcr {
    pub fn new(endpoint: String, key: String) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            key,
            client: Client::new(),
            poll_interval: Duration::from_secs(1),
            max_polls: 120,
        }
    }

    fn analyze_url(&self) -> String {
        format!(
            "{}/documentintelligence/documentModels/prebuilt-read:analyze?api-version={}",
            self.endpoint, API_VERSION
        )
    }

    fn begin_analyze(&self, pdf_bytes: &[u8]) -> Result<String, OcrError> {
        let response = self
            .client
            .post(self.analyze_url())
            .header(KEY_HEADER, &self.key)
            .json(&AnalyzeRequest {
                base64_source: BASE64.encode(pdf_bytes),
            })
            .send()?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(OcrError::Api {
                provider: "azure",
                message: format!("HTTP {status}: {body}"),
            });
        }

        response
            .headers()
            .get("operation-location")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or(OcrError::BadResponse {
                provider: "azure",
                detail: "missing Operation-Location header".to_string(),
            })
    }

    fn poll_result(&self, operation_url: &str) -> Result<AnalyzeResult, OcrError> {
        for attempt in 0..self.max_polls {
            if attempt > 0 {
                thread::sleep(self.poll_interval);
            }

            let body: OperationStatus = self
                .client
                .get(operation_url)
                .header(KEY_HEADER, &self.key)
                .send()?
                .json()?;

            trace!(status = %body.status, attempt, "polled analyze operation");

            match body.status.as_str() {
                "succeeded" => {
                    return body.analyze_result.ok_or(OcrError::BadResponse {
                        provider: "azure",
                        detail: "succeeded without analyzeResult".to_string(),
                    });
                }
                "failed" => {
                    let message = body
                        .error
                        .map(|e| e.message)
                        .unwrap_or_else(|| "analysis failed".to_string());
                    return Err(OcrError::Api {
                        provider: "azure",
                        message,
                    });
                }
                _ => continue,
            }
        }

        Err(OcrError::Api {
            provider: "azure",
            message: format!("analysis did not complete after {} polls", self.max_polls),
        })
    }

    fn collect_lines(result: AnalyzeResult) -> DocumentText {
        let lines: Vec<String> = result
            .pages
            .into_iter()
            .flat_map(|page| page.lines)
            .filter_map(|line| {
                let content = line.content.trim().to_string();
                (!content.is_empty()).then_some(content)
            })
            .collect();
        DocumentText::from_lines(lines)
    }
}

impl OcrProvider for AzureReadOcr {
    fn extract_text(&self, pdf_bytes: &[u8]) -> Result<DocumentText, OcrError> {
        debug!(bytes = pdf_bytes.len(), "sending document to Azure prebuilt-read");

        let operation_url = self.begin_analyze(pdf_bytes)?;
        let result = self.poll_result(&operation_url)?;
        Ok(Self::collect_lines(result))
    }

    fn name(&self) -> &'static str {
        "azure"
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeRequest {
    base64_source: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationStatus {
    #[serde(default)]
    status: String,
    analyze_result: Option<AnalyzeResult>,
    error: Option<OperationError>,
}

#[derive(Debug, Deserialize)]
struct OperationError {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct AnalyzeResult {
    #[serde(default)]
    pages: Vec<AnalyzedPage>,
}

#[derive(Debug, Deserialize)]
struct AnalyzedPage {
    #[serde(default)]
    lines: Vec<AnalyzedLine>,
}

#[derive(Debug, Deserialize)]
struct AnalyzedLine {
    #[serde(default)]
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_page_lines_in_order() {
        let status: OperationStatus = serde_json::from_str(
            r#"{
                "status": "succeeded",
                "analyzeResult": {
                    "pages": [
                        {"lines": [{"content": " Statement Date 01/05 "}, {"content": ""}]},
                        {"lines": [{"content": "Tax Escrow 1,200.00"}]}
                    ]
                }
            }"#,
        )
        .unwrap();

        let text = AzureReadOcr::collect_lines(status.analyze_result.unwrap());
        assert_eq!(
            text.lines,
            vec!["Statement Date 01/05", "Tax Escrow 1,200.00"]
        );
        assert_eq!(text.full_text, "Statement Date 01/05\nTax Escrow 1,200.00");
    }

    #[test]
    fn failed_status_carries_service_message() {
        let status: OperationStatus = serde_json::from_str(
            r#"{"status": "failed", "error": {"message": "InvalidContent"}}"#,
        )
        .unwrap();

        assert_eq!(status.status, "failed");
        assert_eq!(status.error.unwrap().message, "InvalidContent");
    }
}
