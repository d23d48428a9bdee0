use async_trait::async_trait;
use base64::prelude::*;
use serde::Deserialize;

use crate::core::config::ClassifierConfig;
use crate::features::reports::models::{ReportCategory, ReportSeverity};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

const CLASSIFY_PROMPT: &str = "You are triaging a citizen photo of illegally dumped waste. \
    Reply with a single JSON object, no prose: \
    {\"category\": one of [\"Household Waste\", \"Construction Debris\", \
    \"Hazardous/Chemical\", \"E-Waste\", \"Organic/Green Waste\", \"Other\"], \
    \"severity\": one of [\"Small\", \"Medium\", \"Large\"]}";

/// Category/severity label pair produced by classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub category: ReportCategory,
    pub severity: ReportSeverity,
}

impl Classification {
    /// Label used when no credential is available or the external call fails
    pub fn fallback() -> Self {
        Self {
            category: ReportCategory::Other,
            severity: ReportSeverity::Medium,
        }
    }
}

/// Classification seam. Implementations must be infallible: any upstream
/// problem collapses to the fallback label instead of an error.
#[async_trait]
pub trait ImageClassifier: Send + Sync {
    async fn classify(&self, image: &[u8], mime_type: &str, api_key: Option<&str>)
        -> Classification;
}

#[derive(Debug, thiserror::Error)]
enum ClassifyError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("non-success response: HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("unparseable response: {0}")]
    Parse(String),
}

/// Gemini-backed classifier
pub struct GeminiClassifier {
    client: reqwest::Client,
    config: ClassifierConfig,
    base_url: String,
}

impl GeminiClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    #[cfg(test)]
    fn with_base_url(config: ClassifierConfig, base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            base_url: base_url.to_string(),
        }
    }

    /// One classification request against the Gemini generateContent endpoint
    async fn request_label(
        &self,
        image: &[u8],
        mime_type: &str,
        api_key: &str,
    ) -> Result<RawLabel, ClassifyError> {
        let url = format!("{}/{}:generateContent", self.base_url, self.config.model);

        let body = serde_json::json!({
            "contents": [{
                "parts": [
                    {"inline_data": {"mime_type": mime_type, "data": BASE64_STANDARD.encode(image)}},
                    {"text": CLASSIFY_PROMPT}
                ]
            }]
        });

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ClassifyError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ClassifyError::Status(response.status()));
        }

        let reply: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ClassifyError::Parse(e.to_string()))?;

        let text = reply
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| ClassifyError::Parse("empty candidate list".to_string()))?;

        let json = extract_json_object(&text)
            .ok_or_else(|| ClassifyError::Parse("no JSON object in reply".to_string()))?;

        serde_json::from_str(&json).map_err(|e| ClassifyError::Parse(e.to_string()))
    }
}

#[async_trait]
impl ImageClassifier for GeminiClassifier {
    async fn classify(
        &self,
        image: &[u8],
        mime_type: &str,
        api_key: Option<&str>,
    ) -> Classification {
        // Per-request key beats the configured default; with neither, skip
        // the network entirely.
        let key = match api_key.or(self.config.api_key.as_deref()) {
            Some(key) => key,
            None => {
                tracing::debug!("No classification credential, using fallback label");
                return Classification::fallback();
            }
        };

        match self.request_label(image, mime_type, key).await {
            Ok(raw) => {
                let fallback = Classification::fallback();
                // Substitute the fallback per field for anything missing or
                // outside the accepted enums.
                Classification {
                    category: raw
                        .category
                        .as_deref()
                        .and_then(ReportCategory::from_label)
                        .unwrap_or(fallback.category),
                    severity: raw
                        .severity
                        .as_deref()
                        .and_then(ReportSeverity::from_label)
                        .unwrap_or(fallback.severity),
                }
            }
            Err(e) => {
                tracing::warn!("Classification failed, using fallback label: {}", e);
                Classification::fallback()
            }
        }
    }
}

/// Two-field result as the model returns it, before enum validation
#[derive(Debug, Deserialize)]
struct RawLabel {
    category: Option<String>,
    severity: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Extract a JSON object from model output that may wrap it in a markdown
/// code fence or surrounding prose.
fn extract_json_object(text: &str) -> Option<String> {
    // Markdown code block with json tag
    if let Some(block) = text.split("```json").nth(1) {
        return block.split("```").next().map(|s| s.trim().to_string());
    }

    // Generic code block, skipping an optional language identifier line
    if let Some(start) = text.find("```") {
        let block_start = start + 3;
        let json_start = match text[block_start..].find('\n') {
            Some(offset) => block_start + offset + 1,
            None => block_start,
        };
        if let Some(end) = text[json_start..].find("```") {
            return Some(text[json_start..json_start + end].trim().to_string());
        }
    }

    // Embedded JSON: first { to last }
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end > start {
        Some(text[start..=end].to_string())
    } else {
        None
    }
}
