use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::TextModel;
use crate::error::AppError;

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

// ============================================================================
// Helper
// ============================================================================

/// Convert any displayable error into `AppError::Upstream`.
fn upstream_err(e: impl std::fmt::Display) -> AppError {
    AppError::Upstream(e.to_string())
}

// ============================================================================
// Request / response types
// ============================================================================

#[derive(Serialize)]
struct GenerateContentBody<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "safetySettings")]
    safety_settings: Vec<SafetySetting>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

/// Creative writing trips default filters constantly (a melancholic poem is
/// not self-harm content), so every harm category is explicitly allow-listed
/// at BLOCK_NONE.
fn safety_settings() -> Vec<SafetySetting> {
    const CATEGORIES: [&str; 4] = [
        "HARM_CATEGORY_HARASSMENT",
        "HARM_CATEGORY_HATE_SPEECH",
        "HARM_CATEGORY_SEXUALLY_EXPLICIT",
        "HARM_CATEGORY_DANGEROUS_CONTENT",
    ];
    CATEGORIES
        .iter()
        .map(|category| SafetySetting {
            category,
            threshold: "BLOCK_NONE",
        })
        .collect()
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

// ============================================================================
// GeminiClient
// ============================================================================

/// HTTP client for the generative-AI completion API (Gemini REST surface).
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GeminiClient {
    /// Create a new `GeminiClient` against the public API endpoint.
    ///
    /// The underlying `reqwest::Client` is configured with a 30-second timeout.
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(DEFAULT_API_BASE.to_string(), api_key)
    }

    /// Create a client against a custom endpoint (used in tests).
    pub fn with_base_url(base_url: String, api_key: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("failed to build reqwest client");

        Self {
            http,
            base_url,
            api_key,
        }
    }
}

#[async_trait]
impl TextModel for GeminiClient {
    async fn complete(&self, model: &str, prompt: &str) -> Result<String, AppError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );

        let body = GenerateContentBody {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            safety_settings: safety_settings(),
        };

        let resp = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(upstream_err)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "generative API error ({status}): {body}"
            )));
        }

        let parsed: GenerateContentResponse = resp.json().await.map_err(upstream_err)?;
        let text: String = parsed
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AppError::Upstream(
                "generative API returned no candidates".to_string(),
            ));
        }

        tracing::debug!(model = %model, chars = text.len(), "completion received");
        Ok(text)
    }
}
