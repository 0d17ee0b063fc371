use async_trait::async_trait;

use super::{DraftBackend, DraftResponse};
use crate::engine::params::GenerationRequest;
use crate::error::AppError;

fn upstream_err(e: impl std::fmt::Display) -> AppError {
    AppError::Upstream(e.to_string())
}

/// HTTP client for the first-stage draft generation backend. The backend
/// accepts engine-level sampling parameters and returns a structured poem
/// (title + lines) plus model metadata.
pub struct DraftClient {
    http: reqwest::Client,
    base_url: String,
}

impl DraftClient {
    /// Create a new `DraftClient` for the given backend base URL.
    pub fn new(base_url: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("failed to build reqwest client");

        Self { http, base_url }
    }
}

#[async_trait]
impl DraftBackend for DraftClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<DraftResponse, AppError> {
        let url = format!("{}/generate", self.base_url);

        let resp = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(upstream_err)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "draft backend error ({status}): {body}"
            )));
        }

        let draft: DraftResponse = resp.json().await.map_err(upstream_err)?;
        tracing::debug!(
            lines = draft.poem.lines.len(),
            model_type = %draft.metadata.model_type,
            "draft received"
        );
        Ok(draft)
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::provider::DraftResponse;

    #[test]
    fn test_draft_response_wire_shape() {
        let raw = r#"{
            "poem": {
                "title": "Dawn",
                "lines": ["first light", "over the hills"],
                "style": "haiku"
            },
            "metadata": {
                "device": "cuda",
                "model_type": "gpt2-poetry",
                "timestamp": "2026-08-26T08:00:00Z"
            }
        }"#;
        let parsed: DraftResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.poem.title, "Dawn");
        assert_eq!(parsed.poem.lines.len(), 2);
        assert_eq!(parsed.metadata.model_type, "gpt2-poetry");
    }
}
