//! Generation orchestration: the fast single-shot path, the two-stage
//! draft-and-refine pipeline, and the fail-open validation pass.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::jobs::{JobStore, JobUpdate};
use super::keywords::extract_keywords;
use super::params::{GenerationRequest, StyleParameters};
use super::prompt;
use super::provider::{DraftBackend, TextModel};
use crate::error::AppError;

// =============================================================================
// Validation types
// =============================================================================

/// Per-axis feedback from the validation critique.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationFeedback {
    pub style_match: bool,
    pub tone_match: bool,
    pub length_match: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technical_accuracy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artistic_merit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<String>,
}

impl Default for ValidationFeedback {
    fn default() -> Self {
        Self {
            style_match: true,
            tone_match: true,
            length_match: true,
            technical_accuracy: None,
            artistic_merit: None,
            suggestions: None,
        }
    }
}

/// Result of the validation pass. Produced either by parsing the model's
/// critique or, on any validation failure, by [`ValidationResult::fail_open`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    #[serde(default)]
    pub feedback: ValidationFeedback,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reformatted_poem: Option<String>,
}

impl ValidationResult {
    /// Fixed "all valid" default used when the validation call errors or its
    /// response is unparsable. A transient validation outage must never
    /// block poem delivery.
    pub fn fail_open() -> Self {
        Self {
            is_valid: true,
            feedback: ValidationFeedback {
                suggestions: Some("Validation service unavailable".to_string()),
                ..Default::default()
            },
            reformatted_poem: None,
        }
    }
}

// =============================================================================
// Pipeline output
// =============================================================================

/// Refinement-stage JSON the model must return.
#[derive(Debug, Deserialize)]
struct GeneratedContent {
    title: String,
    poem: String,
}

/// Final product of the refined pipeline.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefinedPoem {
    pub title: String,
    pub content: String,
    pub validation_feedback: ValidationFeedback,
    /// e.g. "gpt2-poetry + gemini-2.0-flash"
    pub model_type: String,
}

// =============================================================================
// Generator
// =============================================================================

/// Orchestrates the external collaborators. Holds trait objects so tests can
/// substitute scripted models for the real HTTP clients.
pub struct Generator {
    model: Arc<dyn TextModel>,
    draft: Arc<dyn DraftBackend>,
    generation_model: String,
    validation_model: String,
}

impl Generator {
    pub fn new(
        model: Arc<dyn TextModel>,
        draft: Arc<dyn DraftBackend>,
        generation_model: String,
        validation_model: String,
    ) -> Self {
        Self {
            model,
            draft,
            generation_model,
            validation_model,
        }
    }

    /// Fast path: one completion call, poem text straight back. No retry;
    /// failure surfaces as a generic generation error.
    pub async fn generate_fast(
        &self,
        params: &StyleParameters,
        theme: Option<&str>,
    ) -> Result<String, AppError> {
        let prompt = prompt::fast_prompt(params, theme);
        let poem = self.model.complete(&self.generation_model, &prompt).await?;
        Ok(poem.trim().to_string())
    }

    /// Standard path: draft → keyword extraction → refinement → validation.
    /// The final selection rule is applied exactly once, here: if validation
    /// reports invalid and supplies a reformatted poem, that text wins.
    pub async fn generate_refined(
        &self,
        params: &StyleParameters,
        theme: &str,
    ) -> Result<RefinedPoem, AppError> {
        // Stage 1: structured first draft from the backend.
        let request = GenerationRequest::from_params(params, theme);
        let draft = self.draft.generate(&request).await?;

        // Stage 2: carry thematic continuity forward via keywords.
        let keywords = extract_keywords(&draft.poem.lines);
        tracing::debug!(keywords = %keywords, "draft keywords extracted");

        // Stage 3: polished rewrite, expected as `{title, poem}` JSON.
        let refine = prompt::refinement_prompt(params, &keywords, theme);
        let reply = self.model.complete(&self.generation_model, &refine).await?;
        let cleaned = prompt::strip_code_fences(&reply);
        let content: GeneratedContent = serde_json::from_str(&cleaned).map_err(|e| {
            AppError::Parse(format!("refinement stage returned malformed JSON: {e}"))
        })?;

        // Stage 4: critique, fail-open.
        let ValidationResult {
            is_valid,
            feedback,
            reformatted_poem,
        } = self.validate(&content.poem, params).await;

        let final_poem = match reformatted_poem {
            Some(reformatted) if !is_valid && !reformatted.trim().is_empty() => reformatted,
            _ => content.poem,
        };

        Ok(RefinedPoem {
            title: content.title,
            content: final_poem,
            validation_feedback: feedback,
            model_type: format!(
                "{} + {}",
                draft.metadata.model_type, self.generation_model
            ),
        })
    }

    /// Ask the model to critique a candidate against the requested
    /// parameters. Any network error, non-success response, or parse failure
    /// yields the fail-open default; this call never returns an error.
    pub async fn validate(&self, poem: &str, params: &StyleParameters) -> ValidationResult {
        let prompt = prompt::validation_prompt(poem, params);
        let reply = match self.model.complete(&self.validation_model, &prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("validation call failed, failing open: {e}");
                return ValidationResult::fail_open();
            }
        };

        let cleaned = prompt::strip_code_fences(&reply);
        match serde_json::from_str::<ValidationResult>(&cleaned) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("validation reply unparsable, failing open: {e}");
                ValidationResult::fail_open()
            }
        }
    }
}

// =============================================================================
// Background job runner
// =============================================================================

/// Spawn the refined pipeline for one job. Fire-and-forget: the caller
/// returns the job id immediately, and this task writes the terminal state
/// back to the store exactly once, whether success, failure, or timeout. The
/// task has its own error boundary and never unwinds into the handler.
pub fn spawn_generation_job(
    generator: Arc<Generator>,
    store: Arc<JobStore>,
    job_id: String,
    params: StyleParameters,
    theme: String,
    timeout: Duration,
) {
    tokio::spawn(async move {
        let outcome =
            tokio::time::timeout(timeout, generator.generate_refined(&params, &theme)).await;

        let update = match outcome {
            Ok(Ok(poem)) => {
                tracing::info!(job_id = %job_id, "generation completed");
                JobUpdate::completed(poem.content)
            }
            Ok(Err(e)) => {
                tracing::error!(job_id = %job_id, "generation failed: {e}");
                JobUpdate::failed(e.client_message())
            }
            Err(_) => {
                tracing::error!(job_id = %job_id, "generation timed out");
                JobUpdate::failed("Generation timed out".to_string())
            }
        };

        store.update(&job_id, update);
    });
}
