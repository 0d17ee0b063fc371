pub mod draft;
pub mod gemini;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::engine::params::GenerationRequest;
use crate::error::AppError;

// =============================================================================
// Draft backend wire types
// =============================================================================

/// Structured first-draft poem returned by the draft generation backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftPoem {
    pub title: String,
    pub lines: Vec<String>,
    pub style: String,
}

/// Metadata the draft backend attaches to every generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftMetadata {
    pub device: String,
    pub model_type: String,
    pub timestamp: String,
}

/// Full draft backend response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftResponse {
    pub poem: DraftPoem,
    pub metadata: DraftMetadata,
}

// =============================================================================
// Provider traits
// =============================================================================

/// Abstraction over the generative-AI completion API. The orchestrator only
/// needs prompt-in/text-out; tests substitute a scripted implementation.
#[async_trait]
pub trait TextModel: Send + Sync {
    /// Run a completion against the given model and return its raw text.
    async fn complete(&self, model: &str, prompt: &str) -> Result<String, AppError>;
}

/// Abstraction over the first-stage draft generation backend.
#[async_trait]
pub trait DraftBackend: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<DraftResponse, AppError>;
}
