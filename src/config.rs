use std::time::Duration;

/// Runtime configuration, read once at startup from the environment.
///
/// `.env` files are loaded by `main` via dotenvy before this is built, so
/// local development only needs a checked-out `.env`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Listen address for the HTTP server.
    pub addr: String,
    /// API key for the generative-AI API.
    pub gemini_api_key: String,
    /// Model used for fast-path generation and refinement.
    pub gemini_model: String,
    /// Model used for the validation/critique pass.
    pub gemini_validation_model: String,
    /// Base URL of the draft generation backend.
    pub draft_backend_url: String,
    /// Public base URL used when minting share links.
    pub public_base_url: String,
    /// Retention window for finished jobs before eviction.
    pub job_ttl: Duration,
    /// Ceiling on total external-call latency for one generation request.
    pub generation_timeout: Duration,
}

impl Config {
    /// Build from environment variables, falling back to development defaults
    /// for everything except the API key (missing key is an error; the
    /// service cannot generate anything without it).
    pub fn from_env() -> Result<Self, crate::error::AppError> {
        let gemini_api_key = std::env::var("GEMINI_API_KEY").map_err(|_| {
            crate::error::AppError::Internal("GEMINI_API_KEY is not set".to_string())
        })?;

        Ok(Self {
            addr: env_or("POETICA_ADDR", "127.0.0.1:8080"),
            gemini_api_key,
            gemini_model: env_or("GEMINI_MODEL", "gemini-2.0-flash"),
            gemini_validation_model: env_or("GEMINI_VALIDATION_MODEL", "gemini-1.5-flash"),
            draft_backend_url: env_or("DRAFT_BACKEND_URL", "http://127.0.0.1:8000"),
            public_base_url: env_or("POETICA_PUBLIC_URL", "http://localhost:3000"),
            job_ttl: Duration::from_secs(env_or_parse("POETICA_JOB_TTL_SECS", 3600)),
            generation_timeout: Duration::from_secs(env_or_parse(
                "POETICA_GENERATION_TIMEOUT_SECS",
                60,
            )),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or_parse(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
