pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod server;
pub mod store;
pub mod validation;

use std::sync::Arc;

use config::Config;
use engine::generator::Generator;
use engine::jobs::JobStore;
use store::poems::PoemStore;
use store::shares::ShareStore;

/// Shared application state, injected into every handler through axum's
/// `State` extractor. All services are explicitly owned here; there is no
/// ambient module-level mutable state anywhere in the crate.
pub struct AppState {
    pub config: Config,
    pub generator: Arc<Generator>,
    pub jobs: Arc<JobStore>,
    pub poems: PoemStore,
    pub shares: ShareStore,
}

impl AppState {
    /// Wire up production collaborators from configuration.
    pub fn from_config(config: Config) -> Self {
        let model = Arc::new(engine::provider::gemini::GeminiClient::new(
            config.gemini_api_key.clone(),
        ));
        let draft = Arc::new(engine::provider::draft::DraftClient::new(
            config.draft_backend_url.clone(),
        ));
        let generator = Arc::new(Generator::new(
            model,
            draft,
            config.gemini_model.clone(),
            config.gemini_validation_model.clone(),
        ));
        let jobs = Arc::new(JobStore::with_ttl(config.job_ttl));

        Self {
            config,
            generator,
            jobs,
            poems: PoemStore::new(),
            shares: ShareStore::new(),
        }
    }
}
