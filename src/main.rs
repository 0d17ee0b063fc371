use std::sync::Arc;

use poetica::config::Config;
use poetica::{logging, server, AppState};

#[tokio::main]
async fn main() {
    // Load .env before reading configuration; missing file is fine.
    let _ = dotenvy::dotenv();
    logging::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    let state = Arc::new(AppState::from_config(config));
    if let Err(e) = server::run(state).await {
        tracing::error!("server error: {e}");
        std::process::exit(1);
    }
}
