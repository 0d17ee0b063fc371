pub mod poem;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::AppState;

/// Build the application router. Kept separate from [`run`] so tests can
/// exercise handlers against an in-memory state.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/poem/generate-fast", post(poem::generate_fast))
        .route(
            "/poem/generate",
            post(poem::start_generation).get(poem::generation_progress),
        )
        .route("/poem/save", post(poem::save_poem))
        .route("/poem/get", get(poem::get_poem))
        .route("/poem/share", post(poem::share_poem).get(poem::get_shared_poem))
        .route("/health", get(poem::health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until ctrl-c.
pub async fn run(state: Arc<AppState>) -> Result<(), crate::error::AppError> {
    let addr = state.config.addr.clone();
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Poetica listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}
