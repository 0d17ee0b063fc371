//! HTTP handlers for the poem API.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use axum::Json;
use futures_util::{Stream, StreamExt};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::engine::generator::spawn_generation_job;
use crate::engine::jobs::job_updates;
use crate::engine::params::StyleParameters;
use crate::error::AppError;
use crate::store::poems::NewPoem;
use crate::validation::{require_non_empty, require_valid_id};
use crate::AppState;

// ============================================================================
// Request parsing
// ============================================================================

/// Required style fields checked up front so a missing parameter is a 400
/// with a uniform body, before any external call is made.
const REQUIRED_FIELDS: [&str; 6] = [
    "style",
    "emotionalTone",
    "creativeStyle",
    "languageVariety",
    "length",
    "wordRepetition",
];

fn parse_generation_body(body: Value) -> Result<(StyleParameters, Option<String>), AppError> {
    for field in REQUIRED_FIELDS {
        if body.get(field).is_none() {
            return Err(AppError::Validation("Missing required parameters".into()));
        }
    }

    let theme = body
        .get("userPrompt")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    let params: StyleParameters = serde_json::from_value(body)
        .map_err(|e| AppError::Validation(format!("Invalid parameters: {e}")))?;

    Ok((params, theme))
}

// ============================================================================
// Generation
// ============================================================================

/// POST /poem/generate-fast: single-shot generation, poem text back
/// synchronously. 500 (generic) on any upstream failure; no retry.
pub async fn generate_fast(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let (params, theme) = parse_generation_body(body)?;
    let poem = state
        .generator
        .generate_fast(&params, theme.as_deref())
        .await?;
    Ok(Json(json!({ "poem": poem })))
}

/// POST /poem/generate: accept the request, spawn the refined pipeline in
/// the background and answer 202 with the job id immediately. The handler
/// never awaits the generation itself.
pub async fn start_generation(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let (params, theme) = parse_generation_body(body)?;

    let job_id = state.jobs.create_job();
    spawn_generation_job(
        Arc::clone(&state.generator),
        Arc::clone(&state.jobs),
        job_id.clone(),
        params,
        theme.unwrap_or_default(),
        state.config.generation_timeout,
    );

    tracing::info!(job_id = %job_id, "generation job accepted");
    Ok((StatusCode::ACCEPTED, Json(json!({ "jobId": job_id }))))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressQuery {
    job_id: String,
}

/// GET /poem/generate?jobId=...: server-sent-event stream of job state.
/// Emits the current state immediately, then every transition, and closes
/// once the job is terminal. Unknown (or already evicted) job ids are 404 so
/// clients can tell "evicted" apart from "still running".
pub async fn generation_progress(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProgressQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let rx = state
        .jobs
        .subscribe(&query.job_id)
        .ok_or_else(|| AppError::NotFound(format!("job {} not found", query.job_id)))?;

    let stream = job_updates(rx).map(|job| {
        // Job serialization is infallible in practice; the fallback keeps the
        // stream alive rather than tearing down the connection.
        let event = Event::default()
            .json_data(&job)
            .unwrap_or_else(|_| Event::default().data("{}"));
        Ok::<_, Infallible>(event)
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

// ============================================================================
// Saved poems
// ============================================================================

/// POST /poem/save: persist a poem in the collection store.
pub async fn save_poem(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewPoem>,
) -> Result<Json<Value>, AppError> {
    require_non_empty("content", &body.content)?;
    let saved = state.poems.save(body);
    tracing::info!(poem_id = %saved.id, "poem saved");
    Ok(Json(json!({
        "message": "Poem saved successfully",
        "id": saved.id,
    })))
}

#[derive(Deserialize)]
pub struct GetPoemQuery {
    id: String,
}

/// GET /poem/get?id=...: fetch a saved poem.
pub async fn get_poem(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GetPoemQuery>,
) -> Result<Json<Value>, AppError> {
    require_valid_id("id", &query.id)?;
    let poem = state
        .poems
        .get(&query.id)
        .ok_or_else(|| AppError::NotFound("Poem not found".into()))?;
    Ok(Json(serde_json::to_value(poem)?))
}

// ============================================================================
// Sharing
// ============================================================================

/// POST /poem/share: snapshot a poem under a fresh share id.
pub async fn share_poem(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewPoem>,
) -> Result<Json<Value>, AppError> {
    require_non_empty("content", &body.content)?;
    let shared = state.shares.share(body);
    let share_url = format!(
        "{}/poem/{}",
        state.config.public_base_url, shared.share_id
    );
    tracing::info!(share_id = %shared.share_id, "poem shared");
    Ok(Json(json!({
        "shareUrl": share_url,
        "shareId": shared.share_id,
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetSharedQuery {
    share_id: String,
}

/// GET /poem/share?shareId=...: fetch a shared poem snapshot.
pub async fn get_shared_poem(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GetSharedQuery>,
) -> Result<Json<Value>, AppError> {
    let shared = state
        .shares
        .get(&query.share_id)
        .ok_or_else(|| AppError::NotFound("Shared poem not found".into()))?;
    Ok(Json(serde_json::to_value(shared)?))
}

// ============================================================================
// Health
// ============================================================================

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok", "service": "poetica" }))
}
