use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::handlers::{self, TranslationResponse};
use crate::state::AppState;

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/translate", post(translate))
}

/// Full application: routes, state, body limit, permissive CORS and request tracing
pub fn create_app(state: AppState) -> Router {
    let body_limit = match state.config.server_config.max_body_bytes {
        Some(max) => DefaultBodyLimit::max(max),
        None => DefaultBodyLimit::disable(),
    };

    create_routes()
        .layer(body_limit)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn translate(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<TranslationResponse>, ApiError> {
    let body = body?;
    let span = info_span!("translate", request_id = %Uuid::new_v4());
    let response = handlers::handle_translate(
        state.translator.as_ref(),
        &state.config.translator_config,
        &body,
    )
    .instrument(span)
    .await?;
    Ok(Json(response))
}
