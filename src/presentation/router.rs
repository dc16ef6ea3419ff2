use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    credential_status_handler, generate_handler, generation_asset_handler,
    generation_status_handler, health_handler, siliconflow_audio_handler,
    siliconflow_images_handler,
};
use crate::presentation::state::AppState;

/// Uploads and proxied base64 payloads are capped at 50 MB.
const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/credential", get(credential_status_handler))
        .route("/api/v1/generate/{mode}", post(generate_handler))
        .route(
            "/api/v1/generations/{generation_id}",
            get(generation_status_handler),
        )
        .route(
            "/api/v1/generations/{generation_id}/asset",
            get(generation_asset_handler),
        )
        .route("/siliconflow/audio", post(siliconflow_audio_handler))
        .route("/siliconflow/images", post(siliconflow_images_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
