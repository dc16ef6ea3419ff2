use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct CredentialStatusResponse {
    pub selected: bool,
}

/// Reports whether an inference credential is currently selected; the video
/// workflow is blocked without one.
pub async fn credential_status_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(CredentialStatusResponse {
            selected: state.credentials.has_credential(),
        }),
    )
}
