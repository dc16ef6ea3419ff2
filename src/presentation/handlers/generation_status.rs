use axum::Json;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{GeneratedAsset, GenerationId, WorkflowState};
use crate::infrastructure::codec;
use crate::presentation::state::AppState;

use super::ErrorResponse;

#[derive(Serialize)]
pub struct GenerationStatusResponse {
    pub id: String,
    pub mode: String,
    pub state: String,
    pub error_message: Option<String>,
    pub asset: Option<AssetSummary>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Serialize)]
pub struct AssetSummary {
    pub kind: String,
    pub content_type: String,
    pub bytes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
}

fn asset_summary(asset: &GeneratedAsset) -> AssetSummary {
    match asset {
        GeneratedAsset::Video(bytes) => AssetSummary {
            kind: "video".to_string(),
            content_type: "video/mp4".to_string(),
            bytes: bytes.len(),
            duration_seconds: None,
        },
        GeneratedAsset::Image(bytes) => AssetSummary {
            kind: "image".to_string(),
            content_type: "image/png".to_string(),
            bytes: bytes.len(),
            duration_seconds: None,
        },
        GeneratedAsset::Audio(clip) => AssetSummary {
            kind: "audio".to_string(),
            content_type: "audio/wav".to_string(),
            bytes: clip.samples.len() * 2,
            duration_seconds: Some(clip.duration_seconds()),
        },
    }
}

#[tracing::instrument(skip(state))]
pub async fn generation_status_handler(
    State(state): State<AppState>,
    Path(generation_id): Path<String>,
) -> impl IntoResponse {
    let uuid = match Uuid::parse_str(&generation_id) {
        Ok(u) => u,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Invalid generation ID: {}", generation_id),
                }),
            )
                .into_response();
        }
    };

    match state.store.get(GenerationId::from_uuid(uuid)).await {
        Ok(Some(generation)) => {
            let response = GenerationStatusResponse {
                id: generation.id.as_uuid().to_string(),
                mode: generation.mode.as_str().to_string(),
                state: generation.state.as_str().to_string(),
                error_message: generation.error_message,
                asset: generation.asset.as_ref().map(asset_summary),
                created_at: generation.created_at.to_rfc3339(),
                updated_at: generation.updated_at.to_rfc3339(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Generation not found: {}", generation_id),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch generation");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to fetch generation: {}", e),
                }),
            )
                .into_response()
        }
    }
}

/// Serves the finished asset bytes with their content type. 409 while the
/// workflow is still in flight.
#[tracing::instrument(skip(state))]
pub async fn generation_asset_handler(
    State(state): State<AppState>,
    Path(generation_id): Path<String>,
) -> impl IntoResponse {
    let uuid = match Uuid::parse_str(&generation_id) {
        Ok(u) => u,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Invalid generation ID: {}", generation_id),
                }),
            )
                .into_response();
        }
    };

    let generation = match state.store.get(GenerationId::from_uuid(uuid)).await {
        Ok(Some(g)) => g,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Generation not found: {}", generation_id),
                }),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch generation");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to fetch generation: {}", e),
                }),
            )
                .into_response();
        }
    };

    match (generation.state, generation.asset) {
        (WorkflowState::Ready, Some(GeneratedAsset::Video(bytes))) => {
            ([(header::CONTENT_TYPE, "video/mp4")], bytes).into_response()
        }
        (WorkflowState::Ready, Some(GeneratedAsset::Image(bytes))) => {
            ([(header::CONTENT_TYPE, "image/png")], bytes).into_response()
        }
        (WorkflowState::Ready, Some(GeneratedAsset::Audio(clip))) => (
            [(header::CONTENT_TYPE, "audio/wav")],
            codec::clip_to_wav(&clip),
        )
            .into_response(),
        _ => (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "Generation is not ready".to_string(),
            }),
        )
            .into_response(),
    }
}
