use std::str::FromStr;

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::application::services::GenerationMessage;
use crate::domain::{Generation, GenerationRequest, Mode};
use crate::infrastructure::codec;
use crate::presentation::state::AppState;

use super::ErrorResponse;

#[derive(Serialize)]
pub struct GenerateResponse {
    pub generation_id: String,
    pub mode: String,
    pub message: String,
}

/// Multipart intake for one submission: a `prompt` text field and an
/// `image` file field. Accepting a submission claims the next sequence for
/// its mode, superseding any in-flight one.
#[tracing::instrument(skip(state, multipart))]
pub async fn generate_handler(
    State(state): State<AppState>,
    Path(mode): Path<String>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mode = match Mode::from_str(&mode) {
        Ok(m) => m,
        Err(e) => {
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: e })).into_response();
        }
    };

    let mut prompt: Option<String> = None;
    let mut image: Option<(Vec<u8>, String)> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read multipart");
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("Failed to read multipart: {}", e),
                    }),
                )
                    .into_response();
            }
        };

        match field.name() {
            Some("prompt") => match field.text().await {
                Ok(text) => prompt = Some(text),
                Err(e) => {
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(ErrorResponse {
                            error: format!("Failed to read prompt: {}", e),
                        }),
                    )
                        .into_response();
                }
            },
            Some("image") => {
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                match field.bytes().await {
                    Ok(data) => image = Some((data.to_vec(), mime_type)),
                    Err(e) => {
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(ErrorResponse {
                                error: format!("Failed to read image: {}", e),
                            }),
                        )
                            .into_response();
                    }
                }
            }
            _ => continue,
        }
    }

    let (prompt, (image_bytes, mime_type)) = match (prompt, image) {
        (Some(p), Some(i)) if !p.trim().is_empty() => (p, i),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "prompt and image are required".to_string(),
                }),
            )
                .into_response();
        }
    };

    if let Err(e) = codec::ensure_image_mime(&mime_type) {
        tracing::warn!(mime_type = %mime_type, "Rejected non-image upload");
        return (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response();
    }

    tracing::debug!(bytes = image_bytes.len(), mime_type = %mime_type, "Image received");

    let sequence = state.sequences.next(mode);
    let generation = Generation::new(mode, sequence);
    let generation_id = generation.id;

    if let Err(e) = state.store.create(&generation).await {
        tracing::error!(error = %e, "Failed to create generation record");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Failed to create generation: {}", e),
            }),
        )
            .into_response();
    }

    let msg = GenerationMessage {
        generation_id,
        mode,
        sequence,
        request: GenerationRequest::new(prompt, image_bytes, mime_type),
    };

    if let Err(e) = state.generation_sender.send(msg).await {
        tracing::error!(error = %e, "Failed to enqueue generation");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "Generation queue full or worker unavailable".to_string(),
            }),
        )
            .into_response();
    }

    tracing::info!(
        generation_id = %generation_id.as_uuid(),
        mode = %mode,
        sequence = sequence,
        "Generation submitted"
    );

    (
        StatusCode::ACCEPTED,
        Json(GenerateResponse {
            generation_id: generation_id.as_uuid().to_string(),
            mode: mode.as_str().to_string(),
            message: "Generation started".to_string(),
        }),
    )
        .into_response()
}
