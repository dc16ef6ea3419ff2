//! Stateless relays to the SiliconFlow REST API. The server-held credential
//! is attached as a bearer token; upstream status, content type, and body
//! are passed back verbatim.

use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

use crate::infrastructure::codec;
use crate::presentation::state::AppState;

const DEFAULT_TRANSCRIPTION_MODEL: &str = "FunAudioLLM/SenseVoiceSmall";

const MISSING_KEY_ERROR: &str = "SILICONFLOW_API_KEY not configured";

/// `{ fileName, fileBase64, model? }` → multipart upload to the upstream
/// transcription endpoint.
#[tracing::instrument(skip(state, body))]
pub async fn siliconflow_audio_handler(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Response {
    let file_name = body.get("fileName").and_then(Value::as_str);
    let file_base64 = body.get("fileBase64").and_then(Value::as_str);

    let (file_name, file_base64) = match (file_name, file_base64) {
        (Some(name), Some(data)) => (name, data),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "fileName and fileBase64 are required" })),
            )
                .into_response();
        }
    };

    let model = body
        .get("model")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_TRANSCRIPTION_MODEL);

    let api_key = match &state.proxy.api_key {
        Some(key) => key,
        None => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": MISSING_KEY_ERROR })),
            )
                .into_response();
        }
    };

    let bytes = match codec::decode_base64(file_base64) {
        Ok(b) => b,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": format!("fileBase64 is not valid base64: {}", e) })),
            )
                .into_response();
        }
    };

    tracing::debug!(file_name = %file_name, bytes = bytes.len(), model = %model, "Relaying transcription upload");

    let form = reqwest::multipart::Form::new()
        .text("model", model.to_string())
        .part(
            "file",
            reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string()),
        );

    let upstream = state
        .proxy
        .http
        .post(format!("{}/v1/audio/transcriptions", state.proxy.base_url))
        .bearer_auth(api_key)
        .multipart(form)
        .send()
        .await;

    match upstream {
        Ok(response) => relay(response).await,
        Err(e) => proxy_error(e),
    }
}

/// Opaque JSON body forwarded verbatim to the upstream image-generation
/// endpoint.
#[tracing::instrument(skip(state, body))]
pub async fn siliconflow_images_handler(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Response {
    let api_key = match &state.proxy.api_key {
        Some(key) => key,
        None => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": MISSING_KEY_ERROR })),
            )
                .into_response();
        }
    };

    let upstream = state
        .proxy
        .http
        .post(format!("{}/v1/images/generations", state.proxy.base_url))
        .bearer_auth(api_key)
        .json(&body)
        .send()
        .await;

    match upstream {
        Ok(response) => relay(response).await,
        Err(e) => proxy_error(e),
    }
}

/// Pass the upstream response through untouched: status, content type, body.
async fn relay(response: reqwest::Response) -> Response {
    let status = StatusCode::from_u16(response.status().as_u16())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/json")
        .to_string();

    match response.bytes().await {
        Ok(body) => {
            (status, [(header::CONTENT_TYPE, content_type)], body.to_vec()).into_response()
        }
        Err(e) => proxy_error(e),
    }
}

fn proxy_error(e: reqwest::Error) -> Response {
    tracing::error!(error = %e, "Proxy relay failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "proxy error", "detail": e.to_string() })),
    )
        .into_response()
}
