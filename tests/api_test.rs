use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;

use atelier::application::ports::{CredentialProvider, GenerationStore, InferenceClient};
use atelier::application::services::{GenerationWorker, ModeSequences};
use atelier::domain::{Generation, Mode, WorkflowState};
use atelier::infrastructure::codec::encode_base64;
use atelier::infrastructure::credentials::StaticCredentialProvider;
use atelier::infrastructure::inference::MockInferenceClient;
use atelier::infrastructure::persistence::InMemoryGenerationStore;
use atelier::presentation::config::Settings;
use atelier::presentation::create_router;
use atelier::presentation::state::{AppState, ProxyState};

const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

struct TestApp {
    app: Router,
    client: Arc<MockInferenceClient>,
    store: Arc<InMemoryGenerationStore>,
    sequences: Arc<ModeSequences>,
}

fn spawn_app(credential: Option<&str>) -> TestApp {
    let client = Arc::new(MockInferenceClient::new());
    let store = Arc::new(InMemoryGenerationStore::new());
    let sequences = Arc::new(ModeSequences::new());
    let credentials = Arc::new(StaticCredentialProvider::new(
        credential.map(String::from),
    )) as Arc<dyn CredentialProvider>;
    let (generation_sender, receiver) = mpsc::channel(8);

    let worker = GenerationWorker::new(
        receiver,
        Arc::clone(&client) as Arc<dyn InferenceClient>,
        Arc::clone(&store) as Arc<dyn GenerationStore>,
        Arc::clone(&sequences),
        Duration::from_millis(1),
        24_000,
        1,
    );
    tokio::spawn(worker.run());

    let app = create_router(AppState {
        store: Arc::clone(&store) as Arc<dyn GenerationStore>,
        credentials,
        sequences: Arc::clone(&sequences),
        generation_sender,
        proxy: ProxyState::new("http://127.0.0.1:1", None),
        settings: Settings::default(),
    });

    TestApp {
        app,
        client,
        store,
        sequences,
    }
}

fn multipart_request(uri: &str, prompt: Option<&str>, image: Option<(&[u8], &str)>) -> Request<Body> {
    let mut body = Vec::new();
    if let Some(prompt) = prompt {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"prompt\"\r\n\r\n");
        body.extend_from_slice(prompt.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    if let Some((bytes, mime)) = image {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            b"Content-Disposition: form-data; name=\"image\"; filename=\"source.png\"\r\n",
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", mime).as_bytes());
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn wait_for_status(test: &TestApp, id: &str, target: &str) -> Value {
    for _ in 0..500 {
        let response = test
            .app
            .clone()
            .oneshot(get(&format!("/api/v1/generations/{}", id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        if body["state"] == target {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    panic!("generation {} never reached {}", id, target);
}

#[tokio::test]
async fn given_running_service_when_checking_health_then_healthy() {
    let test = spawn_app(Some("test-key"));

    let response = test.app.clone().oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn given_configured_credential_when_checking_status_then_selected() {
    let test = spawn_app(Some("test-key"));

    let response = test
        .app
        .clone()
        .oneshot(get("/api/v1/credential"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["selected"], true);
}

#[tokio::test]
async fn given_no_credential_when_checking_status_then_not_selected() {
    let test = spawn_app(None);

    let response = test
        .app
        .clone()
        .oneshot(get("/api/v1/credential"))
        .await
        .unwrap();

    let body = json_body(response).await;
    assert_eq!(body["selected"], false);
}

#[tokio::test]
async fn given_audio_submission_when_workflow_completes_then_wav_asset_served() {
    let test = spawn_app(Some("test-key"));
    let pcm = [0x00u8, 0x00, 0xFF, 0x7F, 0x00, 0x80, 0x01, 0x00];
    test.client.push_script(Ok("A short script.".to_string()));
    test.client.push_narration(Ok(encode_base64(&pcm)));

    let response = test
        .app
        .clone()
        .oneshot(multipart_request(
            "/api/v1/generate/audio",
            Some("introduce this product"),
            Some((b"png bytes", "image/png")),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body = json_body(response).await;
    assert_eq!(body["mode"], "audio");
    let id = body["generation_id"].as_str().unwrap().to_string();

    let status = wait_for_status(&test, &id, "READY").await;
    assert_eq!(status["asset"]["kind"], "audio");
    assert_eq!(status["asset"]["content_type"], "audio/wav");
    assert_eq!(status["asset"]["bytes"], 8);

    let response = test
        .app
        .clone()
        .oneshot(get(&format!("/api/v1/generations/{}/asset", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("audio/wav")
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[0..4], b"RIFF");
    assert_eq!(&bytes[8..12], b"WAVE");
    assert_eq!(bytes.len(), 44 + 8);
}

#[tokio::test]
async fn given_image_submission_when_workflow_completes_then_png_asset_served() {
    let test = spawn_app(Some("test-key"));
    test.client.push_image(Ok(encode_base64(b"edited png")));

    let response = test
        .app
        .clone()
        .oneshot(multipart_request(
            "/api/v1/generate/image",
            Some("make it watercolor"),
            Some((b"png bytes", "image/png")),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body = json_body(response).await;
    let id = body["generation_id"].as_str().unwrap().to_string();

    wait_for_status(&test, &id, "READY").await;

    let response = test
        .app
        .clone()
        .oneshot(get(&format!("/api/v1/generations/{}/asset", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("image/png")
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(bytes.as_ref(), b"edited png");
}

#[tokio::test]
async fn given_unknown_mode_when_submitting_then_bad_request() {
    let test = spawn_app(Some("test-key"));

    let response = test
        .app
        .clone()
        .oneshot(multipart_request(
            "/api/v1/generate/hologram",
            Some("a prompt"),
            Some((b"png bytes", "image/png")),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn given_non_image_upload_when_submitting_then_unsupported_media_type() {
    let test = spawn_app(Some("test-key"));

    let response = test
        .app
        .clone()
        .oneshot(multipart_request(
            "/api/v1/generate/image",
            Some("a prompt"),
            Some((b"%PDF-1.4", "application/pdf")),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    // A rejected upload never claims a sequence, so nothing gets superseded.
    assert_eq!(test.sequences.current(Mode::Image), 0);
}

#[tokio::test]
async fn given_missing_prompt_when_submitting_then_bad_request() {
    let test = spawn_app(Some("test-key"));

    let response = test
        .app
        .clone()
        .oneshot(multipart_request(
            "/api/v1/generate/video",
            None,
            Some((b"png bytes", "image/png")),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "prompt and image are required");
}

#[tokio::test]
async fn given_unknown_id_when_fetching_status_then_not_found() {
    let test = spawn_app(Some("test-key"));

    let response = test
        .app
        .clone()
        .oneshot(get(&format!(
            "/api/v1/generations/{}",
            uuid::Uuid::new_v4()
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn given_malformed_id_when_fetching_status_then_bad_request() {
    let test = spawn_app(Some("test-key"));

    let response = test
        .app
        .clone()
        .oneshot(get("/api/v1/generations/not-a-uuid"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn given_inflight_generation_when_fetching_asset_then_conflict() {
    let test = spawn_app(Some("test-key"));

    let mut generation = Generation::new(Mode::Video, 1);
    generation.state = WorkflowState::Polling;
    let id = generation.id;
    test.store.create(&generation).await.unwrap();

    let response = test
        .app
        .clone()
        .oneshot(get(&format!(
            "/api/v1/generations/{}/asset",
            id.as_uuid()
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn given_stopped_worker_when_submitting_then_service_unavailable() {
    let store = Arc::new(InMemoryGenerationStore::new()) as Arc<dyn GenerationStore>;
    let credentials =
        Arc::new(StaticCredentialProvider::new(None)) as Arc<dyn CredentialProvider>;
    let (generation_sender, receiver) = mpsc::channel(8);
    drop(receiver);

    let app = create_router(AppState {
        store,
        credentials,
        sequences: Arc::new(ModeSequences::new()),
        generation_sender,
        proxy: ProxyState::new("http://127.0.0.1:1", None),
        settings: Settings::default(),
    });

    let response = app
        .oneshot(multipart_request(
            "/api/v1/generate/video",
            Some("a prompt"),
            Some((b"png bytes", "image/png")),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
