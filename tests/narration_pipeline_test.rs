use std::sync::Arc;
use std::sync::atomic::Ordering;

use atelier::application::ports::{InferenceClient, InferenceError};
use atelier::application::services::{NarrationPipeline, script_prompt};
use atelier::domain::GenerationRequest;
use atelier::infrastructure::inference::MockInferenceClient;

fn request() -> GenerationRequest {
    GenerationRequest::new(
        "Generate a short audio intro".to_string(),
        b"IMG".to_vec(),
        "image/png".to_string(),
    )
}

fn pipeline(client: &Arc<MockInferenceClient>) -> NarrationPipeline {
    NarrationPipeline::new(Arc::clone(client) as Arc<dyn InferenceClient>)
}

#[tokio::test]
async fn given_script_and_audio_when_running_then_stages_run_in_order() {
    let client = Arc::new(MockInferenceClient::new());
    client.push_script(Ok("Welcome to the showcase!".to_string()));
    client.push_narration(Ok("AAAAAAAA".to_string()));

    let encoded = pipeline(&client).run(&request()).await.unwrap();

    assert_eq!(encoded, "AAAAAAAA");
    assert_eq!(client.script_calls.load(Ordering::SeqCst), 1);
    assert_eq!(client.narration_calls.load(Ordering::SeqCst), 1);

    // Stage two receives exactly the script stage one produced.
    let scripts = client.narration_scripts.lock().unwrap();
    assert_eq!(scripts.as_slice(), ["Welcome to the showcase!"]);
}

#[tokio::test]
async fn given_user_prompt_when_running_then_script_stage_sees_wrapped_prompt_and_image() {
    let client = Arc::new(MockInferenceClient::new());
    client.push_script(Ok("A script.".to_string()));
    client.push_narration(Ok("AAAA".to_string()));

    pipeline(&client).run(&request()).await.unwrap();

    let requests = client.script_requests.lock().unwrap();
    let (prompt, mime_type) = &requests[0];
    assert_eq!(prompt, &script_prompt("Generate a short audio intro"));
    assert!(prompt.ends_with("User's request: \"Generate a short audio intro\""));
    assert_eq!(mime_type, "image/png");
}

#[tokio::test]
async fn given_empty_script_when_running_then_fails_without_narration_call() {
    let client = Arc::new(MockInferenceClient::new());
    client.push_script(Err(InferenceError::EmptyScript));

    let result = pipeline(&client).run(&request()).await;

    assert!(matches!(result, Err(InferenceError::EmptyScript)));
    assert_eq!(client.narration_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn given_whitespace_script_when_running_then_fails_without_narration_call() {
    let client = Arc::new(MockInferenceClient::new());
    client.push_script(Ok("   \n".to_string()));

    let result = pipeline(&client).run(&request()).await;

    assert!(matches!(result, Err(InferenceError::EmptyScript)));
    assert_eq!(client.narration_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn given_narration_failure_when_running_then_error_propagates() {
    let client = Arc::new(MockInferenceClient::new());
    client.push_script(Ok("A script.".to_string()));
    client.push_narration(Err(InferenceError::NoAudio));

    let result = pipeline(&client).run(&request()).await;

    assert!(matches!(result, Err(InferenceError::NoAudio)));
}
