use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::application::ports::{InferenceClient, InferenceError};
use crate::domain::{GenerationRequest, VideoOperation};

/// Scripted in-memory client for service and handler tests. Responses are
/// queued per operation; calls beyond the script fail with an upstream
/// error. Call counts and received inputs are recorded for assertions.
#[derive(Default)]
pub struct MockInferenceClient {
    submit_results: Mutex<VecDeque<Result<VideoOperation, InferenceError>>>,
    poll_results: Mutex<VecDeque<Result<VideoOperation, InferenceError>>>,
    fetch_results: Mutex<VecDeque<Result<Vec<u8>, InferenceError>>>,
    image_results: Mutex<VecDeque<Result<String, InferenceError>>>,
    script_results: Mutex<VecDeque<Result<String, InferenceError>>>,
    narration_results: Mutex<VecDeque<Result<String, InferenceError>>>,

    pub submit_calls: AtomicUsize,
    pub poll_calls: AtomicUsize,
    pub fetch_calls: AtomicUsize,
    pub image_calls: AtomicUsize,
    pub script_calls: AtomicUsize,
    pub narration_calls: AtomicUsize,

    pub script_requests: Mutex<Vec<(String, String)>>,
    pub narration_scripts: Mutex<Vec<String>>,
    pub fetched_uris: Mutex<Vec<String>>,
}

impl MockInferenceClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_submit(&self, result: Result<VideoOperation, InferenceError>) {
        self.submit_results.lock().unwrap().push_back(result);
    }

    pub fn push_poll(&self, result: Result<VideoOperation, InferenceError>) {
        self.poll_results.lock().unwrap().push_back(result);
    }

    pub fn push_fetch(&self, result: Result<Vec<u8>, InferenceError>) {
        self.fetch_results.lock().unwrap().push_back(result);
    }

    pub fn push_image(&self, result: Result<String, InferenceError>) {
        self.image_results.lock().unwrap().push_back(result);
    }

    pub fn push_script(&self, result: Result<String, InferenceError>) {
        self.script_results.lock().unwrap().push_back(result);
    }

    pub fn push_narration(&self, result: Result<String, InferenceError>) {
        self.narration_results.lock().unwrap().push_back(result);
    }

    fn pop<T>(queue: &Mutex<VecDeque<Result<T, InferenceError>>>) -> Result<T, InferenceError> {
        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(InferenceError::Upstream("no scripted response".to_string())))
    }
}

#[async_trait]
impl InferenceClient for MockInferenceClient {
    async fn request_video(
        &self,
        _request: &GenerationRequest,
    ) -> Result<VideoOperation, InferenceError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        Self::pop(&self.submit_results)
    }

    async fn poll_video(
        &self,
        _operation: &VideoOperation,
    ) -> Result<VideoOperation, InferenceError> {
        self.poll_calls.fetch_add(1, Ordering::SeqCst);
        Self::pop(&self.poll_results)
    }

    async fn fetch_video(&self, uri: &str) -> Result<Vec<u8>, InferenceError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.fetched_uris.lock().unwrap().push(uri.to_string());
        Self::pop(&self.fetch_results)
    }

    async fn request_image_edit(
        &self,
        _request: &GenerationRequest,
    ) -> Result<String, InferenceError> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        Self::pop(&self.image_results)
    }

    async fn request_script(
        &self,
        request: &GenerationRequest,
    ) -> Result<String, InferenceError> {
        self.script_calls.fetch_add(1, Ordering::SeqCst);
        self.script_requests
            .lock()
            .unwrap()
            .push((request.prompt.clone(), request.mime_type.clone()));
        Self::pop(&self.script_results)
    }

    async fn request_narration(&self, script: &str) -> Result<String, InferenceError> {
        self.narration_calls.fetch_add(1, Ordering::SeqCst);
        self.narration_scripts
            .lock()
            .unwrap()
            .push(script.to_string());
        Self::pop(&self.narration_results)
    }
}
