use async_trait::async_trait;

use crate::domain::{GenerationRequest, VideoOperation};

/// Typed calls to the remote generative-AI service. Each implementation
/// resolves its credential per call; results are non-reproducible model
/// output and are never cached.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Submit one long-running video job (fixed parameters: single video,
    /// 720p, 16:9) and return its initial operation snapshot.
    async fn request_video(
        &self,
        request: &GenerationRequest,
    ) -> Result<VideoOperation, InferenceError>;

    /// Re-query the job and return a fresh snapshot. The caller's handle is
    /// not mutated.
    async fn poll_video(
        &self,
        operation: &VideoOperation,
    ) -> Result<VideoOperation, InferenceError>;

    /// Download the finished video from the URI a terminal snapshot reports.
    async fn fetch_video(&self, uri: &str) -> Result<Vec<u8>, InferenceError>;

    /// Single-shot image-modality call; returns the base64 payload of the
    /// first image part in the response.
    async fn request_image_edit(
        &self,
        request: &GenerationRequest,
    ) -> Result<String, InferenceError>;

    /// Stage one of the narration pipeline: a text script conditioned on the
    /// image and prompt.
    async fn request_script(
        &self,
        request: &GenerationRequest,
    ) -> Result<String, InferenceError>;

    /// Stage two: speech audio for a finished script, returned as base64
    /// 16-bit PCM. Must only be called with a non-empty script.
    async fn request_narration(&self, script: &str) -> Result<String, InferenceError>;
}

/// Structured error kinds, so callers never have to pattern-match on
/// upstream message text.
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("no api credential configured")]
    MissingCredential,
    #[error("api credential rejected by upstream: {0}")]
    CredentialRejected(String),
    #[error("upstream request failed: {0}")]
    Upstream(String),
    #[error("response contained no image payload")]
    NoImage,
    #[error("failed to generate a script from the image")]
    EmptyScript,
    #[error("response contained no audio payload")]
    NoAudio,
    #[error("video generation completed but no video uri was found")]
    MissingVideoUri,
}
