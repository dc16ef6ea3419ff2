use std::sync::Arc;

use crate::application::ports::{InferenceClient, InferenceError};
use crate::domain::GenerationRequest;

/// Two-stage pipeline: a text script is generated from the image and prompt,
/// then narrated with the fixed voice profile. Stage two never starts until
/// stage one has produced a non-empty script.
pub struct NarrationPipeline {
    client: Arc<dyn InferenceClient>,
}

/// Wrapper applied to the user's prompt before the script stage.
pub fn script_prompt(user_prompt: &str) -> String {
    format!(
        "Based on the user's request and the provided image, generate a concise and engaging \
         script for an audio introduction. The script should be ready for text-to-speech. \
         User's request: \"{}\"",
        user_prompt
    )
}

impl NarrationPipeline {
    pub fn new(client: Arc<dyn InferenceClient>) -> Self {
        Self { client }
    }

    /// Returns the narration audio as base64 16-bit PCM.
    pub async fn run(&self, request: &GenerationRequest) -> Result<String, InferenceError> {
        let script_request = GenerationRequest::new(
            script_prompt(&request.prompt),
            request.image_bytes.clone(),
            request.mime_type.clone(),
        );

        let script = self.client.request_script(&script_request).await?;
        if script.trim().is_empty() {
            return Err(InferenceError::EmptyScript);
        }

        tracing::debug!(chars = script.len(), "Script ready, requesting narration");
        self.client.request_narration(&script).await
    }
}
