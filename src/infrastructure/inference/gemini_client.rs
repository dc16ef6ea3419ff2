use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::{CredentialProvider, InferenceClient, InferenceError};
use crate::domain::{GenerationRequest, VideoOperation};
use crate::infrastructure::codec;

use super::wire;

const VIDEO_MODEL: &str = "veo-3.1-fast-generate-preview";
const IMAGE_MODEL: &str = "gemini-2.5-flash-image";
const SCRIPT_MODEL: &str = "gemini-2.5-flash";
const NARRATION_MODEL: &str = "gemini-2.5-flash-preview-tts";
const NARRATION_VOICE: &str = "Kore";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// The upstream reports an unknown or unauthorized key with this message.
const CREDENTIAL_REJECTED_PATTERN: &str = "Requested entity was not found";

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Adapter for the Generative Language REST API. The credential is resolved
/// through the injected provider on every call, so a key selected after
/// startup takes effect without rebuilding the client.
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl GeminiClient {
    pub fn new(base_url: &str, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    fn credential(&self) -> Result<String, InferenceError> {
        self.credentials
            .credential()
            .ok_or(InferenceError::MissingCredential)
    }

    /// Classify a non-2xx response. The "entity not found" rejection is the
    /// upstream's way of reporting a bad key, and is surfaced as a distinct
    /// kind so callers never match on message text.
    async fn read_failure(response: reqwest::Response) -> InferenceError {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());

        let message = serde_json::from_str::<wire::ErrorEnvelope>(&body)
            .ok()
            .and_then(|envelope| envelope.error.map(|e| e.message))
            .filter(|m| !m.is_empty())
            .unwrap_or(body);

        if message.contains(CREDENTIAL_REJECTED_PATTERN) {
            InferenceError::CredentialRejected(message)
        } else {
            InferenceError::Upstream(format!("status {}: {}", status, message))
        }
    }

    async fn generate_content(
        &self,
        model: &str,
        request: &wire::GenerateContentRequest,
    ) -> Result<wire::GenerateContentResponse, InferenceError> {
        let key = self.credential()?;
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, model);

        tracing::debug!(model = %model, "Sending generate-content request");

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &key)
            .json(request)
            .send()
            .await
            .map_err(|e| InferenceError::Upstream(format!("request: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::read_failure(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| InferenceError::Upstream(format!("parse response: {}", e)))
    }
}

fn first_inline_data(response: &wire::GenerateContentResponse) -> Option<&wire::InlineData> {
    response
        .candidates
        .first()?
        .content
        .as_ref()?
        .parts
        .iter()
        .find_map(|part| part.inline_data.as_ref())
}

fn joined_text(response: &wire::GenerateContentResponse) -> String {
    response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|part| part.text.as_deref())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}

#[async_trait]
impl InferenceClient for GeminiClient {
    async fn request_video(
        &self,
        request: &GenerationRequest,
    ) -> Result<VideoOperation, InferenceError> {
        let key = self.credential()?;
        let url = format!(
            "{}/v1beta/models/{}:predictLongRunning",
            self.base_url, VIDEO_MODEL
        );

        let body = wire::VideoGenerationRequest {
            instances: vec![wire::VideoInstance {
                prompt: request.prompt.clone(),
                image: wire::VideoImage {
                    bytes_base64_encoded: codec::encode_base64(&request.image_bytes),
                    mime_type: request.mime_type.clone(),
                },
            }],
            parameters: wire::VideoParameters {
                number_of_videos: 1,
                resolution: "720p".to_string(),
                aspect_ratio: "16:9".to_string(),
            },
        };

        tracing::debug!(model = VIDEO_MODEL, "Submitting video generation job");

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &key)
            .json(&body)
            .send()
            .await
            .map_err(|e| InferenceError::Upstream(format!("request: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::read_failure(response).await);
        }

        let operation: VideoOperation = response
            .json()
            .await
            .map_err(|e| InferenceError::Upstream(format!("parse operation: {}", e)))?;

        tracing::info!(operation = %operation.name, "Video generation job submitted");
        Ok(operation)
    }

    async fn poll_video(
        &self,
        operation: &VideoOperation,
    ) -> Result<VideoOperation, InferenceError> {
        let key = self.credential()?;
        let url = format!("{}/v1beta/{}", self.base_url, operation.name);

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &key)
            .send()
            .await
            .map_err(|e| InferenceError::Upstream(format!("request: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::read_failure(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| InferenceError::Upstream(format!("parse operation: {}", e)))
    }

    async fn fetch_video(&self, uri: &str) -> Result<Vec<u8>, InferenceError> {
        let key = self.credential()?;

        let response = self
            .client
            .get(uri)
            .query(&[("key", key.as_str())])
            .send()
            .await
            .map_err(|e| InferenceError::Upstream(format!("request: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::read_failure(response).await);
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| InferenceError::Upstream(format!("read body: {}", e)))?;

        tracing::info!(bytes = bytes.len(), "Video asset downloaded");
        Ok(bytes.to_vec())
    }

    async fn request_image_edit(
        &self,
        request: &GenerationRequest,
    ) -> Result<String, InferenceError> {
        let body = wire::GenerateContentRequest {
            contents: vec![wire::Content {
                parts: vec![
                    wire::Part::inline_data(
                        &request.mime_type,
                        codec::encode_base64(&request.image_bytes),
                    ),
                    wire::Part::text(&request.prompt),
                ],
            }],
            generation_config: Some(wire::GenerationConfig {
                response_modalities: Some(vec!["IMAGE".to_string()]),
                speech_config: None,
            }),
        };

        let response = self.generate_content(IMAGE_MODEL, &body).await?;

        first_inline_data(&response)
            .map(|data| data.data.clone())
            .ok_or(InferenceError::NoImage)
    }

    async fn request_script(
        &self,
        request: &GenerationRequest,
    ) -> Result<String, InferenceError> {
        let body = wire::GenerateContentRequest {
            contents: vec![wire::Content {
                parts: vec![
                    wire::Part::text(&request.prompt),
                    wire::Part::inline_data(
                        &request.mime_type,
                        codec::encode_base64(&request.image_bytes),
                    ),
                ],
            }],
            generation_config: None,
        };

        let response = self.generate_content(SCRIPT_MODEL, &body).await?;

        let script = joined_text(&response).trim().to_string();
        if script.is_empty() {
            return Err(InferenceError::EmptyScript);
        }

        tracing::debug!(chars = script.len(), "Narration script generated");
        Ok(script)
    }

    async fn request_narration(&self, script: &str) -> Result<String, InferenceError> {
        let body = wire::GenerateContentRequest {
            contents: vec![wire::Content {
                parts: vec![wire::Part::text(script)],
            }],
            generation_config: Some(wire::GenerationConfig {
                response_modalities: Some(vec!["AUDIO".to_string()]),
                speech_config: Some(wire::SpeechConfig {
                    voice_config: wire::VoiceConfig {
                        prebuilt_voice_config: wire::PrebuiltVoiceConfig {
                            voice_name: NARRATION_VOICE.to_string(),
                        },
                    },
                }),
            }),
        };

        let response = self.generate_content(NARRATION_MODEL, &body).await?;

        first_inline_data(&response)
            .map(|data| data.data.clone())
            .ok_or(InferenceError::NoAudio)
    }
}
