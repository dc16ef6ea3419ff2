use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::application::ports::{
    GenerationStore, InferenceClient, InferenceError, StoreError,
};
use crate::domain::{
    GeneratedAsset, GenerationId, GenerationRequest, Mode, WorkflowState,
};
use crate::infrastructure::codec::{self, CodecError};
use crate::infrastructure::observability::sanitize_prompt;

use super::{ModeSequences, NarrationPipeline, VideoPoller};

pub struct GenerationMessage {
    pub generation_id: GenerationId,
    pub mode: Mode,
    pub sequence: u64,
    pub request: GenerationRequest,
}

/// Background task that drives each submission through its mode pipeline,
/// recording every workflow-state transition in the store. One worker
/// consumes the queue; within a submission the steps run in strict order.
pub struct GenerationWorker {
    receiver: mpsc::Receiver<GenerationMessage>,
    client: Arc<dyn InferenceClient>,
    store: Arc<dyn GenerationStore>,
    sequences: Arc<ModeSequences>,
    poller: VideoPoller,
    narration: NarrationPipeline,
    audio_sample_rate: u32,
    audio_channels: u16,
}

impl GenerationWorker {
    pub fn new(
        receiver: mpsc::Receiver<GenerationMessage>,
        client: Arc<dyn InferenceClient>,
        store: Arc<dyn GenerationStore>,
        sequences: Arc<ModeSequences>,
        poll_interval: Duration,
        audio_sample_rate: u32,
        audio_channels: u16,
    ) -> Self {
        let poller = VideoPoller::new(Arc::clone(&client), poll_interval);
        let narration = NarrationPipeline::new(Arc::clone(&client));
        Self {
            receiver,
            client,
            store,
            sequences,
            poller,
            narration,
            audio_sample_rate,
            audio_channels,
        }
    }

    pub async fn run(mut self) {
        tracing::info!("Generation worker started");
        while let Some(msg) = self.receiver.recv().await {
            let span = tracing::info_span!(
                "generation",
                generation_id = %msg.generation_id.as_uuid(),
                mode = %msg.mode,
                prompt = %sanitize_prompt(&msg.request.prompt),
            );
            let _guard = span.enter();

            if let Err(e) = self.process(msg).await {
                tracing::error!(error = %e, "Generation job failed");
            }
        }
        tracing::info!("Generation worker stopped: channel closed");
    }

    async fn process(&self, msg: GenerationMessage) -> Result<(), GenerationError> {
        let id = msg.generation_id;

        if !self.sequences.is_current(msg.mode, msg.sequence) {
            tracing::debug!(sequence = msg.sequence, "Skipping superseded submission");
            return self.mark_superseded(id).await;
        }

        let result = match msg.mode {
            Mode::Video => self.run_video(id, &msg.request).await,
            Mode::Image => self.run_image(id, &msg.request).await,
            Mode::Audio => self.run_audio(id, &msg.request).await,
        };

        // A newer submission for this mode wins; a stale result is never
        // rendered, whatever the pipeline produced.
        if !self.sequences.is_current(msg.mode, msg.sequence) {
            tracing::debug!(sequence = msg.sequence, "Discarding stale result");
            return self.mark_superseded(id).await;
        }

        match result {
            Ok(asset) => {
                self.store
                    .attach_asset(id, asset)
                    .await
                    .map_err(GenerationError::Store)?;
                tracing::info!("Generation completed");
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                let state = match &e {
                    GenerationError::Inference(
                        InferenceError::MissingCredential | InferenceError::CredentialRejected(_),
                    ) => WorkflowState::AwaitingCredential,
                    _ => WorkflowState::Failed,
                };
                self.update_state(id, state, Some(&message)).await?;
                Err(e)
            }
        }
    }

    async fn run_video(
        &self,
        id: GenerationId,
        request: &GenerationRequest,
    ) -> Result<GeneratedAsset, GenerationError> {
        self.update_state(id, WorkflowState::Submitting, None).await?;
        let operation = self
            .client
            .request_video(request)
            .await
            .map_err(GenerationError::Inference)?;

        self.update_state(id, WorkflowState::Polling, None).await?;
        let operation = self
            .poller
            .run(operation)
            .await
            .map_err(GenerationError::Inference)?;

        let uri = operation
            .first_video_uri()
            .ok_or(GenerationError::Inference(InferenceError::MissingVideoUri))?;

        self.update_state(id, WorkflowState::Decoding, None).await?;
        let bytes = self
            .client
            .fetch_video(uri)
            .await
            .map_err(GenerationError::Inference)?;

        Ok(GeneratedAsset::Video(bytes))
    }

    async fn run_image(
        &self,
        id: GenerationId,
        request: &GenerationRequest,
    ) -> Result<GeneratedAsset, GenerationError> {
        self.update_state(id, WorkflowState::Submitting, None).await?;
        let encoded = self
            .client
            .request_image_edit(request)
            .await
            .map_err(GenerationError::Inference)?;

        self.update_state(id, WorkflowState::Decoding, None).await?;
        let bytes = codec::decode_base64(&encoded).map_err(GenerationError::Codec)?;

        Ok(GeneratedAsset::Image(bytes))
    }

    async fn run_audio(
        &self,
        id: GenerationId,
        request: &GenerationRequest,
    ) -> Result<GeneratedAsset, GenerationError> {
        self.update_state(id, WorkflowState::Submitting, None).await?;
        let encoded = self
            .narration
            .run(request)
            .await
            .map_err(GenerationError::Inference)?;

        self.update_state(id, WorkflowState::Decoding, None).await?;
        let bytes = codec::decode_base64(&encoded).map_err(GenerationError::Codec)?;
        let clip = codec::decode_pcm_to_clip(&bytes, self.audio_sample_rate, self.audio_channels);

        Ok(GeneratedAsset::Audio(clip))
    }

    async fn mark_superseded(&self, id: GenerationId) -> Result<(), GenerationError> {
        self.update_state(
            id,
            WorkflowState::Failed,
            Some("superseded by a newer submission"),
        )
        .await
    }

    async fn update_state(
        &self,
        id: GenerationId,
        state: WorkflowState,
        error_message: Option<&str>,
    ) -> Result<(), GenerationError> {
        tracing::debug!(state = %state, "Workflow state transition");
        self.store
            .update_state(id, state, error_message)
            .await
            .map_err(GenerationError::Store)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("inference: {0}")]
    Inference(InferenceError),
    #[error("codec: {0}")]
    Codec(CodecError),
    #[error("store: {0}")]
    Store(StoreError),
}
