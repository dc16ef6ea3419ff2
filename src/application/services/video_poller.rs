use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{InferenceClient, InferenceError};
use crate::domain::VideoOperation;

/// Drives a submitted video operation to completion: wait a fixed interval,
/// re-query, replace the snapshot. No attempt cap; the loop ends when the
/// remote reports done or a poll call fails.
pub struct VideoPoller {
    client: Arc<dyn InferenceClient>,
    interval: Duration,
}

impl VideoPoller {
    pub fn new(client: Arc<dyn InferenceClient>, interval: Duration) -> Self {
        Self { client, interval }
    }

    pub async fn run(
        &self,
        mut operation: VideoOperation,
    ) -> Result<VideoOperation, InferenceError> {
        while !operation.done {
            tokio::time::sleep(self.interval).await;

            tracing::debug!(operation = %operation.name, "Polling video operation");
            operation = self.client.poll_video(&operation).await?;
        }

        tracing::info!(operation = %operation.name, "Video operation completed");
        Ok(operation)
    }
}
