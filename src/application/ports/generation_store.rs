use async_trait::async_trait;

use crate::domain::{GeneratedAsset, Generation, GenerationId, WorkflowState};

/// Session store for generation records. In-memory only; nothing survives a
/// restart.
#[async_trait]
pub trait GenerationStore: Send + Sync {
    async fn create(&self, generation: &Generation) -> Result<(), StoreError>;

    async fn get(&self, id: GenerationId) -> Result<Option<Generation>, StoreError>;

    async fn update_state(
        &self,
        id: GenerationId,
        state: WorkflowState,
        error_message: Option<&str>,
    ) -> Result<(), StoreError>;

    /// Attach the finished asset and move the record to Ready.
    async fn attach_asset(
        &self,
        id: GenerationId,
        asset: GeneratedAsset,
    ) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("generation not found: {0}")]
    NotFound(String),
}
