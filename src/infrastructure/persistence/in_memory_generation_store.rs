use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::application::ports::{GenerationStore, StoreError};
use crate::domain::{GeneratedAsset, Generation, GenerationId, WorkflowState};

/// Session-scoped store. Generation records live only as long as the
/// process.
#[derive(Default)]
pub struct InMemoryGenerationStore {
    records: RwLock<HashMap<Uuid, Generation>>,
}

impl InMemoryGenerationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GenerationStore for InMemoryGenerationStore {
    async fn create(&self, generation: &Generation) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        records.insert(generation.id.as_uuid(), generation.clone());
        Ok(())
    }

    async fn get(&self, id: GenerationId) -> Result<Option<Generation>, StoreError> {
        let records = self.records.read().await;
        Ok(records.get(&id.as_uuid()).cloned())
    }

    async fn update_state(
        &self,
        id: GenerationId,
        state: WorkflowState,
        error_message: Option<&str>,
    ) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&id.as_uuid())
            .ok_or_else(|| StoreError::NotFound(id.as_uuid().to_string()))?;

        record.state = state;
        record.error_message = error_message.map(String::from);
        record.updated_at = Utc::now();
        Ok(())
    }

    async fn attach_asset(
        &self,
        id: GenerationId,
        asset: GeneratedAsset,
    ) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&id.as_uuid())
            .ok_or_else(|| StoreError::NotFound(id.as_uuid().to_string()))?;

        record.asset = Some(asset);
        record.state = WorkflowState::Ready;
        record.error_message = None;
        record.updated_at = Utc::now();
        Ok(())
    }
}
