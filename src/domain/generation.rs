use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{GeneratedAsset, Mode, WorkflowState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GenerationId(Uuid);

impl GenerationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for GenerationId {
    fn default() -> Self {
        Self::new()
    }
}

/// One submission's record: its workflow state, error message if it failed,
/// and the finished asset once it reaches Ready. `sequence` is the per-mode
/// monotone counter used to discard stale in-flight results.
#[derive(Debug, Clone)]
pub struct Generation {
    pub id: GenerationId,
    pub mode: Mode,
    pub sequence: u64,
    pub state: WorkflowState,
    pub error_message: Option<String>,
    pub asset: Option<GeneratedAsset>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Generation {
    pub fn new(mode: Mode, sequence: u64) -> Self {
        let now = Utc::now();
        Self {
            id: GenerationId::new(),
            mode,
            sequence,
            state: WorkflowState::Idle,
            error_message: None,
            asset: None,
            created_at: now,
            updated_at: now,
        }
    }
}
