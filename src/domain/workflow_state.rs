use std::fmt;
use std::str::FromStr;

/// Lifecycle of one generation submission. Exactly one record per
/// submission; transitions are recorded in the store and drive what the
/// status endpoint reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowState {
    Idle,
    AwaitingCredential,
    Submitting,
    Polling,
    Decoding,
    Ready,
    Failed,
}

impl WorkflowState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowState::Idle => "IDLE",
            WorkflowState::AwaitingCredential => "AWAITING_CREDENTIAL",
            WorkflowState::Submitting => "SUBMITTING",
            WorkflowState::Polling => "POLLING",
            WorkflowState::Decoding => "DECODING",
            WorkflowState::Ready => "READY",
            WorkflowState::Failed => "FAILED",
        }
    }

    /// Terminal states receive no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowState::Ready | WorkflowState::Failed)
    }
}

impl FromStr for WorkflowState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IDLE" => Ok(WorkflowState::Idle),
            "AWAITING_CREDENTIAL" => Ok(WorkflowState::AwaitingCredential),
            "SUBMITTING" => Ok(WorkflowState::Submitting),
            "POLLING" => Ok(WorkflowState::Polling),
            "DECODING" => Ok(WorkflowState::Decoding),
            "READY" => Ok(WorkflowState::Ready),
            "FAILED" => Ok(WorkflowState::Failed),
            _ => Err(format!("Invalid workflow state: {}", s)),
        }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
