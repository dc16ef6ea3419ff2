mod audio_clip;
mod generated_asset;
mod generation;
mod generation_request;
mod mode;
mod video_operation;
mod workflow_state;

pub use audio_clip::AudioClip;
pub use generated_asset::GeneratedAsset;
pub use generation::{Generation, GenerationId};
pub use generation_request::GenerationRequest;
pub use mode::Mode;
pub use video_operation::{GeneratedVideo, VideoHandle, VideoOperation, VideoOperationResponse};
pub use workflow_state::WorkflowState;
