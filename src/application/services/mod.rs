mod generation_worker;
mod mode_sequences;
mod narration_pipeline;
mod video_poller;

pub use generation_worker::{GenerationError, GenerationMessage, GenerationWorker};
pub use mode_sequences::ModeSequences;
pub use narration_pipeline::{NarrationPipeline, script_prompt};
pub use video_poller::VideoPoller;
