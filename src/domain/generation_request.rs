/// Immutable input of one submission: the user's prompt plus the uploaded
/// source image. Discarded once the pipeline completes.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub image_bytes: Vec<u8>,
    pub mime_type: String,
}

impl GenerationRequest {
    pub fn new(prompt: String, image_bytes: Vec<u8>, mime_type: String) -> Self {
        Self {
            prompt,
            image_bytes,
            mime_type,
        }
    }
}
