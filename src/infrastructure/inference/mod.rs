mod gemini_client;
mod mock_inference_client;
mod wire;

pub use gemini_client::{DEFAULT_BASE_URL, GeminiClient};
pub use mock_inference_client::MockInferenceClient;
