mod credential;
mod generate;
mod generation_status;
mod health;
mod proxy;

use serde::Serialize;

pub use credential::credential_status_handler;
pub use generate::generate_handler;
pub use generation_status::{generation_asset_handler, generation_status_handler};
pub use health::health_handler;
pub use proxy::{siliconflow_audio_handler, siliconflow_images_handler};

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
