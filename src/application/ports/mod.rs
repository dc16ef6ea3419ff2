mod credential_provider;
mod generation_store;
mod inference_client;

pub use credential_provider::CredentialProvider;
pub use generation_store::{GenerationStore, StoreError};
pub use inference_client::{InferenceClient, InferenceError};
