use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::ports::{CredentialProvider, GenerationStore};
use crate::application::services::{GenerationMessage, ModeSequences};
use crate::presentation::config::Settings;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn GenerationStore>,
    pub credentials: Arc<dyn CredentialProvider>,
    pub sequences: Arc<ModeSequences>,
    pub generation_sender: mpsc::Sender<GenerationMessage>,
    pub proxy: ProxyState,
    pub settings: Settings,
}

/// Server-held context for the SiliconFlow forwarders: a shared HTTP client,
/// the upstream base URL, and the credential attached to relayed requests.
#[derive(Clone)]
pub struct ProxyState {
    pub http: reqwest::Client,
    pub base_url: String,
    pub api_key: Option<String>,
}

impl ProxyState {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key,
        }
    }
}
