use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use config::{Config, Environment as EnvironmentSource, File};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use atelier::application::ports::{CredentialProvider, GenerationStore};
use atelier::application::services::{GenerationWorker, ModeSequences};
use atelier::infrastructure::credentials::EnvCredentialProvider;
use atelier::infrastructure::inference::GeminiClient;
use atelier::infrastructure::observability::{TracingConfig, init_tracing};
use atelier::infrastructure::persistence::InMemoryGenerationStore;
use atelier::presentation::{AppState, Environment, ProxyState, Settings, create_router};

const INFERENCE_KEY_VAR: &str = "GEMINI_API_KEY";
const PROXY_KEY_VAR: &str = "SILICONFLOW_API_KEY";
const PROXY_BASE_URL_VAR: &str = "SILICONFLOW_BASE_URL";

const GENERATION_QUEUE_DEPTH: usize = 32;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment: Environment = env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let configuration = Config::builder()
        .add_source(
            File::with_name(&format!("appsettings.{}", environment.as_str())).required(false),
        )
        .add_source(EnvironmentSource::with_prefix("APP").separator("_"))
        .build()?;

    let settings: Settings = configuration.try_deserialize()?;

    init_tracing(
        TracingConfig::new(environment.as_str(), settings.logging.enable_json),
        settings.server.port,
    );

    let credentials = Arc::new(EnvCredentialProvider::new(INFERENCE_KEY_VAR));
    let client = Arc::new(GeminiClient::new(
        &settings.inference.base_url,
        Arc::clone(&credentials) as Arc<dyn CredentialProvider>,
    ));
    let store = Arc::new(InMemoryGenerationStore::new());
    let sequences = Arc::new(ModeSequences::new());

    let (generation_sender, generation_receiver) = mpsc::channel(GENERATION_QUEUE_DEPTH);

    let worker = GenerationWorker::new(
        generation_receiver,
        client,
        Arc::clone(&store) as Arc<dyn GenerationStore>,
        Arc::clone(&sequences),
        Duration::from_secs(settings.inference.poll_interval_secs),
        settings.inference.audio_sample_rate,
        settings.inference.audio_channels,
    );
    tokio::spawn(worker.run());

    let proxy_base_url = env::var(PROXY_BASE_URL_VAR)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| settings.proxy.base_url.clone());
    let proxy_api_key = env::var(PROXY_KEY_VAR).ok().filter(|v| !v.is_empty());
    if proxy_api_key.is_none() {
        tracing::warn!(
            "{} not set: SiliconFlow forwarders will reject requests",
            PROXY_KEY_VAR
        );
    }

    let state = AppState {
        store,
        credentials,
        sequences,
        generation_sender,
        proxy: ProxyState::new(proxy_base_url, proxy_api_key),
        settings: settings.clone(),
    };

    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
