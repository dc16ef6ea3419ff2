use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub inference: InferenceSettings,
    pub proxy: ProxySettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InferenceSettings {
    pub base_url: String,
    /// Fixed delay between video operation polls.
    pub poll_interval_secs: u64,
    /// PCM format the narration model returns.
    pub audio_sample_rate: u32,
    pub audio_channels: u16,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            base_url: crate::infrastructure::inference::DEFAULT_BASE_URL.to_string(),
            poll_interval_secs: 10,
            audio_sample_rate: 24_000,
            audio_channels: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub base_url: String,
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.siliconflow.cn".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            enable_json: false,
        }
    }
}
