mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    InferenceSettings, LoggingSettings, ProxySettings, ServerSettings, Settings,
};
