use crate::application::ports::CredentialProvider;

/// Reads the key from an environment variable on every lookup, so a key
/// exported after startup is picked up by the next call.
pub struct EnvCredentialProvider {
    var_name: String,
}

impl EnvCredentialProvider {
    pub fn new(var_name: impl Into<String>) -> Self {
        Self {
            var_name: var_name.into(),
        }
    }
}

impl CredentialProvider for EnvCredentialProvider {
    fn credential(&self) -> Option<String> {
        std::env::var(&self.var_name).ok().filter(|v| !v.is_empty())
    }
}

/// Fixed credential for tests and wiring where the key is already resolved.
pub struct StaticCredentialProvider {
    credential: Option<String>,
}

impl StaticCredentialProvider {
    pub fn new(credential: Option<String>) -> Self {
        Self { credential }
    }
}

impl CredentialProvider for StaticCredentialProvider {
    fn credential(&self) -> Option<String> {
        self.credential.clone()
    }
}
