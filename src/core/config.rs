use super::error::LlmError;

/// Where to find the API key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiKey {
    /// Read the provider's default environment variable (`GEMINI_API_KEY`).
    Default,
    /// Read a custom environment variable.
    Env(String),
    /// Use the given key as-is.
    Custom(String),
}

impl ApiKey {
    pub fn resolve(&self, default_env_var: &str) -> Result<String, LlmError> {
        match self {
            ApiKey::Default => read_env(default_env_var),
            ApiKey::Env(name) => read_env(name),
            ApiKey::Custom(key) if key.trim().is_empty() => Err(
                LlmError::ProviderConfiguration("API key must not be empty.".to_string()),
            ),
            ApiKey::Custom(key) => Ok(key.clone()),
        }
    }
}

fn read_env(name: &str) -> Result<String, LlmError> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| LlmError::ProviderConfiguration(format!("{name} not set.")))
}
