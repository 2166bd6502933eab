use crate::error::{ConciergeError, Result};
use serde::Deserialize;
use std::env;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_TIMEOUT_SECONDS: u64 = 60;
const DEFAULT_CREDENTIAL_ENV: &str = "GEMINI_API_KEY";

/// Startup configuration. The model credential is deliberately absent: it is
/// looked up per request through a [`CredentialProvider`].
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub gemini: GeminiSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSettings {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    /// Name of the environment variable holding the API key
    pub credential_env: String,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECONDS,
            credential_env: DEFAULT_CREDENTIAL_ENV.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from defaults overlaid with `APP_*` environment
    /// variables. Nested keys use `__`, e.g. `APP_GEMINI__MODEL`.
    pub fn load() -> Result<Self> {
        let gemini = GeminiSettings::default();
        let settings = config::Config::builder()
            .set_default("host", DEFAULT_HOST)?
            .set_default("port", DEFAULT_PORT as i64)?
            .set_default("gemini.base_url", gemini.base_url)?
            .set_default("gemini.model", gemini.model)?
            .set_default("gemini.timeout_secs", gemini.timeout_secs as i64)?
            .set_default("gemini.credential_env", gemini.credential_env)?
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

/// Source of the model API key, consulted at the start of every request so a
/// rotated key is picked up without restarting the process.
pub trait CredentialProvider: Send + Sync {
    fn api_key(&self) -> std::result::Result<String, ConciergeError>;
}

/// Reads the key from an environment variable on every call.
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    var: String,
}

impl EnvCredentials {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CredentialProvider for EnvCredentials {
    fn api_key(&self) -> std::result::Result<String, ConciergeError> {
        let key = env::var(&self.var).map_err(|e| {
            ConciergeError::Configuration(format!("{} is not available: {}", self.var, e))
        })?;
        validate_api_key(&self.var, key)
    }
}

/// A fixed key, or none at all.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    key: Option<String>,
}

impl StaticCredentials {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
        }
    }

    pub fn missing() -> Self {
        Self { key: None }
    }
}

impl CredentialProvider for StaticCredentials {
    fn api_key(&self) -> std::result::Result<String, ConciergeError> {
        match &self.key {
            Some(key) => validate_api_key("static credential", key.clone()),
            None => Err(ConciergeError::Configuration(
                "No API key configured".to_string(),
            )),
        }
    }
}

fn validate_api_key(source: &str, key: String) -> std::result::Result<String, ConciergeError> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return Err(ConciergeError::Configuration(format!("{} is empty", source)));
    }
    if trimmed.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ConciergeError::Configuration(format!(
            "{} contains whitespace or control characters",
            source
        )));
    }
    Ok(trimmed.to_string())
}
