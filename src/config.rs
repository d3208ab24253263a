use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub audio: AudioConfig,
    pub chat: ChatConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    /// Samples per capture block
    pub block_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Chat completions URL
    pub endpoint: String,
    pub model: String,
    pub voice: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-audio-preview".to_string(),
            voice: "alloy".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory reply audio is written to
    pub uploads_path: String,
    /// Public URL prefix the directory is served under
    pub url_prefix: String,
}

impl Config {
    /// Load `path` (extension optional), overridden by `VOICE_CHAT__*` variables
    ///
    /// e.g. `VOICE_CHAT__SERVICE__HTTP__PORT=8080`
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("VOICE_CHAT").separator("__"))
            .build()
            .with_context(|| format!("Failed to read config from {}", path))?;

        settings
            .try_deserialize()
            .context("Invalid configuration")
    }
}
