use std::time::Duration;

use thiserror::Error;
use url::Url;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub ollama: OllamaConfig,
    pub classifier: ClassifierConfig,
    pub voice: VoiceConfig,
    pub directories: DirectoryConfig,
    pub logging: LoggingConfig,
    pub timezone: String,
}

#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub base_url: Url,
    pub model: String,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub use_gmail: bool,
    pub max_emails: usize,
    pub query: Option<String>,
    pub gmail: GmailConfig,
}

#[derive(Debug, Clone)]
pub struct GmailConfig {
    pub access_token: Option<String>,
    pub api_base: Url,
}

/// Fallback keyword lists used when the model emits no explicit category
/// token. Overridable, but the shipped defaults are the contract the tests
/// pin down.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub urgency_keywords: Vec<String>,
    pub importance_keywords: Vec<String>,
    pub concurrency: usize,
}

#[derive(Debug, Clone)]
pub struct VoiceConfig {
    pub api_base: Url,
    pub private_key: Option<String>,
    pub assistant_id: Option<String>,
}

impl VoiceConfig {
    pub fn enabled(&self) -> bool {
        self.private_key.is_some() && self.assistant_id.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    pub logs_dir: String,
    pub data_dir: String,
    pub fixture_filename: String,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}
