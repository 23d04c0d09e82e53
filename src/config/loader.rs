use std::{env, time::Duration};

use url::Url;

use crate::classifier::rules::{DEFAULT_IMPORTANCE_KEYWORDS, DEFAULT_URGENCY_KEYWORDS};

use super::env::{
    AppConfig, ClassifierConfig, ConfigError, DirectoryConfig, GmailConfig, LoggingConfig,
    OllamaConfig, SourceConfig, VoiceConfig,
};

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_env()
}

impl AppConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let ollama = OllamaConfig {
            base_url: parse_url(
                "OLLAMA_BASE_URL",
                env::var("OLLAMA_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            )?,
            model: env::var("OLLAMA_MODEL").unwrap_or_else(|_| "phi3".to_string()),
            request_timeout: Duration::from_secs(
                parse_num("OLLAMA_TIMEOUT_SECS").unwrap_or(30) as u64,
            ),
        };

        let gmail = GmailConfig {
            access_token: env::var("GMAIL_ACCESS_TOKEN").ok().filter(|v| !v.is_empty()),
            api_base: parse_url(
                "GMAIL_API_BASE",
                env::var("GMAIL_API_BASE")
                    .unwrap_or_else(|_| "https://gmail.googleapis.com/gmail/v1".to_string()),
            )?,
        };

        let source = SourceConfig {
            use_gmail: env::var("USE_GMAIL")
                .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
                .unwrap_or(true),
            max_emails: parse_num("MAX_EMAILS").unwrap_or(5),
            query: match env::var("GMAIL_QUERY") {
                Ok(value) if value.trim().is_empty() => None,
                Ok(value) => Some(value),
                Err(_) => Some("is:unread".to_string()),
            },
            gmail,
        };

        let classifier = ClassifierConfig {
            urgency_keywords: parse_keywords("URGENCY_KEYWORDS", &DEFAULT_URGENCY_KEYWORDS),
            importance_keywords: parse_keywords("IMPORTANCE_KEYWORDS", &DEFAULT_IMPORTANCE_KEYWORDS),
            concurrency: parse_num("CLASSIFY_CONCURRENCY").unwrap_or(1).max(1),
        };

        let voice = VoiceConfig {
            api_base: parse_url(
                "VAPI_API_BASE",
                env::var("VAPI_API_BASE").unwrap_or_else(|_| "https://api.vapi.ai".to_string()),
            )?,
            private_key: env::var("VAPI_PRIVATE_KEY").ok().filter(|v| !v.is_empty()),
            assistant_id: env::var("VAPI_ASSISTANT_ID").ok().filter(|v| !v.is_empty()),
        };

        let directories = DirectoryConfig {
            logs_dir: env::var("LOGS_DIR").unwrap_or_else(|_| "logs".to_string()),
            data_dir: env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()),
            fixture_filename: env::var("FIXTURE_FILENAME")
                .unwrap_or_else(|_| "emails.json".to_string()),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        };

        let timezone = env::var("TIMEZONE").unwrap_or_else(|_| "UTC".to_string());

        Ok(Self {
            source,
            ollama,
            classifier,
            voice,
            directories,
            logging,
            timezone,
        })
    }
}

fn parse_url(key: &'static str, value: String) -> Result<Url, ConfigError> {
    Url::parse(&value).map_err(|err| ConfigError::Invalid {
        key,
        reason: err.to_string(),
    })
}

fn parse_num(key: &str) -> Option<usize> {
    env::var(key).ok().and_then(|value| value.parse::<usize>().ok())
}

fn parse_keywords(key: &str, defaults: &[&str]) -> Vec<String> {
    env::var(key)
        .ok()
        .map(|value| {
            value
                .split(',')
                .map(|part| part.trim().to_lowercase())
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
        })
        .filter(|list| !list.is_empty())
        .unwrap_or_else(|| defaults.iter().map(|kw| kw.to_string()).collect())
}
