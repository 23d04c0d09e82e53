use anyhow::{Context, Result};
use reqwest::Client;
use url::Url;

use crate::config::OllamaConfig;

use super::{
    inference::{build_request, parse_response, GENERATE_ENDPOINT},
    GatewayError, TextCompleter,
};

#[derive(Clone)]
pub struct OllamaClient {
    http: Client,
    endpoint: Url,
    config: OllamaConfig,
}

impl OllamaClient {
    pub fn new(http: Client, config: OllamaConfig) -> Result<Self> {
        let endpoint = config
            .base_url
            .join(GENERATE_ENDPOINT)
            .with_context(|| format!("invalid Ollama base url {}", config.base_url))?;
        Ok(Self {
            http,
            endpoint,
            config,
        })
    }
}

impl TextCompleter for OllamaClient {
    async fn complete(&self, prompt: &str) -> Result<String, GatewayError> {
        let request = build_request(&self.config.model, prompt);
        let response = self
            .http
            .post(self.endpoint.clone())
            .timeout(self.config.request_timeout)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status(status.as_u16()));
        }

        parse_response(response).await
    }
}
