pub mod client;
pub mod inference;
pub mod prompt;

use std::future::Future;

use thiserror::Error;

pub use client::OllamaClient;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("completion backend returned status {0}")]
    Status(u16),
    #[error("completion response could not be decoded: {0}")]
    Decode(String),
}

/// Capability boundary to the text-completion backend: one bounded-wait call
/// per prompt, no retry. The fallback policy on failure belongs to the
/// caller, not the gateway.
pub trait TextCompleter {
    fn complete(&self, prompt: &str)
        -> impl Future<Output = Result<String, GatewayError>> + Send;
}
