use std::future::Future;

use thiserror::Error;

use crate::domain::Email;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("mail source request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("mail source returned status {0}")]
    Status(u16),
    #[error("no Gmail access token configured")]
    MissingToken,
    #[error("mail source payload could not be decoded: {0}")]
    Decode(String),
    #[error("failed to read fixture {path}: {source}")]
    FixtureIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A provider of ready-to-classify emails: plain-text bodies, already
/// stripped of markup and truncated, capped at `max_count`.
pub trait MailSource {
    fn fetch(
        &self,
        max_count: usize,
        query: Option<&str>,
    ) -> impl Future<Output = Result<Vec<Email>, SourceError>> + Send;
}
