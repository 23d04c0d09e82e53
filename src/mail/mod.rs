pub mod fixture;
pub mod gmail;
pub mod source;

pub use fixture::FixtureSource;
pub use gmail::GmailSource;
pub use source::{MailSource, SourceError};

use crate::domain::{Email, SourceKind};

/// Prefers Gmail when configured, degrading to the fixture dataset on
/// failure or an empty inbox. Both sources failing aborts the run.
pub async fn load_with_fallback(
    gmail: Option<&GmailSource>,
    fixture: &FixtureSource,
    max_count: usize,
    query: Option<&str>,
) -> Result<(Vec<Email>, SourceKind), SourceError> {
    let Some(gmail) = gmail else {
        let emails = fixture.fetch(max_count, None).await?;
        return Ok((emails, SourceKind::Fixture));
    };

    match gmail.fetch(max_count, query).await {
        Ok(emails) if !emails.is_empty() => Ok((emails, SourceKind::Gmail)),
        Ok(_) => {
            tracing::info!(target: "mail", "Gmail returned no messages; using fixture dataset");
            let emails = fixture.fetch(max_count, None).await?;
            Ok((emails, SourceKind::FixtureFallback))
        }
        Err(err) => {
            tracing::warn!(
                target: "mail",
                error = %err,
                "Gmail fetch failed; falling back to fixture dataset"
            );
            let emails = fixture.fetch(max_count, None).await?;
            Ok((emails, SourceKind::FixtureFallback))
        }
    }
}
