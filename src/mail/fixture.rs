use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::{truncate_body, Email};

use super::source::{MailSource, SourceError};

/// Static dataset of emails, one JSON array of records, used when Gmail is
/// disabled or unreachable.
pub struct FixtureSource {
    path: PathBuf,
}

impl FixtureSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl MailSource for FixtureSource {
    async fn fetch(
        &self,
        max_count: usize,
        _query: Option<&str>,
    ) -> Result<Vec<Email>, SourceError> {
        let bytes =
            tokio::fs::read(&self.path)
                .await
                .map_err(|source| SourceError::FixtureIo {
                    path: self.path.display().to_string(),
                    source,
                })?;
        let emails = decode_fixture(&bytes)?;
        Ok(emails.into_iter().take(max_count).collect())
    }
}

#[derive(Debug, Deserialize)]
struct FixtureRecord {
    subject: String,
    body: String,
    #[serde(default)]
    sender: Option<String>,
    #[serde(default)]
    id: Option<String>,
}

fn decode_fixture(bytes: &[u8]) -> Result<Vec<Email>, SourceError> {
    let records: Vec<FixtureRecord> =
        serde_json::from_slice(bytes).map_err(|err| SourceError::Decode(err.to_string()))?;

    Ok(records
        .into_iter()
        .enumerate()
        .map(|(index, record)| Email {
            id: record
                .id
                .unwrap_or_else(|| format!("fixture-{}", index + 1)),
            subject: record.subject,
            body: truncate_body(&record.body),
            sender: record
                .sender
                .unwrap_or_else(|| "Unknown Sender".to_string()),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use crate::domain::email::{BODY_PREVIEW_CHARS, CONTINUATION_MARKER};

    use super::*;

    #[test]
    fn records_map_to_emails_in_order() {
        let raw = br#"[
            {"subject": "One", "body": "first", "sender": "a@example.com", "id": "x1"},
            {"subject": "Two", "body": "second"}
        ]"#;
        let emails = decode_fixture(raw).unwrap();
        assert_eq!(emails.len(), 2);
        assert_eq!(emails[0].id, "x1");
        assert_eq!(emails[0].sender, "a@example.com");
        assert_eq!(emails[1].id, "fixture-2");
        assert_eq!(emails[1].sender, "Unknown Sender");
        assert_eq!(emails[1].subject, "Two");
    }

    #[test]
    fn long_fixture_bodies_are_truncated() {
        let body = "x".repeat(BODY_PREVIEW_CHARS + 50);
        let raw = format!(r#"[{{"subject": "Long", "body": "{body}"}}]"#);
        let emails = decode_fixture(raw.as_bytes()).unwrap();
        assert!(emails[0].body.ends_with(CONTINUATION_MARKER));
        assert_eq!(
            emails[0].body.chars().count(),
            BODY_PREVIEW_CHARS + CONTINUATION_MARKER.len()
        );
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let err = decode_fixture(b"not json").unwrap_err();
        assert!(matches!(err, SourceError::Decode(_)));
    }
}
