use base64::{
    engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD},
    Engine,
};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::{
    config::GmailConfig,
    domain::{truncate_body, Email},
};

use super::source::{MailSource, SourceError};

static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));

const MIME_PLAIN: &str = "text/plain";
const MIME_HTML: &str = "text/html";

pub struct GmailSource {
    http: Client,
    config: GmailConfig,
}

impl GmailSource {
    pub fn new(http: Client, config: GmailConfig) -> Self {
        Self { http, config }
    }

    fn token(&self) -> Result<&str, SourceError> {
        self.config
            .access_token
            .as_deref()
            .ok_or(SourceError::MissingToken)
    }

    fn endpoint(&self, path: &str) -> Result<Url, SourceError> {
        let raw = format!(
            "{}/{}",
            self.config.api_base.as_str().trim_end_matches('/'),
            path
        );
        Url::parse(&raw).map_err(|err| SourceError::Decode(err.to_string()))
    }

    async fn fetch_message(&self, id: &str) -> Result<Email, SourceError> {
        let response = self
            .http
            .get(self.endpoint(&format!("users/me/messages/{id}"))?)
            .bearer_auth(self.token()?)
            .query(&[("format", "full")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let detail: MessageDetail = response
            .json()
            .await
            .map_err(|err| SourceError::Decode(err.to_string()))?;
        Ok(build_email(id, &detail.payload))
    }
}

impl MailSource for GmailSource {
    async fn fetch(
        &self,
        max_count: usize,
        query: Option<&str>,
    ) -> Result<Vec<Email>, SourceError> {
        let mut request = self
            .http
            .get(self.endpoint("users/me/messages")?)
            .bearer_auth(self.token()?)
            .query(&[("maxResults", max_count.to_string())]);
        if let Some(q) = query {
            request = request.query(&[("q", q)]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let listing: MessageList = response
            .json()
            .await
            .map_err(|err| SourceError::Decode(err.to_string()))?;

        let summaries = listing.messages.unwrap_or_default();
        let mut emails = Vec::with_capacity(summaries.len());
        for summary in &summaries {
            emails.push(self.fetch_message(&summary.id).await?);
        }

        tracing::debug!(target: "gmail", count = emails.len(), "fetched messages");
        Ok(emails)
    }
}

fn build_email(id: &str, payload: &Payload) -> Email {
    let subject = header_value(&payload.headers, "Subject")
        .unwrap_or_else(|| "No Subject".to_string());
    let sender =
        header_value(&payload.headers, "From").unwrap_or_else(|| "Unknown Sender".to_string());
    Email {
        id: id.to_string(),
        subject,
        body: truncate_body(&extract_body(payload)),
        sender,
    }
}

fn header_value(headers: &[Header], name: &str) -> Option<String> {
    headers
        .iter()
        .find(|header| header.name.eq_ignore_ascii_case(name))
        .map(|header| header.value.clone())
}

/// Pulls a plain-text body out of the message payload. The first
/// `text/plain` part wins; `text/html` is kept as a fallback and stripped
/// of tags, as is a tagged single-part body.
fn extract_body(payload: &Payload) -> String {
    let mut body = String::new();

    if payload.parts.is_empty() {
        if payload.mime_type == MIME_PLAIN || payload.mime_type == MIME_HTML {
            if let Some(text) = payload.body.data.as_deref().and_then(decode_part) {
                body = text;
            }
        }
    } else {
        for part in &payload.parts {
            match part.mime_type.as_str() {
                MIME_PLAIN => {
                    if let Some(text) = part.body.data.as_deref().and_then(decode_part) {
                        body = text;
                        break;
                    }
                }
                MIME_HTML if body.is_empty() => {
                    if let Some(text) = part.body.data.as_deref().and_then(decode_part) {
                        body = text;
                    }
                }
                _ => {}
            }
        }
    }

    strip_tags(&body).trim().to_string()
}

fn decode_part(data: &str) -> Option<String> {
    let bytes = URL_SAFE
        .decode(data)
        .or_else(|_| URL_SAFE_NO_PAD.decode(data))
        .ok()?;
    String::from_utf8(bytes).ok()
}

fn strip_tags(text: &str) -> String {
    TAG_REGEX.replace_all(text, "").into_owned()
}

#[derive(Debug, Deserialize)]
struct MessageList {
    messages: Option<Vec<MessageSummary>>,
}

#[derive(Debug, Deserialize)]
struct MessageSummary {
    id: String,
}

#[derive(Debug, Deserialize)]
struct MessageDetail {
    payload: Payload,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Payload {
    #[serde(default)]
    headers: Vec<Header>,
    #[serde(default)]
    mime_type: String,
    #[serde(default)]
    body: PartBody,
    #[serde(default)]
    parts: Vec<Payload>,
}

#[derive(Debug, Deserialize)]
struct Header {
    name: String,
    value: String,
}

#[derive(Debug, Default, Deserialize)]
struct PartBody {
    data: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(text: &str) -> Option<String> {
        Some(URL_SAFE.encode(text.as_bytes()))
    }

    fn plain_part(text: &str) -> Payload {
        Payload {
            mime_type: MIME_PLAIN.to_string(),
            body: PartBody {
                data: encoded(text),
            },
            ..Default::default()
        }
    }

    fn html_part(html: &str) -> Payload {
        Payload {
            mime_type: MIME_HTML.to_string(),
            body: PartBody {
                data: encoded(html),
            },
            ..Default::default()
        }
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let headers = vec![Header {
            name: "subject".to_string(),
            value: "Weekly sync".to_string(),
        }];
        assert_eq!(
            header_value(&headers, "Subject"),
            Some("Weekly sync".to_string())
        );
        assert_eq!(header_value(&headers, "From"), None);
    }

    #[test]
    fn plain_part_wins_over_html() {
        let payload = Payload {
            parts: vec![html_part("<p>html body</p>"), plain_part("plain body")],
            ..Default::default()
        };
        assert_eq!(extract_body(&payload), "plain body");
    }

    #[test]
    fn html_fallback_is_stripped_of_tags() {
        let payload = Payload {
            parts: vec![html_part("<div>Hello <b>there</b></div>")],
            ..Default::default()
        };
        assert_eq!(extract_body(&payload), "Hello there");
    }

    #[test]
    fn single_part_body_decodes() {
        let payload = plain_part("  just text  ");
        assert_eq!(extract_body(&payload), "just text");
    }

    #[test]
    fn unpadded_base64url_decodes() {
        let raw = URL_SAFE_NO_PAD.encode("no padding here".as_bytes());
        assert_eq!(decode_part(&raw), Some("no padding here".to_string()));
    }

    #[test]
    fn missing_body_yields_empty_string() {
        let payload = Payload::default();
        assert_eq!(extract_body(&payload), "");
    }

    #[test]
    fn built_email_defaults_missing_headers() {
        let payload = plain_part("body");
        let email = build_email("abc", &payload);
        assert_eq!(email.id, "abc");
        assert_eq!(email.subject, "No Subject");
        assert_eq!(email.sender, "Unknown Sender");
        assert_eq!(email.body, "body");
    }
}
