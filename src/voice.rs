use anyhow::{bail, Context, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::{config::VoiceConfig, domain::ClassificationOutcome};

/// Places a Vapi web call and feeds it the top Do-Now email for a spoken
/// summary. Strictly a consumer of classification results; failures are for
/// the caller to log, never to escalate.
pub struct VapiNotifier {
    http: Client,
    config: VoiceConfig,
}

impl VapiNotifier {
    pub fn new(http: Client, config: VoiceConfig) -> Self {
        Self { http, config }
    }

    pub async fn announce(&self, outcome: &ClassificationOutcome) -> Result<()> {
        let key = self
            .config
            .private_key
            .as_deref()
            .context("VAPI_PRIVATE_KEY must be configured for voice announcements")?;
        let assistant_id = self
            .config
            .assistant_id
            .as_deref()
            .context("VAPI_ASSISTANT_ID must be configured for voice announcements")?;

        let call = self.start_call(key, assistant_id).await?;
        let control_url = match call.monitor.and_then(|monitor| monitor.control_url) {
            Some(url) => url,
            None => self.control_url_for(key, &call.id).await?,
        };

        let email = &outcome.email;
        let content = format!(
            "Please summarize the following email. Read out the summary. \
             Sender: {}, Subject: {}, Body: {}.",
            email.sender, email.subject, email.body
        );

        let response = self
            .http
            .post(&control_url)
            .bearer_auth(key)
            .json(&json!({
                "type": "add-message",
                "message": { "role": "user", "content": content },
                "triggerResponseEnabled": true,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            bail!("control message rejected with status {}", response.status());
        }

        tracing::info!(target: "voice", call_id = %call.id, "announced top Do Now email");
        Ok(())
    }

    async fn start_call(&self, key: &str, assistant_id: &str) -> Result<CallResponse> {
        let response = self
            .http
            .post(self.endpoint("call"))
            .bearer_auth(key)
            .json(&json!({ "assistantId": assistant_id }))
            .send()
            .await?;

        if !response.status().is_success() {
            bail!("call creation rejected with status {}", response.status());
        }
        response.json().await.context("undecodable call response")
    }

    async fn control_url_for(&self, key: &str, call_id: &str) -> Result<String> {
        let response = self
            .http
            .get(self.endpoint(&format!("call/{call_id}")))
            .bearer_auth(key)
            .send()
            .await?;

        if !response.status().is_success() {
            bail!("call lookup rejected with status {}", response.status());
        }
        let call: CallResponse = response.json().await.context("undecodable call response")?;
        call.monitor
            .and_then(|monitor| monitor.control_url)
            .context("call has no control url")
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.api_base.as_str().trim_end_matches('/'),
            path
        )
    }
}

#[derive(Debug, Deserialize)]
struct CallResponse {
    id: String,
    #[serde(default)]
    monitor: Option<Monitor>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Monitor {
    control_url: Option<String>,
}
