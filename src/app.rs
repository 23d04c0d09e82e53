use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use chrono_tz::Tz;
use reqwest::Client;

use crate::{
    ai::OllamaClient,
    classifier::{BatchClassifier, RuleTable},
    config::AppConfig,
    infrastructure::{directories::ResolvedPaths, shutdown::ShutdownListener},
    mail::{self, FixtureSource, GmailSource},
    report::render_report,
    voice::VapiNotifier,
};

pub struct QuadrantApp {
    config: Arc<AppConfig>,
    gmail: Option<GmailSource>,
    fixture: FixtureSource,
    classifier: BatchClassifier<OllamaClient>,
    voice: Option<VapiNotifier>,
}

impl QuadrantApp {
    pub fn initialize(config: AppConfig, paths: ResolvedPaths) -> Result<Self> {
        let config = Arc::new(config);

        let http = Client::builder()
            .user_agent(format!("quadrant-mail/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        let completer = OllamaClient::new(http.clone(), config.ollama.clone())?;
        let classifier = BatchClassifier::new(
            completer,
            RuleTable::new(&config.classifier),
            config.classifier.concurrency,
        );

        let gmail = (config.source.use_gmail && config.source.gmail.access_token.is_some())
            .then(|| GmailSource::new(http.clone(), config.source.gmail.clone()));
        if config.source.use_gmail && gmail.is_none() {
            tracing::warn!(
                target: "mail",
                "Gmail enabled but no access token configured; using fixture dataset"
            );
        }
        let fixture = FixtureSource::new(&paths.fixture_path);

        let voice = config
            .voice
            .enabled()
            .then(|| VapiNotifier::new(http, config.voice.clone()));

        Ok(Self {
            config,
            gmail,
            fixture,
            classifier,
            voice,
        })
    }

    /// One triage run, raced against the stop signal. A signal between
    /// operations abandons the run; a finished run reports before exit.
    pub async fn run(self, mut shutdown: ShutdownListener) -> Result<()> {
        tokio::select! {
            result = self.triage() => result,
            _ = shutdown.notified() => {
                tracing::info!("shutdown signal received; abandoning triage run");
                Ok(())
            }
        }
    }

    async fn triage(&self) -> Result<()> {
        let (emails, source) = mail::load_with_fallback(
            self.gmail.as_ref(),
            &self.fixture,
            self.config.source.max_emails,
            self.config.source.query.as_deref(),
        )
        .await
        .context("no mail source could produce emails")?;

        tracing::info!(target: "mail", count = emails.len(), source = %source, "emails loaded");

        let results = self.classifier.run(emails).await;

        let tz: Tz = self.config.timezone.parse().unwrap_or(chrono_tz::UTC);
        let report = render_report(&results, source, &tz, Utc::now());
        println!("{report}");

        if let Some(voice) = &self.voice {
            match results.first_do_now() {
                Some(top) => {
                    if let Err(err) = voice.announce(top).await {
                        tracing::warn!(target: "voice", error = %err, "voice announcement failed");
                    }
                }
                None => {
                    tracing::debug!(target: "voice", "no Do Now outcome; skipping announcement")
                }
            }
        }

        Ok(())
    }
}
