use futures::{stream, StreamExt};

use crate::{
    ai::{prompt::build_prompt, TextCompleter},
    domain::{ClassificationOutcome, Email, ResultSet},
};

use super::rules::RuleTable;

/// Raw text substituted when the gateway fails; the explicit IGNORE token
/// routes it into the Ignore bucket.
pub const GATEWAY_ERROR_RESPONSE: &str = "IGNORE - Error in classification";

pub struct BatchClassifier<C> {
    completer: C,
    rules: RuleTable,
    concurrency: usize,
}

impl<C: TextCompleter + Sync> BatchClassifier<C> {
    pub fn new(completer: C, rules: RuleTable, concurrency: usize) -> Self {
        Self {
            completer,
            rules,
            concurrency: concurrency.max(1),
        }
    }

    /// Classifies every email into exactly one bucket: N inputs in, N
    /// outcomes out, gateway failures included. The buffered stream yields
    /// in submission order, so bucket order equals input order at any
    /// concurrency level.
    pub async fn run(&self, emails: Vec<Email>) -> ResultSet {
        let total = emails.len();
        tracing::info!(target: "classify", total, "processing batch");

        let outcomes = stream::iter(emails)
            .map(|email| self.classify_one(email))
            .buffered(self.concurrency)
            .collect::<Vec<_>>()
            .await;

        let mut results = ResultSet::new();
        for outcome in outcomes {
            results.push(outcome);
        }
        debug_assert_eq!(results.total(), total);
        results
    }

    async fn classify_one(&self, email: Email) -> ClassificationOutcome {
        let prompt = build_prompt(&email);
        let raw_response = match self.completer.complete(&prompt).await {
            Ok(text) => text.trim().to_string(),
            Err(err) => {
                tracing::warn!(
                    target: "classify",
                    error = %err,
                    email_id = %email.id,
                    "gateway call failed; forcing Ignore"
                );
                GATEWAY_ERROR_RESPONSE.to_string()
            }
        };

        let category = self.rules.parse(&raw_response);
        tracing::debug!(
            target: "classify",
            email_id = %email.id,
            category = %category,
            "email classified"
        );

        ClassificationOutcome {
            category,
            raw_response,
            email,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, time::Duration};

    use tokio::time::sleep;

    use crate::{ai::GatewayError, domain::Category};

    use super::*;

    /// Scripted completer keyed on the email subject embedded in the
    /// prompt. Entries may carry a delay to exercise out-of-order
    /// completion.
    struct FakeCompleter {
        responses: HashMap<&'static str, (Result<String, &'static str>, Duration)>,
    }

    impl FakeCompleter {
        fn new() -> Self {
            Self {
                responses: HashMap::new(),
            }
        }

        fn respond(mut self, subject: &'static str, text: &str) -> Self {
            self.responses
                .insert(subject, (Ok(text.to_string()), Duration::ZERO));
            self
        }

        fn respond_after(mut self, subject: &'static str, text: &str, delay: Duration) -> Self {
            self.responses
                .insert(subject, (Ok(text.to_string()), delay));
            self
        }

        fn fail(mut self, subject: &'static str) -> Self {
            self.responses
                .insert(subject, (Err("backend unavailable"), Duration::ZERO));
            self
        }
    }

    impl TextCompleter for FakeCompleter {
        async fn complete(&self, prompt: &str) -> Result<String, GatewayError> {
            for (subject, (result, delay)) in &self.responses {
                if !prompt.contains(*subject) {
                    continue;
                }
                if !delay.is_zero() {
                    sleep(*delay).await;
                }
                return match result {
                    Ok(text) => Ok(text.clone()),
                    Err(_) => Err(GatewayError::Status(503)),
                };
            }
            panic!("no scripted response for prompt");
        }
    }

    fn email(id: &str, subject: &str) -> Email {
        Email {
            id: id.to_string(),
            subject: subject.to_string(),
            body: format!("body of {subject}"),
            sender: "someone@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn every_email_lands_in_exactly_one_bucket() {
        let completer = FakeCompleter::new()
            .respond("outage", "DO_NOW - production is down")
            .respond("roadmap", "SCHEDULE - quarterly planning")
            .respond("password reset", "DELEGATE - support can handle")
            .respond("newsletter", "IGNORE - promotional");
        let classifier = BatchClassifier::new(completer, RuleTable::default(), 1);

        let results = classifier
            .run(vec![
                email("1", "outage"),
                email("2", "roadmap"),
                email("3", "password reset"),
                email("4", "newsletter"),
            ])
            .await;

        assert_eq!(results.total(), 4);
        assert_eq!(results.bucket(Category::DoNow).len(), 1);
        assert_eq!(results.bucket(Category::Schedule).len(), 1);
        assert_eq!(results.bucket(Category::Delegate).len(), 1);
        assert_eq!(results.bucket(Category::Ignore).len(), 1);
    }

    #[tokio::test]
    async fn gateway_failure_is_isolated_to_one_email() {
        let completer = FakeCompleter::new()
            .respond("first", "SCHEDULE - later")
            .fail("second")
            .respond("third", "DO_NOW - immediately");
        let classifier = BatchClassifier::new(completer, RuleTable::default(), 1);

        let results = classifier
            .run(vec![
                email("1", "first"),
                email("2", "second"),
                email("3", "third"),
            ])
            .await;

        assert_eq!(results.total(), 3);
        let ignored = results.bucket(Category::Ignore);
        assert_eq!(ignored.len(), 1);
        assert_eq!(ignored[0].email.id, "2");
        assert_eq!(ignored[0].raw_response, GATEWAY_ERROR_RESPONSE);
        assert_eq!(results.bucket(Category::Schedule).len(), 1);
        assert_eq!(results.bucket(Category::DoNow).len(), 1);
    }

    #[tokio::test]
    async fn raw_response_is_stored_trimmed() {
        let completer = FakeCompleter::new().respond("padded", "  DO_NOW - jump on it  \n");
        let classifier = BatchClassifier::new(completer, RuleTable::default(), 1);

        let results = classifier.run(vec![email("1", "padded")]).await;
        let outcome = results.first_do_now().unwrap();
        assert_eq!(outcome.raw_response, "DO_NOW - jump on it");
    }

    #[tokio::test]
    async fn bucket_order_matches_input_order_under_concurrency() {
        // The slow first email finishes last, but the ordered buffer must
        // still yield it first.
        let completer = FakeCompleter::new()
            .respond_after("alpha", "SCHEDULE - a", Duration::from_millis(50))
            .respond("beta", "SCHEDULE - b")
            .respond("gamma", "SCHEDULE - c");
        let classifier = BatchClassifier::new(completer, RuleTable::default(), 3);

        let results = classifier
            .run(vec![
                email("1", "alpha"),
                email("2", "beta"),
                email("3", "gamma"),
            ])
            .await;

        let scheduled = results.bucket(Category::Schedule);
        let ids: Vec<&str> = scheduled.iter().map(|o| o.email.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn empty_batch_yields_empty_result_set() {
        let classifier =
            BatchClassifier::new(FakeCompleter::new(), RuleTable::default(), 1);
        let results = classifier.run(Vec::new()).await;
        assert_eq!(results.total(), 0);
        assert!(results.first_do_now().is_none());
    }
}
