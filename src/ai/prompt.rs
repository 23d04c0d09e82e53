use crate::domain::Email;

/// Renders the fixed classification instructions around one email. Pure
/// function of its input; the body arrives pre-truncated from the mail
/// source and is embedded verbatim.
pub fn build_prompt(email: &Email) -> String {
    format!(
        r#"Classify this email using the Eisenhower Matrix. Respond with EXACTLY one of these categories:

DO_NOW - Urgent and Important (Quadrant 1)
SCHEDULE - Important but Not Urgent (Quadrant 2)
DELEGATE - Urgent but Not Important (Quadrant 3)
IGNORE - Not Urgent and Not Important (Quadrant 4)

Email:
Subject: "{subject}"
Body: "{body}"

Consider:
- Urgency: Does this need immediate attention (within hours/today)?
- Importance: Does this directly impact business goals, customer satisfaction, or critical operations?

Respond with only the category (DO_NOW, SCHEDULE, DELEGATE, or IGNORE) followed by a brief reason.

Category: "#,
        subject = email.subject,
        body = email.body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_email() -> Email {
        Email {
            id: "m-1".to_string(),
            subject: "Server down in production".to_string(),
            body: "The checkout service has been failing since 09:00.".to_string(),
            sender: "ops@example.com".to_string(),
        }
    }

    #[test]
    fn prompt_embeds_subject_and_body_verbatim() {
        let email = sample_email();
        let prompt = build_prompt(&email);
        assert!(prompt.contains(&email.subject));
        assert!(prompt.contains(&email.body));
    }

    #[test]
    fn prompt_lists_all_four_categories() {
        let prompt = build_prompt(&sample_email());
        for token in ["DO_NOW", "SCHEDULE", "DELEGATE", "IGNORE"] {
            assert!(prompt.contains(token), "missing token {token}");
        }
    }

    #[test]
    fn prompt_is_deterministic() {
        let email = sample_email();
        assert_eq!(build_prompt(&email), build_prompt(&email));
    }

    #[test]
    fn empty_fields_still_yield_a_valid_prompt() {
        let email = Email {
            id: String::new(),
            subject: String::new(),
            body: String::new(),
            sender: String::new(),
        };
        let prompt = build_prompt(&email);
        assert!(prompt.contains("Subject: \"\""));
        assert!(prompt.contains("Body: \"\""));
    }
}
