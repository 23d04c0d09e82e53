use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::domain::{Category, ClassificationOutcome, ResultSet, SourceKind};

const SUBJECT_CLIP: usize = 50;
const SENDER_CLIP: usize = 30;
const PREVIEW_CLIP: usize = 150;
const REASON_CLIP: usize = 80;

/// Plain-text rendering of one batch run, four fixed-order sections.
pub fn render_report(
    results: &ResultSet,
    source: SourceKind,
    tz: &Tz,
    now: DateTime<Utc>,
) -> String {
    let stamp = now.with_timezone(tz).format("%Y-%m-%d %H:%M:%S %Z");
    let mut out = format!(
        "Quadrant triage | {stamp} | source: {source} | {total} emails\n",
        total = results.total()
    );

    for category in Category::ALL {
        out.push_str(&format!(
            "\n## {} ({})\n",
            category.label(),
            category.quadrant()
        ));
        let bucket = results.bucket(category);
        if bucket.is_empty() {
            out.push_str("  (no emails in this category)\n");
            continue;
        }
        for (index, outcome) in bucket.iter().enumerate() {
            out.push_str(&format_entry(index + 1, outcome));
        }
    }
    out
}

fn format_entry(position: usize, outcome: &ClassificationOutcome) -> String {
    let email = &outcome.email;
    format!(
        "  {position}. {subject}\n     from: {sender}\n     preview: {preview}\n     reason: {reason}\n",
        subject = clip(&email.subject, SUBJECT_CLIP),
        sender = clip(&email.sender, SENDER_CLIP),
        preview = flatten(&clip(&email.body, PREVIEW_CLIP)),
        reason = reason_preview(&outcome.raw_response),
    )
}

/// The stated reason is whatever follows the first dash on the response's
/// first line; off-template responses fall back to a clipped raw prefix.
pub fn reason_preview(raw: &str) -> String {
    let first_line = raw.lines().next().unwrap_or("");
    match first_line.split_once('-') {
        Some((_, reason)) if !reason.trim().is_empty() => clip(reason.trim(), REASON_CLIP),
        _ => clip(first_line.trim(), REASON_CLIP),
    }
}

fn clip(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn flatten(text: &str) -> String {
    text.replace(['\n', '\r'], " ")
}
