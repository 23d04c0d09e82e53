/// Display length mail sources cut bodies down to before classification.
pub const BODY_PREVIEW_CHARS: usize = 500;
pub const CONTINUATION_MARKER: &str = "...";

#[derive(Debug, Clone)]
pub struct Email {
    pub id: String,
    pub subject: String,
    pub body: String,
    pub sender: String,
}

/// Trims and caps a plain-text body at [`BODY_PREVIEW_CHARS`] characters,
/// appending a continuation marker when anything was cut. Operates on char
/// boundaries, never byte offsets.
pub fn truncate_body(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(BODY_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}{}", &trimmed[..cut], CONTINUATION_MARKER),
        None => trimmed.to_string(),
    }
}
