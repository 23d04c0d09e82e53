use crate::config::ClassifierConfig;
use crate::domain::Category;

pub const DEFAULT_URGENCY_KEYWORDS: [&str; 5] =
    ["urgent", "asap", "immediate", "emergency", "critical"];
pub const DEFAULT_IMPORTANCE_KEYWORDS: [&str; 5] =
    ["important", "strategic", "goal", "revenue", "customer"];

/// Explicit tokens the model is instructed to emit, checked in this order
/// with the first hit winning. DO_NOW must stay first: free-text answers
/// for it often contain the other category words too.
const TIER1_TOKENS: [(&str, Category); 5] = [
    ("DO_NOW", Category::DoNow),
    ("DO NOW", Category::DoNow),
    ("SCHEDULE", Category::Schedule),
    ("DELEGATE", Category::Delegate),
    ("IGNORE", Category::Ignore),
];

/// Two-stage parser from raw model text to a category: an explicit token
/// is trusted verbatim; otherwise urgency/importance keyword presence
/// decides, for responses that went off-template.
#[derive(Debug, Clone)]
pub struct RuleTable {
    urgency: Vec<String>,
    importance: Vec<String>,
}

impl RuleTable {
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            urgency: lowercased(&config.urgency_keywords),
            importance: lowercased(&config.importance_keywords),
        }
    }

    /// Total function: any input, including empty or non-English text,
    /// terminates in exactly one category.
    pub fn parse(&self, raw: &str) -> Category {
        let upper = raw.to_uppercase();
        for (token, category) in TIER1_TOKENS {
            if upper.contains(token) {
                return category;
            }
        }

        let lower = raw.to_lowercase();
        let has_urgent = self.urgency.iter().any(|kw| lower.contains(kw.as_str()));
        let has_important = self.importance.iter().any(|kw| lower.contains(kw.as_str()));
        match (has_urgent, has_important) {
            (true, true) => Category::DoNow,
            (false, true) => Category::Schedule,
            (true, false) => Category::Delegate,
            (false, false) => Category::Ignore,
        }
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self {
            urgency: lowercased_static(&DEFAULT_URGENCY_KEYWORDS),
            importance: lowercased_static(&DEFAULT_IMPORTANCE_KEYWORDS),
        }
    }
}

fn lowercased(keywords: &[String]) -> Vec<String> {
    keywords.iter().map(|kw| kw.to_lowercase()).collect()
}

fn lowercased_static(keywords: &[&str]) -> Vec<String> {
    keywords.iter().map(|kw| kw.to_lowercase()).collect()
}
