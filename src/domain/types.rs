use std::fmt;

use crate::domain::email::Email;

/// One quadrant of the Eisenhower matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    DoNow,
    Schedule,
    Delegate,
    Ignore,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::DoNow,
        Category::Schedule,
        Category::Delegate,
        Category::Ignore,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::DoNow => "Do Now",
            Category::Schedule => "Schedule",
            Category::Delegate => "Delegate",
            Category::Ignore => "Ignore",
        }
    }

    pub fn quadrant(self) -> &'static str {
        match self {
            Category::DoNow => "Urgent + Important",
            Category::Schedule => "Important, Not Urgent",
            Category::Delegate => "Urgent, Not Important",
            Category::Ignore => "Not Urgent, Not Important",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Final verdict for one email. `raw_response` keeps the model's full answer
/// (trimmed) so the report can surface the stated reason.
#[derive(Debug, Clone)]
pub struct ClassificationOutcome {
    pub category: Category,
    pub raw_response: String,
    pub email: Email,
}

/// Per-category buckets in processing order. Rebuilt from scratch on every
/// run; holds exactly one outcome per input email.
#[derive(Debug, Default)]
pub struct ResultSet {
    do_now: Vec<ClassificationOutcome>,
    schedule: Vec<ClassificationOutcome>,
    delegate: Vec<ClassificationOutcome>,
    ignore: Vec<ClassificationOutcome>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, outcome: ClassificationOutcome) {
        match outcome.category {
            Category::DoNow => self.do_now.push(outcome),
            Category::Schedule => self.schedule.push(outcome),
            Category::Delegate => self.delegate.push(outcome),
            Category::Ignore => self.ignore.push(outcome),
        }
    }

    pub fn bucket(&self, category: Category) -> &[ClassificationOutcome] {
        match category {
            Category::DoNow => &self.do_now,
            Category::Schedule => &self.schedule,
            Category::Delegate => &self.delegate,
            Category::Ignore => &self.ignore,
        }
    }

    pub fn total(&self) -> usize {
        Category::ALL
            .iter()
            .map(|category| self.bucket(*category).len())
            .sum()
    }

    /// The designated candidate for downstream announcement.
    pub fn first_do_now(&self) -> Option<&ClassificationOutcome> {
        self.do_now.first()
    }
}

/// Which adapter actually produced the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Gmail,
    Fixture,
    FixtureFallback,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceKind::Gmail => "Gmail",
            SourceKind::Fixture => "fixture",
            SourceKind::FixtureFallback => "fixture (Gmail fallback)",
        };
        f.write_str(name)
    }
}
