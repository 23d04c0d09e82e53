pub mod email;
pub mod types;

pub use email::{truncate_body, Email};
pub use types::{Category, ClassificationOutcome, ResultSet, SourceKind};
