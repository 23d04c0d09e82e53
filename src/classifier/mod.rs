pub mod batch;
pub mod rules;

pub use batch::BatchClassifier;
pub use rules::RuleTable;
