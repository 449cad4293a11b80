// file: src/authoring/mod.rs
// description: author-facing tools: workspace init, topic scaffolding, formatting and statistics
// reference: internal module structure

pub mod format;
pub mod profile;
pub mod scaffold;
pub mod stats;

pub use format::ContentFormatter;
pub use profile::{AuthorProfile, AuthorStats};
pub use scaffold::{InitOutcome, NewTopic, TopicScaffolder, init};
pub use stats::{CategoryStats, ContentStats};
