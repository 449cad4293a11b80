// file: src/repository/mod.rs
// description: content tree operations module exports
// reference: Internal module structure

pub mod classifier;
pub mod scanner;
pub mod sync;

pub use classifier::{FileClassifier, FileKind, TopicDir};
pub use scanner::{FileScanner, ScannedFile};
pub use sync::RepositorySync;
