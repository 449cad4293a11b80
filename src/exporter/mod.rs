// file: src/exporter/mod.rs
// description: export module exports
// reference: internal module structure

pub mod enrich;
pub mod json;
pub mod notify;
pub mod render;
pub mod search;

pub use enrich::{Enricher, wrap_snippet};
pub use json::{ExportOutcome, JsonExporter, REQUIRED_FILES};
pub use notify::ExportNotifier;
pub use render::MarkdownRenderer;
pub use search::SearchIndexer;
