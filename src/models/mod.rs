// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod document;
pub mod export;
pub mod finding;
pub mod manifest;
pub mod topic;

pub use document::Document;
pub use export::{
    AutocompleteEntry, DisplayNode, ExerciseTest, ExportCounts, ExportReport, ExportedExample,
    ExportedExercise, ExportedTopic, PackageManifest, PlatformMetadata, RenderedContent,
    SearchEntry,
};
pub use finding::{Finding, Report, Severity};
pub use manifest::{BuildManifest, BuildTotals, CategoryCount, FailedFile, SourceRevision};
pub use topic::{
    BuiltCategory, BuiltTopic, CategorySummary, CodeExample, Exercise, ParsedSections,
    TopicStats, TopicSummary,
};
