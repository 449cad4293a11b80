// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns

//! Content pipeline for the GoDojo Go course: quality checks, structure
//! validation, builds into JSON/YAML records and platform package export.

pub mod authoring;
pub mod config;
pub mod error;
pub mod exporter;
pub mod extractor;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod quality;
pub mod repository;
pub mod settings;
pub mod structure;
pub mod utils;

pub use authoring::{AuthorProfile, ContentFormatter, ContentStats, TopicScaffolder};
pub use config::{Category, Config, Difficulty, ModuleRange, QualityStandards};
pub use error::{PipelineError, Result};
pub use exporter::{ExportNotifier, ExportOutcome, JsonExporter};
pub use models::{BuiltTopic, Document, ExportedTopic, Finding, Report, Severity};
pub use parser::{
    Frontmatter, FrontmatterParser, MarkdownNormalizer, MarkdownParser, ParsedMarkdown,
    SectionExtractor,
};
pub use pipeline::{BuildOutcome, ContentBuilder, PipelineStats, ProgressTracker};
pub use quality::QualityChecker;
pub use repository::{FileClassifier, FileScanner, RepositorySync, ScannedFile};
pub use settings::Settings;
pub use structure::{StructureGenerator, StructureValidator};
pub use utils::{FileTemplate, OperationTimer, PerformanceMetrics, Validator};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let config = Config::default_config();
        let _template = FileTemplate::new();
        let _checker = QualityChecker::new(&config);
        let _validator = StructureValidator::new(config);
    }
}
