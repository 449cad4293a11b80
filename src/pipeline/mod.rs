// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

mod orchestrator;
mod processor;
mod progress;

pub use orchestrator::{BuildOutcome, CATEGORIES_INDEX, ContentBuilder, MANIFEST, TOPICS_INDEX};
pub use processor::{CategoryIndex, FileProcessor, ProcessingResult};
pub use progress::{PipelineStats, ProgressTracker};
