// file: src/extractor/mod.rs
// description: structured record extraction module exports
// reference: internal module structure

pub mod examples;
pub mod exercises;
pub mod patterns;

pub use examples::ExampleExtractor;
pub use exercises::ExerciseExtractor;
