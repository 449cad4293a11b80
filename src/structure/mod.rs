// file: src/structure/mod.rs
// description: content tree and export package validation, structure generation
// reference: internal module structure

pub mod generate;
mod package;
pub mod tree;

pub use generate::StructureGenerator;
pub use tree::{INDEX_FIELDS, StructureValidator};
