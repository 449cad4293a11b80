// file: src/models/manifest.rs
// description: build manifest and index records regenerated on every run
// reference: internal data structures

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildTotals {
    pub categories: usize,
    pub topics: usize,
    pub failed: usize,
    pub words: usize,
    pub code_examples: usize,
    pub exercises: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub slug: String,
    pub topics: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedFile {
    pub path: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRevision {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    pub commit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildManifest {
    pub generated_at: String,
    pub generator: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceRevision>,
    pub totals: BuildTotals,
    pub categories: Vec<CategoryCount>,
    pub failures: Vec<FailedFile>,
}

impl BuildManifest {
    /// Field compared out of equality checks between runs.
    pub const TIMESTAMP_FIELD: &'static str = "generatedAt";
}
