// file: src/models/export.rs
// description: records written into the platform export package
// reference: internal data structures

use crate::config::QualityStandards;
use crate::models::{CategorySummary, TopicStats};
use crate::parser::frontmatter::FieldValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A node of rendered display content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayNode {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordered: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DisplayNode>,
}

impl DisplayNode {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    pub fn text(kind: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            text: Some(text.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedContent {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub theory: Vec<DisplayNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub best_practices: Vec<DisplayNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub common_mistakes: Vec<DisplayNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub real_world: Vec<DisplayNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub summary: Vec<DisplayNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedExample {
    pub title: String,
    /// Executable form of the snippet.
    pub code: String,
    pub original_code: String,
    /// Whether the snippet was executable as written.
    pub runnable: bool,
    pub explanation: Vec<DisplayNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_output: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseTest {
    pub name: String,
    pub kind: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedExercise {
    pub number: u32,
    pub title: String,
    pub content: Vec<DisplayNode>,
    #[serde(default)]
    pub hints: Vec<String>,
    pub tests: Vec<ExerciseTest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedTopic {
    pub id: String,
    pub slug: String,
    pub category: String,
    pub order: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<u32>,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, FieldValue>,
    pub content: RenderedContent,
    pub examples: Vec<ExportedExample>,
    pub exercises: Vec<ExportedExercise>,
    pub stats: TopicStats,
    #[serde(default)]
    pub assets: Vec<String>,
    pub source_hash: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEntry {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutocompleteEntry {
    pub term: String,
    pub topics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformMetadata {
    pub platform: String,
    pub package_name: String,
    pub package_version: String,
    pub default_language: String,
    pub languages: Vec<String>,
    pub code_language: String,
    pub total_modules: u32,
    pub quality: QualityStandards,
    pub categories: Vec<CategorySummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportCounts {
    pub topics: usize,
    pub categories: usize,
    pub examples: usize,
    pub exercises: usize,
    pub assets: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportReport {
    pub exported_at: String,
    pub counts: ExportCounts,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
    pub name: String,
    pub version: String,
    pub exported_at: String,
    /// Exported file count keyed by extension.
    pub files: BTreeMap<String, usize>,
    pub total_files: usize,
    pub checksum: String,
}
