// file: src/models/topic.rs
// description: built topic and category records written by the content builder
// reference: internal data structures

use crate::parser::frontmatter::FieldValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeExample {
    pub title: String,
    pub code: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub number: u32,
    pub title: String,
    pub content: String,
}

/// Canonical sections of a topic body. Unrecognized sections are not represented.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedSections {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theory: Option<String>,
    pub examples: Vec<CodeExample>,
    pub exercises: Vec<Exercise>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_practices: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_mistakes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub real_world: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicStats {
    pub word_count: usize,
    pub code_example_count: usize,
    pub exercise_count: usize,
    pub reading_time_minutes: usize,
}

impl TopicStats {
    pub fn new(word_count: usize, sections: &ParsedSections, words_per_minute: usize) -> Self {
        let words_per_minute = words_per_minute.max(1);
        Self {
            word_count,
            code_example_count: sections.examples.len(),
            exercise_count: sections.exercises.len(),
            reading_time_minutes: word_count.div_ceil(words_per_minute).max(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuiltTopic {
    pub id: String,
    pub slug: String,
    pub category: String,
    pub order: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<u32>,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub metadata: BTreeMap<String, FieldValue>,
    pub source_path: String,
    pub source_hash: String,
    pub sections: ParsedSections,
    pub stats: TopicStats,
    #[serde(default)]
    pub assets: Vec<String>,
}

impl BuiltTopic {
    /// Output file stem: `<order>-<slug>`, matching the source directory name.
    pub fn file_stem(&self) -> String {
        format!("{:02}-{}", self.order, self.slug)
    }

    pub fn output_path(&self) -> String {
        format!("{}/{}.json", self.category, self.file_stem())
    }

    pub fn summary(&self) -> TopicSummary {
        TopicSummary {
            id: self.id.clone(),
            slug: self.slug.clone(),
            category: self.category.clone(),
            title: self.title.clone(),
            order: self.order,
            module: self.module,
            path: self.output_path(),
            stats: self.stats,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicSummary {
    pub id: String,
    pub slug: String,
    pub category: String,
    pub title: String,
    pub order: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<u32>,
    pub path: String,
    pub stats: TopicStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuiltCategory {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub modules: String,
    pub difficulty: String,
    pub estimated_hours: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    pub topics: Vec<TopicSummary>,
}

impl BuiltCategory {
    pub fn output_path(&self) -> String {
        format!("{}/category.yaml", self.slug)
    }

    pub fn summary(&self) -> CategorySummary {
        CategorySummary {
            slug: self.slug.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            modules: self.modules.clone(),
            difficulty: self.difficulty.clone(),
            estimated_hours: self.estimated_hours,
            topic_count: self.topics.len(),
            path: self.output_path(),
        }
    }
}

/// Entry of `categories-index.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub modules: String,
    pub difficulty: String,
    pub estimated_hours: f64,
    pub topic_count: usize,
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_time_rounds_up() {
        let sections = ParsedSections::default();
        assert_eq!(TopicStats::new(0, &sections, 200).reading_time_minutes, 1);
        assert_eq!(TopicStats::new(200, &sections, 200).reading_time_minutes, 1);
        assert_eq!(TopicStats::new(201, &sections, 200).reading_time_minutes, 2);
    }

    #[test]
    fn test_sections_serialize_with_canonical_keys() {
        let sections = ParsedSections {
            best_practices: Some("Use gofmt".to_string()),
            ..ParsedSections::default()
        };
        let json = serde_json::to_value(&sections).unwrap();
        assert_eq!(json["bestPractices"], "Use gofmt");
        assert!(json["examples"].as_array().unwrap().is_empty());
        assert!(json.get("theory").is_none());
    }
}
