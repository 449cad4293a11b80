// file: src/config.rs
// description: course configuration loading with itemized schema validation
// reference: https://docs.rs/serde_json

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Immutable course configuration: categories, quality thresholds and language settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub structure: StructureConfig,
    pub categories: Vec<Category>,
    pub quality: QualityStandards,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureConfig {
    pub default_language: String,
    pub languages: Vec<String>,
    #[serde(default = "default_code_language")]
    pub code_language: String,
    #[serde(default = "default_category_index_file")]
    pub category_index_file: String,
    #[serde(default = "default_topic_file")]
    pub topic_file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_modules: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Category {
    pub slug: String,
    pub title_localized: LocalizedText,
    pub description: String,
    pub modules: ModuleRange,
    pub difficulty: Difficulty,
    pub estimated_hours: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityStandards {
    pub min_words: usize,
    pub min_code_examples: usize,
    pub min_exercises: usize,
}

/// A title given either as one string or per language.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum LocalizedText {
    Plain(String),
    ByLanguage(BTreeMap<String, String>),
}

impl LocalizedText {
    pub fn resolve(&self, language: &str) -> &str {
        match self {
            Self::Plain(text) => text,
            Self::ByLanguage(map) => map
                .get(language)
                .or_else(|| map.values().next())
                .map(String::as_str)
                .unwrap_or(""),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub enum Difficulty {
    #[serde(alias = "beginner")]
    Beginner,
    #[serde(alias = "intermediate")]
    Intermediate,
    #[serde(alias = "advanced")]
    Advanced,
    #[serde(alias = "expert")]
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
        Difficulty::Expert,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.as_str().eq_ignore_ascii_case(value.trim()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::Expert => "Expert",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive module range written as `"start-end"` in the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModuleRange {
    pub start: u32,
    pub end: u32,
}

impl ModuleRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, module: u32) -> bool {
        (self.start..=self.end).contains(&module)
    }

    pub fn overlaps(&self, other: &ModuleRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl TryFrom<String> for ModuleRange {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        let trimmed = value.trim();
        let (start, end) = match trimmed.split_once('-') {
            Some((start, end)) => (start.trim(), end.trim()),
            None => (trimmed, trimmed),
        };

        let start: u32 = start
            .parse()
            .map_err(|_| format!("invalid module range `{value}`"))?;
        let end: u32 = end
            .parse()
            .map_err(|_| format!("invalid module range `{value}`"))?;

        if start == 0 || start > end {
            return Err(format!("module range `{value}` must satisfy 1 <= start <= end"));
        }

        Ok(Self { start, end })
    }
}

impl From<ModuleRange> for String {
    fn from(range: ModuleRange) -> Self {
        range.to_string()
    }
}

impl fmt::Display for ModuleRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

fn default_code_language() -> String {
    "go".to_string()
}

fn default_category_index_file() -> String {
    "index.md".to_string()
}

fn default_topic_file() -> String {
    "README.md".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(PipelineError::ConfigNotFound(path.to_path_buf()));
        }

        let text = fs::read_to_string(path).map_err(|e| PipelineError::file(path, e))?;
        Self::from_json_str(&text, path)
    }

    pub fn from_json_str(text: &str, path: &Path) -> Result<Self> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| PipelineError::ConfigInvalidJson {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let errors = shape_errors(&value);
        if !errors.is_empty() {
            return Err(PipelineError::ConfigSchemaInvalid {
                path: path.to_path_buf(),
                errors,
            });
        }

        let config: Config =
            serde_json::from_value(value).map_err(|e| PipelineError::ConfigSchemaInvalid {
                path: path.to_path_buf(),
                errors: vec![e.to_string()],
            })?;

        let errors = config.semantic_errors();
        if !errors.is_empty() {
            return Err(PipelineError::ConfigSchemaInvalid {
                path: path.to_path_buf(),
                errors,
            });
        }

        for (left, right) in config.overlapping_ranges() {
            warn!(
                "Categories `{}` and `{}` declare overlapping module ranges",
                left, right
            );
        }

        debug!(
            "Loaded configuration with {} categories",
            config.categories.len()
        );
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            structure: StructureConfig {
                default_language: "en".to_string(),
                languages: vec!["en".to_string()],
                code_language: default_code_language(),
                category_index_file: default_category_index_file(),
                topic_file: default_topic_file(),
                total_modules: None,
            },
            categories: vec![Category {
                slug: "basics".to_string(),
                title_localized: LocalizedText::Plain("Go Basics".to_string()),
                description: "Syntax, types and control flow".to_string(),
                modules: ModuleRange::new(1, 15),
                difficulty: Difficulty::Beginner,
                estimated_hours: 20.0,
            }],
            quality: QualityStandards {
                min_words: 500,
                min_code_examples: 3,
                min_exercises: 2,
            },
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn category(&self, slug: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.slug == slug)
    }

    pub fn slugs(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.slug.as_str()).collect()
    }

    /// Highest valid module number: explicit `totalModules` or the largest range end.
    pub fn total_modules(&self) -> u32 {
        self.structure.total_modules.unwrap_or_else(|| {
            self.categories
                .iter()
                .map(|c| c.modules.end)
                .max()
                .unwrap_or(0)
        })
    }

    pub fn overlapping_ranges(&self) -> Vec<(String, String)> {
        let mut overlaps = Vec::new();
        for (i, left) in self.categories.iter().enumerate() {
            for right in &self.categories[i + 1..] {
                if left.modules.overlaps(&right.modules) {
                    overlaps.push((left.slug.clone(), right.slug.clone()));
                }
            }
        }
        overlaps
    }

    fn semantic_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for (index, category) in self.categories.iter().enumerate() {
            if category.slug.trim().is_empty() {
                errors.push(format!("categories[{index}].slug must not be empty"));
            } else if !seen.insert(category.slug.as_str()) {
                errors.push(format!(
                    "categories[{index}].slug `{}` is not unique",
                    category.slug
                ));
            }

            if !(category.estimated_hours > 0.0) {
                errors.push(format!(
                    "categories[{index}].estimatedHours must be a positive number"
                ));
            }
        }

        if !self
            .structure
            .languages
            .iter()
            .any(|l| l == &self.structure.default_language)
        {
            errors.push(format!(
                "structure.defaultLanguage `{}` is not listed in structure.languages",
                self.structure.default_language
            ));
        }

        errors
    }
}

fn shape_errors(value: &Value) -> Vec<String> {
    let mut errors = Vec::new();

    let Some(root) = value.as_object() else {
        errors.push("configuration root must be a JSON object".to_string());
        return errors;
    };

    match root.get("structure") {
        None => errors.push("missing required section `structure`".to_string()),
        Some(Value::Object(structure)) => {
            if !structure.get("defaultLanguage").is_some_and(Value::is_string) {
                errors.push("structure.defaultLanguage must be a string".to_string());
            }
            match structure.get("languages") {
                Some(Value::Array(items)) if items.iter().all(Value::is_string) => {}
                _ => errors.push("structure.languages must be an array of strings".to_string()),
            }
        }
        Some(_) => errors.push("`structure` must be an object".to_string()),
    }

    match root.get("categories") {
        None => errors.push("missing required section `categories`".to_string()),
        Some(Value::Array(categories)) => {
            for (index, category) in categories.iter().enumerate() {
                errors.extend(category_shape_errors(index, category));
            }
        }
        Some(_) => errors.push("`categories` must be an array".to_string()),
    }

    match root.get("quality") {
        None => errors.push("missing required section `quality`".to_string()),
        Some(Value::Object(quality)) => {
            for key in ["minWords", "minCodeExamples", "minExercises"] {
                if !quality.get(key).is_some_and(Value::is_u64) {
                    errors.push(format!("quality.{key} must be a non-negative integer"));
                }
            }
        }
        Some(_) => errors.push("`quality` must be an object".to_string()),
    }

    errors
}

fn category_shape_errors(index: usize, category: &Value) -> Vec<String> {
    let Some(fields) = category.as_object() else {
        return vec![format!("categories[{index}] must be an object")];
    };

    let mut errors = Vec::new();
    for key in ["slug", "description", "modules", "difficulty"] {
        if !fields.get(key).is_some_and(Value::is_string) {
            errors.push(format!("categories[{index}].{key} must be a string"));
        }
    }

    if !fields
        .get("titleLocalized")
        .is_some_and(|v| v.is_string() || v.is_object())
    {
        errors.push(format!(
            "categories[{index}].titleLocalized must be a string or a language map"
        ));
    }

    if !fields.get("estimatedHours").is_some_and(Value::is_number) {
        errors.push(format!("categories[{index}].estimatedHours must be a number"));
    }

    errors
}
