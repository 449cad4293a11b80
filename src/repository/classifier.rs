// file: src/repository/classifier.rs
// description: file classification against the content tree layout
// reference: category/NN-topic directory convention

use crate::config::Config;
use crate::extractor::patterns::TOPIC_DIR;
use std::path::Path;

/// Numeric-prefixed topic directory name, e.g. `03-control-flow`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicDir {
    pub number: u32,
    pub slug: String,
}

impl TopicDir {
    pub fn parse(name: &str) -> Option<Self> {
        let caps = TOPIC_DIR.captures(name)?;
        Some(Self {
            number: caps[1].parse().ok()?,
            slug: caps[2].to_string(),
        })
    }

    /// Best-effort split for names outside the convention: any leading digits
    /// become the order, the remainder the slug.
    pub fn parse_lenient(name: &str) -> Self {
        if let Some(dir) = Self::parse(name) {
            return dir;
        }

        let digits: String = name.chars().take_while(char::is_ascii_digit).collect();
        let rest = name[digits.len()..].trim_start_matches(['-', '_', '.']);
        Self {
            number: digits.parse().unwrap_or(0),
            slug: if rest.is_empty() {
                name.to_string()
            } else {
                rest.to_lowercase().replace(['_', ' '], "-")
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileKind {
    CategoryIndex { category: String },
    TopicContent { category: String, topic_dir: String },
    Asset { category: String, topic_dir: String },
    Other,
}

pub struct FileClassifier {
    category_index_file: String,
    topic_file: String,
}

impl FileClassifier {
    pub fn new(category_index_file: impl Into<String>, topic_file: impl Into<String>) -> Self {
        Self {
            category_index_file: category_index_file.into(),
            topic_file: topic_file.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.structure.category_index_file.clone(),
            config.structure.topic_file.clone(),
        )
    }

    /// Classifies a path relative to the content root.
    pub fn classify(&self, relative: &Path) -> FileKind {
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().to_string())
            .collect();

        match parts.as_slice() {
            [category, file] if *file == self.category_index_file => FileKind::CategoryIndex {
                category: category.clone(),
            },
            [category, topic_dir, file] if *file == self.topic_file => FileKind::TopicContent {
                category: category.clone(),
                topic_dir: topic_dir.clone(),
            },
            [category, topic_dir, .., file] if is_asset(file) => FileKind::Asset {
                category: category.clone(),
                topic_dir: topic_dir.clone(),
            },
            _ => FileKind::Other,
        }
    }

    pub fn category_index_file(&self) -> &str {
        &self.category_index_file
    }

    pub fn topic_file(&self) -> &str {
        &self.topic_file
    }
}

fn is_asset(file: &str) -> bool {
    file.ends_with(".go") || file.ends_with(".json")
}

impl Default for FileClassifier {
    fn default() -> Self {
        Self::new("index.md", "README.md")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_dir_parsing() {
        assert_eq!(
            TopicDir::parse("03-control-flow"),
            Some(TopicDir {
                number: 3,
                slug: "control-flow".to_string()
            })
        );
        assert_eq!(TopicDir::parse("control-flow"), None);
        assert_eq!(TopicDir::parse("3-control-flow"), None);
    }

    #[test]
    fn test_lenient_parsing() {
        assert_eq!(
            TopicDir::parse_lenient("7_Pointers"),
            TopicDir {
                number: 7,
                slug: "pointers".to_string()
            }
        );
        assert_eq!(TopicDir::parse_lenient("misc").number, 0);
    }

    #[test]
    fn test_classification() {
        let classifier = FileClassifier::default();

        assert_eq!(
            classifier.classify(Path::new("basics/index.md")),
            FileKind::CategoryIndex {
                category: "basics".to_string()
            }
        );
        assert_eq!(
            classifier.classify(Path::new("basics/01-intro/README.md")),
            FileKind::TopicContent {
                category: "basics".to_string(),
                topic_dir: "01-intro".to_string()
            }
        );
        assert_eq!(
            classifier.classify(Path::new("basics/01-intro/examples/hello.go")),
            FileKind::Asset {
                category: "basics".to_string(),
                topic_dir: "01-intro".to_string()
            }
        );
        assert_eq!(classifier.classify(Path::new("README.md")), FileKind::Other);
        assert_eq!(
            classifier.classify(Path::new("basics/01-intro/notes.md")),
            FileKind::Other
        );
    }
}
