// file: src/parser/frontmatter.rs
// description: YAML front matter extraction and serialization for markdown documents
// reference: https://docs.rs/yaml-rust

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;
use yaml_rust::yaml::Hash;
use yaml_rust::{Yaml, YamlEmitter, YamlLoader};

const DELIMITER: &str = "---";

pub struct FrontmatterParser;

/// A front matter value: a plain scalar or a list of strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Boolean(bool),
    Integer(i64),
    Decimal(f64),
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            Self::Text(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Vec<String> {
        match self {
            Self::List(items) => items.clone(),
            Self::Text(text) => text
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Scalar rendering used for reports and comparisons.
    pub fn display(&self) -> String {
        match self {
            Self::Boolean(value) => value.to_string(),
            Self::Integer(value) => value.to_string(),
            Self::Decimal(value) => value.to_string(),
            Self::Text(text) => text.clone(),
            Self::List(items) => items.join(", "),
        }
    }

    fn from_yaml(value: &Yaml) -> Option<Self> {
        match value {
            Yaml::String(text) => Some(Self::Text(text.clone())),
            Yaml::Integer(value) => Some(Self::Integer(*value)),
            Yaml::Real(text) => text.parse().ok().map(Self::Decimal),
            Yaml::Boolean(value) => Some(Self::Boolean(*value)),
            Yaml::Array(items) => Some(Self::List(
                items.iter().filter_map(scalar_to_string).collect(),
            )),
            _ => None,
        }
    }

    fn to_yaml(&self) -> Yaml {
        match self {
            Self::Boolean(value) => Yaml::Boolean(*value),
            Self::Integer(value) => Yaml::Integer(*value),
            Self::Decimal(value) => Yaml::Real(format_decimal(*value)),
            Self::Text(text) => Yaml::String(text.clone()),
            Self::List(items) => Yaml::Array(items.iter().cloned().map(Yaml::String).collect()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frontmatter {
    pub fields: BTreeMap<String, FieldValue>,
}

impl Frontmatter {
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Text value of `key`, with scalars rendered and blank strings treated as absent.
    pub fn text(&self, key: &str) -> Option<String> {
        self.fields
            .get(key)
            .map(FieldValue::display)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    pub fn has(&self, key: &str) -> bool {
        self.text(key).is_some()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) {
        self.fields.insert(key.into(), value);
    }
}

impl FrontmatterParser {
    pub fn new() -> Self {
        Self
    }

    /// Splits `content` into its front matter mapping and the remaining body.
    ///
    /// The content must open with a `---` line and contain a closing `---` line;
    /// anything else is reported as [`PipelineError::MissingFrontMatter`].
    pub fn extract(&self, content: &str, file: &str) -> Result<(Frontmatter, String)> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let Some(rest) = strip_delimiter_line(content) else {
            return Err(PipelineError::MissingFrontMatter(file.to_string()));
        };

        let mut offset = 0;
        let mut closing = None;
        for line in rest.split_inclusive('\n') {
            if line.trim_end() == DELIMITER {
                closing = Some((offset, offset + line.len()));
                break;
            }
            offset += line.len();
        }

        let Some((yaml_end, body_start)) = closing else {
            return Err(PipelineError::MissingFrontMatter(file.to_string()));
        };

        let yaml_content = &rest[..yaml_end];
        let body = rest[body_start..].to_string();

        let docs = YamlLoader::load_from_str(yaml_content).map_err(|e| {
            PipelineError::FrontMatterInvalid {
                file: file.to_string(),
                message: format!("YAML parse error: {}", e),
            }
        })?;

        let mut fields = BTreeMap::new();

        match docs.first() {
            None | Some(Yaml::Null) => {}
            Some(Yaml::Hash(hash)) => {
                for (key, value) in hash {
                    let Some(key) = scalar_to_string(key) else {
                        continue;
                    };
                    match FieldValue::from_yaml(value) {
                        Some(value) => {
                            fields.insert(key, value);
                        }
                        None => debug!("Ignoring unsupported front matter value for `{}`", key),
                    }
                }
            }
            Some(_) => {
                return Err(PipelineError::FrontMatterInvalid {
                    file: file.to_string(),
                    message: "front matter must be a mapping".to_string(),
                });
            }
        }

        Ok((Frontmatter { fields }, body))
    }

    /// Inverse of [`extract`](Self::extract): renders the mapping between delimiters followed by `body`.
    pub fn serialize(&self, frontmatter: &Frontmatter, body: &str) -> Result<String> {
        let mut hash = Hash::new();
        for (key, value) in &frontmatter.fields {
            hash.insert(Yaml::String(key.clone()), value.to_yaml());
        }

        let mut emitted = String::new();
        if !hash.is_empty() {
            let mut emitter = YamlEmitter::new(&mut emitted);
            emitter
                .dump(&Yaml::Hash(hash))
                .map_err(|e| PipelineError::Serialization(format!("{:?}", e)))?;
        }

        // The emitter opens the document with its own `---` line.
        let mapping = emitted
            .strip_prefix(DELIMITER)
            .unwrap_or(&emitted)
            .trim_start_matches('\n');

        let mut output = String::with_capacity(mapping.len() + body.len() + 8);
        output.push_str(DELIMITER);
        output.push('\n');
        if !mapping.is_empty() {
            output.push_str(mapping);
            output.push('\n');
        }
        output.push_str(DELIMITER);
        output.push('\n');
        output.push_str(body);
        Ok(output)
    }
}

impl Default for FrontmatterParser {
    fn default() -> Self {
        Self::new()
    }
}

fn strip_delimiter_line(content: &str) -> Option<&str> {
    let rest = content.strip_prefix(DELIMITER)?;
    let rest = rest.trim_start_matches([' ', '\t']);
    rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))
}

fn scalar_to_string(value: &Yaml) -> Option<String> {
    match value {
        Yaml::String(text) => Some(text.clone()),
        Yaml::Integer(value) => Some(value.to_string()),
        Yaml::Real(text) => Some(text.clone()),
        Yaml::Boolean(value) => Some(value.to_string()),
        _ => None,
    }
}

fn format_decimal(value: f64) -> String {
    let text = value.to_string();
    if text.contains('.') || text.contains('e') || !value.is_finite() {
        text
    } else {
        format!("{text}.0")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_frontmatter_extraction() {
        let parser = FrontmatterParser::new();
        let content = "---\ntitle: Test\nmodule: 3\ntags: [go, basics]\n---\n\n# Content";

        let (frontmatter, body) = parser.extract(content, "test.md").unwrap();
        assert_eq!(frontmatter.text("title"), Some("Test".to_string()));
        assert_eq!(frontmatter.get("module"), Some(&FieldValue::Integer(3)));
        assert_eq!(
            frontmatter.get("tags").unwrap().as_list(),
            vec!["go".to_string(), "basics".to_string()]
        );
        assert_eq!(body, "\n# Content");
    }

    #[test]
    fn test_missing_frontmatter() {
        let parser = FrontmatterParser::new();
        let err = parser.extract("# Just a heading", "test.md").unwrap_err();
        assert!(matches!(err, PipelineError::MissingFrontMatter(_)));
    }

    #[test]
    fn test_unterminated_frontmatter() {
        let parser = FrontmatterParser::new();
        let err = parser.extract("---\ntitle: Test\n# Body", "test.md").unwrap_err();
        assert!(matches!(err, PipelineError::MissingFrontMatter(_)));
    }

    #[test]
    fn test_delimiter_must_be_its_own_line() {
        let parser = FrontmatterParser::new();
        assert!(parser.extract("---title: x\n---\n", "test.md").is_err());
    }

    #[test]
    fn test_dashes_inside_body_are_kept() {
        let parser = FrontmatterParser::new();
        let content = "---\ntitle: T\n---\nintro\n---\nmore\n";
        let (_, body) = parser.extract(content, "test.md").unwrap();
        assert_eq!(body, "intro\n---\nmore\n");
    }

    #[test]
    fn test_round_trip() {
        let parser = FrontmatterParser::new();
        let mut frontmatter = Frontmatter::default();
        frontmatter.insert("title", FieldValue::Text("Variables & Types".to_string()));
        frontmatter.insert("module", FieldValue::Integer(4));
        frontmatter.insert("moduleLabel", FieldValue::Text("16".to_string()));
        frontmatter.insert("draft", FieldValue::Boolean(false));
        frontmatter.insert("estimatedHours", FieldValue::Decimal(1.5));
        frontmatter.insert(
            "tags",
            FieldValue::List(vec!["go".to_string(), "types".to_string()]),
        );
        let body = "# Variables\n\nSome text.\n";

        let serialized = parser.serialize(&frontmatter, body).unwrap();
        let (parsed, parsed_body) = parser.extract(&serialized, "roundtrip.md").unwrap();

        assert_eq!(parsed, frontmatter);
        assert_eq!(parsed_body, body);
    }

    #[test]
    fn test_empty_mapping_round_trip() {
        let parser = FrontmatterParser::new();
        let serialized = parser.serialize(&Frontmatter::default(), "body").unwrap();
        assert_eq!(serialized, "---\n---\nbody");

        let (parsed, body) = parser.extract(&serialized, "empty.md").unwrap();
        assert!(parsed.fields.is_empty());
        assert_eq!(body, "body");
    }
}
