// file: src/utils/yaml.rs
// description: serde values to yaml documents through yaml-rust
// reference: https://docs.rs/yaml-rust

use crate::error::{PipelineError, Result};
use serde::Serialize;
use serde_json::Value;
use yaml_rust::yaml::Hash;
use yaml_rust::{Yaml, YamlEmitter, YamlLoader};

/// Serializes any serde value as a YAML document with sorted map keys.
pub fn to_yaml_string<T: Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_value(value)?;
    let yaml = json_to_yaml(&json);

    let mut out = String::new();
    YamlEmitter::new(&mut out)
        .dump(&yaml)
        .map_err(|e| PipelineError::Serialization(format!("YAML emit failed: {:?}", e)))?;
    out.push('\n');
    Ok(out)
}

pub fn parse_yaml(text: &str) -> Result<Yaml> {
    let mut docs = YamlLoader::load_from_str(text)
        .map_err(|e| PipelineError::Serialization(format!("Invalid YAML: {}", e)))?;
    if docs.is_empty() {
        return Ok(Yaml::Null);
    }
    Ok(docs.swap_remove(0))
}

fn json_to_yaml(value: &Value) -> Yaml {
    match value {
        Value::Null => Yaml::Null,
        Value::Bool(b) => Yaml::Boolean(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Yaml::Integer(i),
            None => Yaml::Real(format!("{:?}", n.as_f64().unwrap_or_default())),
        },
        Value::String(s) => Yaml::String(s.clone()),
        Value::Array(items) => Yaml::Array(items.iter().map(json_to_yaml).collect()),
        Value::Object(map) => {
            let mut hash = Hash::new();
            for (key, item) in map {
                hash.insert(Yaml::String(key.clone()), json_to_yaml(item));
            }
            Yaml::Hash(hash)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_yaml_round_trip_through_loader() {
        let value = json!({
            "slug": "basics",
            "estimatedHours": 20.5,
            "topics": [{"order": 1, "title": "Intro: Hello"}],
        });

        let text = to_yaml_string(&value).unwrap();
        let parsed = parse_yaml(&text).unwrap();

        assert_eq!(parsed["slug"].as_str(), Some("basics"));
        assert_eq!(parsed["estimatedHours"].as_f64(), Some(20.5));
        assert_eq!(parsed["topics"][0]["title"].as_str(), Some("Intro: Hello"));
        assert_eq!(parsed["topics"][0]["order"].as_i64(), Some(1));
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(parse_yaml("key: [unclosed").is_err());
    }
}
