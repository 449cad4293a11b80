// file: src/utils/template.rs
// description: content scaffolding templates with {placeholder} substitution
// reference: Internal content standards

use crate::error::{PipelineError, Result};
use crate::extractor::patterns::TEMPLATE_PLACEHOLDER;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;
use tracing::debug;

pub const TOPIC_TEMPLATE_FILE: &str = "topic.md";
pub const CATEGORY_INDEX_TEMPLATE_FILE: &str = "category-index.md";

const TOPIC_TEMPLATE: &str = r#"# {title}

{description}

## Theory

TODO: explain the core ideas behind {title}.

## Examples

### Example 1: Getting started

```go
package main

import "fmt"

func main() {
	fmt.Println("{title}")
}
```

TODO: walk through what the example does.

## Exercises

### Exercise 1: First steps

TODO: describe the task.

Hints:
- TODO

### Exercise 2: Going further

TODO: describe the task.

## Best Practices

## Common Mistakes

## Real-World Applications

## Summary
"#;

const CATEGORY_INDEX_TEMPLATE: &str = r#"# {title}

{description}

Modules {modules} · {difficulty} · about {hours} hours.
"#;

pub struct FileTemplate {
    template: String,
}

impl FileTemplate {
    pub fn new() -> Self {
        Self::topic()
    }

    pub fn with_custom_template(template: String) -> Self {
        Self { template }
    }

    pub fn topic() -> Self {
        Self::with_custom_template(TOPIC_TEMPLATE.to_string())
    }

    pub fn category_index() -> Self {
        Self::with_custom_template(CATEGORY_INDEX_TEMPLATE.to_string())
    }

    /// `name` from `template_dir` when present there, otherwise `fallback`.
    pub fn load(template_dir: Option<&Path>, name: &str, fallback: fn() -> Self) -> Result<Self> {
        let Some(path) = template_dir.map(|dir| dir.join(name)) else {
            return Ok(fallback());
        };

        if !path.is_file() {
            debug!("No custom template at {}, using built-in", path.display());
            return Ok(fallback());
        }

        let template = fs::read_to_string(&path).map_err(|e| {
            PipelineError::Template(format!("Cannot read template {}: {}", path.display(), e))
        })?;
        debug!("Using custom template {}", path.display());
        Ok(Self::with_custom_template(template))
    }

    pub fn placeholders(&self) -> BTreeSet<String> {
        TEMPLATE_PLACEHOLDER
            .captures_iter(&self.template)
            .map(|caps| caps[1].to_string())
            .collect()
    }

    /// Substitutes every `{key}`; any placeholder without a value is an error.
    pub fn render(&self, values: &HashMap<&str, String>) -> Result<String> {
        let missing: Vec<String> = self
            .placeholders()
            .into_iter()
            .filter(|key| !values.contains_key(key.as_str()))
            .collect();

        if !missing.is_empty() {
            return Err(PipelineError::Template(format!(
                "Unresolved placeholders: {}",
                missing
                    .iter()
                    .map(|key| format!("{{{}}}", key))
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }

        let rendered = TEMPLATE_PLACEHOLDER.replace_all(&self.template, |caps: &regex::Captures| {
            values
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        });

        Ok(rendered.into_owned())
    }
}

impl Default for FileTemplate {
    fn default() -> Self {
        Self::new()
    }
}
