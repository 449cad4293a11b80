// file: src/extractor/examples.rs
// description: code example extraction from the examples section
// reference: fenced-block decomposition of level-3 subsections

use crate::extractor::patterns::{EXAMPLE_TITLE, Segment, split_fenced};
use crate::models::CodeExample;
use crate::parser::sections::split_on_headings;
use tracing::debug;

const OUTPUT_LANGUAGES: [&str; 3] = ["output", "text", "bash"];

pub struct ExampleExtractor;

impl ExampleExtractor {
    pub fn new() -> Self {
        Self
    }

    /// One example per level-3 subsection that holds a fenced block. The first
    /// block becomes `code`; everything else is the explanation.
    pub fn extract(&self, section: &str) -> Vec<CodeExample> {
        let (_, parts) = split_on_headings(section, 3);

        parts
            .into_iter()
            .filter_map(|(heading, content)| {
                let example = self.parse_subsection(&heading, &content);
                if example.is_none() {
                    debug!("Example subsection `{}` has no code block", heading);
                }
                example
            })
            .collect()
    }

    fn parse_subsection(&self, heading: &str, content: &str) -> Option<CodeExample> {
        let segments = split_fenced(content);
        let code_index = segments
            .iter()
            .position(|s| matches!(s, Segment::Fence { .. }))?;

        let code = match &segments[code_index] {
            Segment::Fence { code, .. } => code.clone(),
            Segment::Prose(_) => return None,
        };

        let explanation: String = segments
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != code_index)
            .map(|(_, segment)| segment.raw())
            .collect();

        Some(CodeExample {
            title: example_title(heading),
            code,
            explanation: explanation.trim().to_string(),
        })
    }

    /// Content of the last fenced block labeled `output`, `text` or `bash`.
    pub fn expected_output(&self, explanation: &str) -> Option<String> {
        split_fenced(explanation)
            .into_iter()
            .rev()
            .find_map(|segment| match segment {
                Segment::Fence {
                    language: Some(language),
                    code,
                    ..
                } if OUTPUT_LANGUAGES.contains(&language.to_ascii_lowercase().as_str()) => {
                    Some(code.trim_end().to_string())
                }
                _ => None,
            })
    }
}

impl Default for ExampleExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn example_title(heading: &str) -> String {
    EXAMPLE_TITLE
        .captures(heading)
        .map(|caps| caps[1].trim().to_string())
        .unwrap_or_else(|| heading.trim().to_string())
}
