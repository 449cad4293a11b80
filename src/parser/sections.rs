// file: src/parser/sections.rs
// description: splits a topic body into canonical sections by exact heading text
// reference: internal document schema

use crate::extractor::patterns::{fence_closes, fence_open};
use crate::extractor::{ExampleExtractor, ExerciseExtractor};
use crate::models::ParsedSections;
use std::collections::BTreeMap;
use tracing::debug;

/// Canonical section of a topic. The accepted heading texts form the document
/// schema; changing them requires migrating existing content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SectionKind {
    Theory,
    Examples,
    Exercises,
    BestPractices,
    CommonMistakes,
    RealWorld,
    Summary,
}

impl SectionKind {
    pub const ALL: [SectionKind; 7] = [
        SectionKind::Theory,
        SectionKind::Examples,
        SectionKind::Exercises,
        SectionKind::BestPractices,
        SectionKind::CommonMistakes,
        SectionKind::RealWorld,
        SectionKind::Summary,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Theory => "theory",
            Self::Examples => "examples",
            Self::Exercises => "exercises",
            Self::BestPractices => "bestPractices",
            Self::CommonMistakes => "commonMistakes",
            Self::RealWorld => "realWorld",
            Self::Summary => "summary",
        }
    }

    pub fn headings(&self) -> &'static [&'static str] {
        match self {
            Self::Theory => &["Theory"],
            Self::Examples => &["Examples", "Code Examples"],
            Self::Exercises => &["Exercises", "Practice Exercises"],
            Self::BestPractices => &["Best Practices"],
            Self::CommonMistakes => &["Common Mistakes"],
            Self::RealWorld => &["Real-World Applications", "Real World"],
            Self::Summary => &["Summary"],
        }
    }

    pub fn from_heading(text: &str) -> Option<Self> {
        let text = text.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.headings().contains(&text))
    }
}

/// A heading line outside fenced code: level and text.
fn heading_of(line: &str) -> Option<(usize, &str)> {
    let trimmed = line.trim_end();
    let level = trimmed.chars().take_while(|&c| c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &trimmed[level..];
    if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
        return None;
    }
    Some((level, rest.trim().trim_end_matches('#').trim()))
}

/// Splits `text` on headings of exactly `level` (ignoring headings inside fences).
///
/// Returns the text before the first such heading and `(heading, content)` pairs.
/// A shallower heading closes the current part; text under it is dropped.
pub fn split_on_headings(text: &str, level: usize) -> (String, Vec<(String, String)>) {
    let mut preamble = String::new();
    let mut parts: Vec<(String, String)> = Vec::new();
    let mut current: Option<(String, String)> = None;
    let mut fence: Option<String> = None;

    for line in text.split_inclusive('\n') {
        if let Some(marker) = fence.as_deref() {
            if fence_closes(line, marker) {
                fence = None;
            }
        } else if let Some((marker, _)) = fence_open(line) {
            fence = Some(marker);
        } else if let Some((found, heading)) = heading_of(line) {
            if found == level {
                if let Some(part) = current.take() {
                    parts.push(part);
                }
                current = Some((heading.to_string(), String::new()));
                continue;
            }
            if found < level {
                if let Some(part) = current.take() {
                    parts.push(part);
                }
                continue;
            }
        }

        match current.as_mut() {
            Some((_, content)) => content.push_str(line),
            None if parts.is_empty() => preamble.push_str(line),
            None => {}
        }
    }

    if let Some(part) = current {
        parts.push(part);
    }

    (preamble, parts)
}

pub struct SectionExtractor {
    examples: ExampleExtractor,
    exercises: ExerciseExtractor,
}

impl SectionExtractor {
    pub fn new() -> Self {
        Self {
            examples: ExampleExtractor::new(),
            exercises: ExerciseExtractor::new(),
        }
    }

    /// Raw text of each recognized level-2 section. Repeated sections are concatenated.
    pub fn split(&self, body: &str) -> BTreeMap<SectionKind, String> {
        let (_, parts) = split_on_headings(body, 2);
        let mut sections: BTreeMap<SectionKind, String> = BTreeMap::new();

        for (heading, content) in parts {
            match SectionKind::from_heading(&heading) {
                Some(kind) => {
                    let entry = sections.entry(kind).or_default();
                    if !entry.is_empty() {
                        entry.push('\n');
                    }
                    entry.push_str(content.trim());
                }
                None => debug!("Ignoring unrecognized section heading `{}`", heading),
            }
        }

        sections
    }

    pub fn extract(&self, body: &str) -> ParsedSections {
        let mut split = self.split(body);
        let mut text = |kind: SectionKind| split.remove(&kind).filter(|t| !t.is_empty());

        let theory = text(SectionKind::Theory);
        let examples = text(SectionKind::Examples)
            .map(|t| self.examples.extract(&t))
            .unwrap_or_default();
        let exercises = text(SectionKind::Exercises)
            .map(|t| self.exercises.extract(&t))
            .unwrap_or_default();

        ParsedSections {
            theory,
            examples,
            exercises,
            best_practices: text(SectionKind::BestPractices),
            common_mistakes: text(SectionKind::CommonMistakes),
            real_world: text(SectionKind::RealWorld),
            summary: text(SectionKind::Summary),
        }
    }
}

impl Default for SectionExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = "# Variables\n\nIntro text.\n\n## Theory\n\nVariables hold values.\n\n### Zero values\n\nEvery type has one.\n\n## Examples\n\n### Example 1: Declaring\n\n```go\nvar x int\n```\n\nDeclares x.\n\n## Exercises\n\n### Exercise 1: Swap\n\nSwap two values.\n\n### Exercise 2: Sum\n\nSum a slice.\n\n## Further Reading\n\nIgnored.\n\n## Summary\n\nDone.\n";

    #[test]
    fn test_split_recognizes_only_canonical_headings() {
        let extractor = SectionExtractor::new();
        let split = extractor.split(BODY);

        assert_eq!(split.len(), 4);
        assert!(split[&SectionKind::Theory].contains("### Zero values"));
        assert!(!split.values().any(|t| t.contains("Ignored.")));
    }

    #[test]
    fn test_extract_structures_examples_and_exercises() {
        let sections = SectionExtractor::new().extract(BODY);

        assert_eq!(sections.examples.len(), 1);
        assert_eq!(sections.examples[0].title, "Declaring");
        assert_eq!(sections.examples[0].code, "var x int\n");
        assert_eq!(sections.exercises.len(), 2);
        assert_eq!(sections.exercises[1].number, 2);
        assert_eq!(sections.summary.as_deref(), Some("Done."));
        assert!(sections.best_practices.is_none());
    }

    #[test]
    fn test_no_exercise_matches_yields_empty_sequence() {
        let body = "## Exercises\n\nTry things on your own.\n\n### Bonus\n\nNo number here.\n";
        let sections = SectionExtractor::new().extract(body);
        assert!(sections.exercises.is_empty());
    }

    #[test]
    fn test_headings_inside_fences_do_not_split() {
        let body = "## Theory\n\n```markdown\n## Summary\n```\n\nStill theory.\n";
        let split = SectionExtractor::new().split(body);

        assert_eq!(split.len(), 1);
        assert!(split[&SectionKind::Theory].contains("Still theory."));
    }

    #[test]
    fn test_fence_with_info_string_does_not_close() {
        let body = "## Theory\n\n```\nraw\n```go\n## Summary\n```\n\nStill theory.\n";
        let split = SectionExtractor::new().split(body);

        assert_eq!(split.len(), 1);
        assert!(split[&SectionKind::Theory].contains("## Summary"));
        assert!(split[&SectionKind::Theory].contains("Still theory."));
    }

    #[test]
    fn test_heading_match_is_exact() {
        assert_eq!(SectionKind::from_heading("Best Practices"), Some(SectionKind::BestPractices));
        assert_eq!(SectionKind::from_heading("best practices"), None);
        assert_eq!(SectionKind::from_heading("Theory and Practice"), None);
    }

    #[test]
    fn test_split_on_headings_preamble() {
        let (preamble, parts) = split_on_headings("lead\n### A\na\n### B\nb\n", 3);
        assert_eq!(preamble, "lead\n");
        assert_eq!(
            parts,
            vec![
                ("A".to_string(), "a\n".to_string()),
                ("B".to_string(), "b\n".to_string())
            ]
        );
    }
}
