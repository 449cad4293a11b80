// file: src/extractor/exercises.rs
// description: exercise extraction and hint collection
// reference: "Exercise N: Title" subsections of the exercises section

use crate::extractor::patterns::{BULLET_ITEM, EXERCISE_TITLE, HINT_MARKER, strip_fenced};
use crate::models::Exercise;
use crate::parser::sections::split_on_headings;

pub struct ExerciseExtractor;

impl ExerciseExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Level-3 subsections titled `Exercise N: Title`; other subsections are skipped.
    pub fn extract(&self, section: &str) -> Vec<Exercise> {
        let (_, parts) = split_on_headings(section, 3);

        parts
            .into_iter()
            .filter_map(|(heading, content)| {
                let caps = EXERCISE_TITLE.captures(&heading)?;
                let number = caps[1].parse().ok()?;
                Some(Exercise {
                    number,
                    title: caps[2].to_string(),
                    content: content.trim().to_string(),
                })
            })
            .collect()
    }

    /// Bullet lines after a `Hint:`/`Hints:` marker, or the marker line's own text.
    pub fn hints(&self, content: &str) -> Vec<String> {
        let prose = strip_fenced(content);
        let mut hints = Vec::new();
        let mut collecting = false;

        for line in prose.lines() {
            if let Some(caps) = HINT_MARKER.captures(line) {
                let inline = caps[1].trim();
                if !inline.is_empty() {
                    hints.push(inline.to_string());
                }
                collecting = true;
                continue;
            }

            if !collecting {
                continue;
            }

            if line.trim().is_empty() {
                continue;
            }

            match BULLET_ITEM.captures(line) {
                Some(caps) => hints.push(caps[1].to_string()),
                None => collecting = false,
            }
        }

        hints
    }
}

impl Default for ExerciseExtractor {
    fn default() -> Self {
        Self::new()
    }
}
