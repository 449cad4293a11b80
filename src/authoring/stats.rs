// file: src/authoring/stats.rs
// description: per-category content statistics for authors

use crate::config::Config;
use crate::error::Result;
use crate::pipeline::{FileProcessor, ProcessingResult};
use crate::repository::scanner::{FileScanner, MARKDOWN};
use crate::settings::Settings;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub topics: usize,
    pub words: usize,
    pub examples: usize,
    pub exercises: usize,
    pub reading_minutes: usize,
}

impl CategoryStats {
    fn add(&mut self, other: &CategoryStats) {
        self.topics += other.topics;
        self.words += other.words;
        self.examples += other.examples;
        self.exercises += other.exercises;
        self.reading_minutes += other.reading_minutes;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentStats {
    /// Every configured category, including empty ones.
    pub categories: BTreeMap<String, CategoryStats>,
    /// Topic files that could not be processed.
    pub unreadable: Vec<String>,
}

impl ContentStats {
    pub fn collect(config: &Config, settings: &Settings) -> Result<Self> {
        let scanner = FileScanner::from_settings(settings);
        let processor = FileProcessor::new(config.clone(), settings.words_per_minute);
        let files = scanner.scan_directory(&settings.content_dir, MARKDOWN)?;

        let mut stats = Self {
            categories: config
                .categories
                .iter()
                .map(|c| (c.slug.clone(), CategoryStats::default()))
                .collect(),
            unreadable: Vec::new(),
        };

        for file in &files {
            match processor.process(file, &settings.content_dir) {
                Ok(ProcessingResult::Topic { topic, .. }) => {
                    let entry = stats.categories.entry(topic.category.clone()).or_default();
                    entry.topics += 1;
                    entry.words += topic.stats.word_count;
                    entry.examples += topic.stats.code_example_count;
                    entry.exercises += topic.stats.exercise_count;
                    entry.reading_minutes += topic.stats.reading_time_minutes;
                }
                Ok(_) => {}
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    debug!("Skipping {} in stats: {}", file.relative_path, err);
                    stats.unreadable.push(file.relative_path.clone());
                }
            }
        }

        Ok(stats)
    }

    pub fn totals(&self) -> CategoryStats {
        let mut totals = CategoryStats::default();
        for category in self.categories.values() {
            totals.add(category);
        }
        totals
    }
}
