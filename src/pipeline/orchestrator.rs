// file: src/pipeline/orchestrator.rs
// description: coordinates scanning, per-file processing and build output writing
// reference: best-effort batch build; per-file failures are recorded, not fatal

use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::models::{
    BuildManifest, BuildTotals, BuiltCategory, BuiltTopic, CategoryCount, CategorySummary,
    FailedFile, TopicSummary,
};
use crate::pipeline::processor::{CategoryIndex, FileProcessor, ProcessingResult};
use crate::pipeline::progress::{PipelineStats, ProgressTracker};
use crate::repository::scanner::{ASSETS, MARKDOWN};
use crate::repository::{FileClassifier, FileKind, FileScanner, RepositorySync};
use crate::settings::Settings;
use crate::utils::Validator;
use crate::utils::yaml::to_yaml_string;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const TOPICS_INDEX: &str = "topics-index.json";
pub const CATEGORIES_INDEX: &str = "categories-index.json";
pub const MANIFEST: &str = "manifest.json";

/// Everything one build produced, returned by value.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub topics: Vec<BuiltTopic>,
    pub categories: Vec<BuiltCategory>,
    pub manifest: BuildManifest,
    pub stats: PipelineStats,
}

impl BuildOutcome {
    pub fn failures(&self) -> &[FailedFile] {
        &self.manifest.failures
    }
}

pub struct ContentBuilder {
    config: Config,
    content_dir: PathBuf,
    build_dir: PathBuf,
    scanner: FileScanner,
    processor: FileProcessor,
    classifier: FileClassifier,
    show_progress: bool,
}

impl ContentBuilder {
    pub fn new(config: Config, settings: &Settings) -> Self {
        let processor = FileProcessor::new(config.clone(), settings.words_per_minute);
        let classifier = FileClassifier::from_config(&config);

        Self {
            config,
            content_dir: settings.content_dir.clone(),
            build_dir: settings.build_dir.clone(),
            scanner: FileScanner::from_settings(settings),
            processor,
            classifier,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    pub fn run(&self) -> Result<BuildOutcome> {
        info!(
            "Building {} into {}",
            self.content_dir.display(),
            self.build_dir.display()
        );

        let files = self.scanner.scan_directory(&self.content_dir, MARKDOWN)?;
        self.reset_build_dir()?;

        let progress = if self.show_progress {
            ProgressTracker::new(files.len())
        } else {
            ProgressTracker::hidden(files.len())
        };

        let mut topics = Vec::new();
        let mut source_dirs = BTreeMap::new();
        let mut topic_sources: BTreeMap<String, String> = BTreeMap::new();
        let mut indexes: BTreeMap<String, CategoryIndex> = BTreeMap::new();
        let mut failures = Vec::new();

        for file in &files {
            progress.set_message(format!("Processing {}", file.relative_path));

            match self.processor.process(file, &self.content_dir) {
                Ok(ProcessingResult::Topic { topic, source_dir }) => {
                    if let Some(first) = topic_sources.get(&topic.id) {
                        progress.inc_files_failed();
                        warn!("Duplicate topic {} in {}", topic.id, file.relative_path);
                        failures.push(FailedFile {
                            path: file.relative_path.clone(),
                            reason: format!(
                                "topic `{}` ({}) is already built from {}",
                                topic.id,
                                topic.output_path(),
                                first
                            ),
                        });
                        continue;
                    }
                    topic_sources.insert(topic.id.clone(), file.relative_path.clone());
                    progress.inc_files_processed();
                    progress.add_topic();
                    progress.add_bytes_processed(file.size);
                    source_dirs.insert(source_dir, topics.len());
                    topics.push(*topic);
                }
                Ok(ProcessingResult::CategoryIndex(index)) => {
                    progress.inc_files_processed();
                    progress.add_bytes_processed(file.size);
                    indexes.insert(index.category.clone(), index);
                }
                Ok(ProcessingResult::Skipped) => {}
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    progress.inc_files_failed();
                    warn!("Failed to process file {}: {}", file.relative_path, err);
                    failures.push(FailedFile {
                        path: file.relative_path.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        self.collect_assets(&mut topics, &source_dirs)?;

        topics.sort_by(|a, b| {
            (a.category.as_str(), a.order, a.slug.as_str()).cmp(&(
                b.category.as_str(),
                b.order,
                b.slug.as_str(),
            ))
        });

        for topic in &topics {
            self.write_json(&topic.output_path(), topic)?;
        }

        let categories = self.assemble_categories(&topics, &indexes);
        for category in &categories {
            self.write_yaml(&category.output_path(), category)?;
            progress.add_category();
        }

        let topic_index: Vec<TopicSummary> = topics.iter().map(BuiltTopic::summary).collect();
        self.write_json(TOPICS_INDEX, &topic_index)?;

        let category_index: Vec<CategorySummary> =
            categories.iter().map(BuiltCategory::summary).collect();
        self.write_json(CATEGORIES_INDEX, &category_index)?;

        let manifest = self.manifest(&topics, &categories, failures);
        self.write_json(MANIFEST, &manifest)?;

        let stats = progress.get_stats();
        progress.finish();
        self.log_final_stats(&stats, &manifest);

        Ok(BuildOutcome {
            topics,
            categories,
            manifest,
            stats,
        })
    }

    fn reset_build_dir(&self) -> Result<()> {
        Validator::validate_output_dir(&self.build_dir, &self.content_dir, "content directory")?;
        if self.build_dir.exists() {
            debug!("Removing previous build at {}", self.build_dir.display());
            fs::remove_dir_all(&self.build_dir)
                .map_err(|e| PipelineError::file(&self.build_dir, e))?;
        }
        fs::create_dir_all(&self.build_dir).map_err(|e| PipelineError::file(&self.build_dir, e))
    }

    /// Attaches `.go`/`.json` files under each built topic's directory and copies
    /// them into the build tree at the same relative path.
    fn collect_assets(
        &self,
        topics: &mut [BuiltTopic],
        source_dirs: &BTreeMap<String, usize>,
    ) -> Result<()> {
        for asset in self.scanner.scan(&self.content_dir, ASSETS)? {
            let FileKind::Asset {
                category,
                topic_dir,
            } = self.classifier.classify(Path::new(&asset.relative_path))
            else {
                continue;
            };

            let Some(&index) = source_dirs.get(&format!("{}/{}", category, topic_dir)) else {
                debug!("Asset without a built topic: {}", asset.relative_path);
                continue;
            };

            let target = self.build_dir.join(&asset.relative_path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| PipelineError::file(parent, e))?;
            }
            fs::copy(&asset.path, &target).map_err(|e| PipelineError::file(&asset.path, e))?;

            topics[index].assets.push(asset.relative_path);
        }

        Ok(())
    }

    fn assemble_categories(
        &self,
        topics: &[BuiltTopic],
        indexes: &BTreeMap<String, CategoryIndex>,
    ) -> Vec<BuiltCategory> {
        let language = &self.config.structure.default_language;

        self.config
            .categories
            .iter()
            .map(|category| {
                let index = indexes.get(&category.slug);
                if index.is_none() {
                    warn!("Category `{}` has no index file", category.slug);
                }

                BuiltCategory {
                    slug: category.slug.clone(),
                    title: index
                        .and_then(|i| i.title.clone())
                        .unwrap_or_else(|| category.title_localized.resolve(language).to_string()),
                    description: index
                        .and_then(|i| i.description.clone())
                        .unwrap_or_else(|| category.description.clone()),
                    modules: category.modules.to_string(),
                    difficulty: category.difficulty.as_str().to_string(),
                    estimated_hours: category.estimated_hours,
                    overview: index.and_then(|i| i.overview.clone()),
                    topics: topics
                        .iter()
                        .filter(|t| t.category == category.slug)
                        .map(BuiltTopic::summary)
                        .collect(),
                }
            })
            .collect()
    }

    fn manifest(
        &self,
        topics: &[BuiltTopic],
        categories: &[BuiltCategory],
        failures: Vec<FailedFile>,
    ) -> BuildManifest {
        let totals = BuildTotals {
            categories: categories.len(),
            topics: topics.len(),
            failed: failures.len(),
            words: topics.iter().map(|t| t.stats.word_count).sum(),
            code_examples: topics.iter().map(|t| t.stats.code_example_count).sum(),
            exercises: topics.iter().map(|t| t.stats.exercise_count).sum(),
        };

        BuildManifest {
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            generator: format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            source: RepositorySync::new(&self.content_dir).try_revision(),
            totals,
            categories: categories
                .iter()
                .map(|c| CategoryCount {
                    slug: c.slug.clone(),
                    topics: c.topics.len(),
                })
                .collect(),
            failures,
        }
    }

    fn write_json<T: Serialize>(&self, relative: &str, value: &T) -> Result<()> {
        let text = serde_json::to_string_pretty(value)?;
        self.write_file(relative, &(text + "\n"))
    }

    fn write_yaml<T: Serialize>(&self, relative: &str, value: &T) -> Result<()> {
        let text = to_yaml_string(value)?;
        self.write_file(relative, &text)
    }

    fn write_file(&self, relative: &str, text: &str) -> Result<()> {
        let path = self.build_dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| PipelineError::file(parent, e))?;
        }
        fs::write(&path, text).map_err(|e| PipelineError::file(&path, e))?;
        debug!("Wrote {}", path.display());
        Ok(())
    }

    fn log_final_stats(&self, stats: &PipelineStats, manifest: &BuildManifest) {
        info!("=== Build Summary ===");
        info!("Duration: {} seconds", stats.duration_secs);
        info!("Files processed: {}", stats.files_processed);
        info!("Files failed: {}", stats.files_failed);
        info!("Success rate: {:.2}%", stats.success_rate());
        info!("Topics built: {}", manifest.totals.topics);
        info!("Categories built: {}", manifest.totals.categories);
        info!("Words: {}", manifest.totals.words);
        info!(
            "Processing speed: {:.2} files/sec",
            stats.files_per_second()
        );
        info!("=====================");
    }
}
