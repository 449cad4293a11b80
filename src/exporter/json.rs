// file: src/exporter/json.rs
// description: assembles the platform package from build output
// reference: json export of built topics with search index and package manifest

use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::exporter::enrich::Enricher;
use crate::exporter::search::SearchIndexer;
use crate::models::{
    BuiltTopic, CategorySummary, ExportCounts, ExportReport, ExportedTopic, PackageManifest,
    PlatformMetadata, RenderedContent, TopicSummary,
};
use crate::pipeline::{CATEGORIES_INDEX, MANIFEST, ProgressTracker, TOPICS_INDEX};
use crate::settings::Settings;
use crate::utils::Validator;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

pub const PLATFORM_METADATA: &str = "metadata/platform.json";
pub const SEARCH_INDEX: &str = "search/index.json";
pub const AUTOCOMPLETE: &str = "search/autocomplete.json";
pub const PACKAGE_MANIFEST: &str = "package.json";
pub const EXPORT_REPORT: &str = "export-report.json";

/// Files every export package must contain.
pub const REQUIRED_FILES: [&str; 8] = [
    TOPICS_INDEX,
    CATEGORIES_INDEX,
    MANIFEST,
    PLATFORM_METADATA,
    SEARCH_INDEX,
    AUTOCOMPLETE,
    PACKAGE_MANIFEST,
    EXPORT_REPORT,
];

#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub report: ExportReport,
    pub package: PackageManifest,
}

pub struct JsonExporter {
    config: Config,
    content_dir: PathBuf,
    build_dir: PathBuf,
    output_dir: PathBuf,
    package_name: String,
    package_version: String,
    enricher: Enricher,
    show_progress: bool,
}

impl JsonExporter {
    pub fn new(config: Config, settings: &Settings) -> Self {
        Self {
            config,
            content_dir: settings.content_dir.clone(),
            build_dir: settings.build_dir.clone(),
            output_dir: settings.export_dir.clone(),
            package_name: settings.package_name.clone(),
            package_version: settings.package_version.clone(),
            enricher: Enricher::new(),
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    pub fn package_version(&self) -> &str {
        &self.package_version
    }

    pub fn export(&self) -> Result<ExportOutcome> {
        info!(
            "Exporting {} into {}",
            self.build_dir.display(),
            self.output_dir.display()
        );

        Validator::validate_directory(&self.build_dir)?;
        let index_path = self.build_dir.join(TOPICS_INDEX);
        if !index_path.is_file() {
            return Err(PipelineError::Validation(format!(
                "{} is missing; run `build` first",
                index_path.display()
            )));
        }

        let topic_index: Vec<TopicSummary> = self.read_build_json(TOPICS_INDEX)?;
        let category_index: Vec<CategorySummary> = self.read_build_json(CATEGORIES_INDEX)?;

        self.reset_output_dir()?;

        let exported_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let mut counts = ExportCounts::default();
        let mut warnings = Vec::new();
        let mut search = SearchIndexer::new();

        let progress = if self.show_progress {
            ProgressTracker::new(topic_index.len())
        } else {
            ProgressTracker::hidden(topic_index.len())
        };

        for summary in &topic_index {
            progress.set_message(format!("Exporting {}", summary.id));

            let topic: BuiltTopic = match self.read_build_json(&summary.path) {
                Ok(topic) => topic,
                Err(err) => {
                    progress.inc_files_failed();
                    warn!("Skipping topic {}: {}", summary.id, err);
                    warnings.push(format!("topic {} could not be read: {}", summary.id, err));
                    continue;
                }
            };

            if topic.sections.examples.is_empty() {
                warnings.push(format!("topic {} has no code examples", topic.id));
            }

            for asset in &topic.assets {
                match self.copy_from_build(asset) {
                    Ok(()) => counts.assets += 1,
                    Err(err) => {
                        warn!("Missing asset {}: {}", asset, err);
                        warnings.push(format!("topic {} is missing asset {}", topic.id, asset));
                    }
                }
            }

            let exported = self.enrich(&topic);
            counts.examples += exported.examples.len();
            counts.exercises += exported.exercises.len();
            self.write_json(&summary.path, &exported)?;

            search.add(&topic);
            counts.topics += 1;
            progress.inc_files_processed();
            progress.add_topic();
        }

        for category in &category_index {
            if let Err(err) = self.copy_from_build(&category.path) {
                warn!("Missing category file {}: {}", category.path, err);
                warnings.push(format!("category {} has no {}", category.slug, category.path));
                continue;
            }
            counts.categories += 1;
            progress.add_category();
        }

        for file in [TOPICS_INDEX, CATEGORIES_INDEX, MANIFEST] {
            if let Err(err) = self.copy_from_build(file) {
                warn!("Missing build file {}: {}", file, err);
                warnings.push(format!("build output has no {}", file));
            }
        }

        self.write_json(PLATFORM_METADATA, &self.platform_metadata(category_index))?;
        self.write_json(SEARCH_INDEX, &search.entries())?;
        self.write_json(AUTOCOMPLETE, &search.autocomplete())?;

        let report = ExportReport {
            exported_at: exported_at.clone(),
            counts,
            warnings,
        };
        self.write_json(EXPORT_REPORT, &report)?;

        let package = self.package_manifest(exported_at)?;
        self.write_json(PACKAGE_MANIFEST, &package)?;

        progress.finish();
        info!(
            "Exported {} topics, {} categories ({} warnings), checksum {}",
            report.counts.topics,
            report.counts.categories,
            report.warnings.len(),
            package.checksum
        );

        Ok(ExportOutcome { report, package })
    }

    pub fn enrich(&self, topic: &BuiltTopic) -> ExportedTopic {
        let renderer = self.enricher.renderer();
        let render = |text: &Option<String>| {
            text.as_deref()
                .map(|t| renderer.render(t))
                .unwrap_or_default()
        };
        let sections = &topic.sections;

        ExportedTopic {
            id: topic.id.clone(),
            slug: topic.slug.clone(),
            category: topic.category.clone(),
            order: topic.order,
            module: topic.module,
            title: topic.title.clone(),
            description: topic.description.clone(),
            difficulty: topic.difficulty.clone(),
            author_id: topic.author_id.clone(),
            language: topic.language.clone(),
            tags: topic.tags.clone(),
            metadata: topic.metadata.clone(),
            content: RenderedContent {
                theory: render(&sections.theory),
                best_practices: render(&sections.best_practices),
                common_mistakes: render(&sections.common_mistakes),
                real_world: render(&sections.real_world),
                summary: render(&sections.summary),
            },
            examples: sections
                .examples
                .iter()
                .map(|e| self.enricher.example(e))
                .collect(),
            exercises: sections
                .exercises
                .iter()
                .map(|e| self.enricher.exercise(e))
                .collect(),
            stats: topic.stats,
            assets: topic.assets.clone(),
            source_hash: topic.source_hash.clone(),
        }
    }

    fn platform_metadata(&self, categories: Vec<CategorySummary>) -> PlatformMetadata {
        let structure = &self.config.structure;
        PlatformMetadata {
            platform: "godojo".to_string(),
            package_name: self.package_name.clone(),
            package_version: self.package_version.clone(),
            default_language: structure.default_language.clone(),
            languages: structure.languages.clone(),
            code_language: structure.code_language.clone(),
            total_modules: self.config.total_modules(),
            quality: self.config.quality,
            categories,
        }
    }

    /// File counts per extension and a SHA-256 over every exported file
    /// (path and contents, in path order), excluding the package manifest itself.
    fn package_manifest(&self, exported_at: String) -> Result<PackageManifest> {
        let mut hasher = Sha256::new();
        let mut files: BTreeMap<String, usize> = BTreeMap::new();
        let mut total_files = 0;

        let mut paths: Vec<(String, PathBuf)> = WalkDir::new(&self.output_dir)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| {
                let relative = Validator::relative_path(entry.path(), &self.output_dir);
                (relative, entry.path().to_path_buf())
            })
            .filter(|(relative, _)| relative != PACKAGE_MANIFEST)
            .collect();
        paths.sort();

        for (relative, path) in &paths {
            let bytes = fs::read(path).map_err(|e| PipelineError::file(path, e))?;
            hasher.update(relative.as_bytes());
            hasher.update([0u8]);
            hasher.update(&bytes);
            hasher.update([0u8]);

            let extension = Path::new(relative)
                .extension()
                .map(|e| e.to_string_lossy().to_string())
                .unwrap_or_else(|| "other".to_string());
            *files.entry(extension).or_default() += 1;
            total_files += 1;
        }

        Ok(PackageManifest {
            name: self.package_name.clone(),
            version: self.package_version.clone(),
            exported_at,
            files,
            total_files,
            checksum: format!("sha256:{:x}", hasher.finalize()),
        })
    }

    fn reset_output_dir(&self) -> Result<()> {
        Validator::validate_output_dir(&self.output_dir, &self.build_dir, "build directory")?;
        Validator::validate_output_dir(&self.output_dir, &self.content_dir, "content directory")?;
        if self.output_dir.exists() {
            debug!("Removing previous export at {}", self.output_dir.display());
            fs::remove_dir_all(&self.output_dir)
                .map_err(|e| PipelineError::file(&self.output_dir, e))?;
        }
        fs::create_dir_all(&self.output_dir).map_err(|e| PipelineError::file(&self.output_dir, e))
    }

    fn read_build_json<T: DeserializeOwned>(&self, relative: &str) -> Result<T> {
        let path = self.build_dir.join(relative);
        let text = fs::read_to_string(&path).map_err(|e| PipelineError::file(&path, e))?;
        serde_json::from_str(&text)
            .map_err(|e| PipelineError::Serialization(format!("{}: {}", path.display(), e)))
    }

    fn copy_from_build(&self, relative: &str) -> Result<()> {
        let source = self.build_dir.join(relative);
        let target = self.output_dir.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| PipelineError::file(parent, e))?;
        }
        fs::copy(&source, &target).map_err(|e| PipelineError::file(&source, e))?;
        Ok(())
    }

    fn write_json<T: Serialize + ?Sized>(&self, relative: &str, value: &T) -> Result<()> {
        let path = self.output_dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| PipelineError::file(parent, e))?;
        }
        let text = serde_json::to_string_pretty(value)?;
        fs::write(&path, text + "\n").map_err(|e| PipelineError::file(&path, e))?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::patterns::is_runnable_go;
    use crate::models::ExportedTopic;
    use crate::pipeline::ContentBuilder;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const TOPIC: &str = "---\ntitle: Hello World\ndescription: First program\nauthorId: a1\ncategory: basics\ndifficulty: Beginner\nlanguage: en\nmodule: 1\ntags: [intro]\n---\n# Hello\n\n## Theory\n\nGo programs start in **main**.\n\n## Examples\n\n### Example 1: Print\n\n```go\nfmt.Println(\"hello\")\n```\n\nOutput:\n\n```output\nhello\n```\n\n## Exercises\n\n### Exercise 1: Greet\n\nPrint your name.\n\nHint: use fmt.Println\n";

    fn built_fixture() -> (TempDir, Settings) {
        let temp = TempDir::new().unwrap();
        let content = temp.path().join("content");
        fs::create_dir_all(content.join("basics/01-hello")).unwrap();
        fs::write(
            content.join("basics/index.md"),
            "---\ntitle: Basics\ndescription: Start\ncategory: basics\n---\n",
        )
        .unwrap();
        fs::write(content.join("basics/01-hello/README.md"), TOPIC).unwrap();
        fs::write(content.join("basics/01-hello/main.go"), "package main\n").unwrap();

        let settings = Settings {
            content_dir: content,
            build_dir: temp.path().join("build"),
            export_dir: temp.path().join("export"),
            ..Settings::default()
        };
        ContentBuilder::new(Config::default_config(), &settings)
            .run()
            .unwrap();
        (temp, settings)
    }

    #[test]
    fn test_export_writes_package() {
        let (_temp, settings) = built_fixture();
        let outcome = JsonExporter::new(Config::default_config(), &settings)
            .export()
            .unwrap();

        for file in REQUIRED_FILES {
            assert!(settings.export_dir.join(file).is_file(), "missing {file}");
        }
        assert!(settings.export_dir.join("basics/01-hello.json").is_file());
        assert!(settings.export_dir.join("basics/category.yaml").is_file());
        assert!(settings.export_dir.join("basics/01-hello/main.go").is_file());

        assert_eq!(outcome.report.counts.topics, 1);
        assert_eq!(outcome.report.counts.assets, 1);
        assert!(outcome.report.warnings.is_empty(), "{:?}", outcome.report.warnings);
        assert!(outcome.package.checksum.starts_with("sha256:"));
        assert_eq!(outcome.package.files.get("go"), Some(&1));
    }

    #[test]
    fn test_export_over_build_dir_is_rejected() {
        let (temp, mut settings) = built_fixture();

        settings.export_dir = settings.build_dir.clone();
        let result = JsonExporter::new(Config::default_config(), &settings).export();
        assert!(matches!(result, Err(PipelineError::Validation(_))));
        assert!(settings.build_dir.join(TOPICS_INDEX).is_file());

        settings.export_dir = temp.path().to_path_buf();
        let result = JsonExporter::new(Config::default_config(), &settings).export();
        assert!(matches!(result, Err(PipelineError::Validation(_))));
        assert!(settings.build_dir.join(TOPICS_INDEX).is_file());
        assert!(settings.content_dir.join("basics/01-hello/README.md").is_file());
    }

    #[test]
    fn test_exported_topic_is_enriched() {
        let (_temp, settings) = built_fixture();
        JsonExporter::new(Config::default_config(), &settings)
            .export()
            .unwrap();

        let text = fs::read_to_string(settings.export_dir.join("basics/01-hello.json")).unwrap();
        let topic: ExportedTopic = serde_json::from_str(&text).unwrap();

        let example = &topic.examples[0];
        assert!(!example.runnable);
        assert!(is_runnable_go(&example.code));
        assert_eq!(example.expected_output.as_deref(), Some("hello"));

        let exercise = &topic.exercises[0];
        assert_eq!(exercise.hints, vec!["use fmt.Println"]);
        assert_eq!(exercise.tests.len(), 3);

        assert_eq!(topic.content.theory[0].kind, "paragraph");
    }

    #[test]
    fn test_missing_asset_is_a_warning() {
        let (_temp, settings) = built_fixture();
        fs::remove_file(settings.build_dir.join("basics/01-hello/main.go")).unwrap();

        let outcome = JsonExporter::new(Config::default_config(), &settings)
            .export()
            .unwrap();

        assert_eq!(outcome.report.counts.assets, 0);
        assert!(outcome.report.warnings[0].contains("missing asset"));
    }

    #[test]
    fn test_missing_build_dir_is_fatal() {
        let temp = TempDir::new().unwrap();
        let settings = Settings {
            build_dir: temp.path().join("nothing"),
            export_dir: temp.path().join("export"),
            ..Settings::default()
        };

        let result = JsonExporter::new(Config::default_config(), &settings).export();
        assert!(matches!(result, Err(PipelineError::DirectoryNotFound(_))));
    }
}
