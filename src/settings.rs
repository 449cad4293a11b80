// file: src/settings.rs
// description: runtime settings layered from an optional toml file and environment
// reference: https://docs.rs/config

use crate::error::{PipelineError, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub content_dir: PathBuf,
    pub build_dir: PathBuf,
    pub export_dir: PathBuf,
    pub course_config: PathBuf,
    pub author_profile: PathBuf,
    pub template_dir: Option<PathBuf>,
    pub skip_patterns: Vec<String>,
    pub max_file_size_mb: usize,
    pub words_per_minute: usize,
    pub package_name: String,
    pub package_version: String,
    pub notify_url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
            build_dir: PathBuf::from("build"),
            export_dir: PathBuf::from("godojo-export"),
            course_config: PathBuf::from("course.json"),
            author_profile: PathBuf::from(".godojo/author.json"),
            template_dir: None,
            skip_patterns: vec![
                ".git/".to_string(),
                "node_modules/".to_string(),
                "*.bak".to_string(),
            ],
            max_file_size_mb: 10,
            words_per_minute: 200,
            package_name: "godojo-go-course".to_string(),
            package_version: env!("CARGO_PKG_VERSION").to_string(),
            notify_url: None,
        }
    }
}

impl Settings {
    /// Layers `path` (if present) and `GODOJO_*` environment variables over the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = ::config::Config::builder();

        let file = path.unwrap_or_else(|| Path::new("godojo.toml"));
        builder = builder.add_source(::config::File::from(file).required(path.is_some()));

        builder = builder.add_source(
            ::config::Environment::with_prefix("GODOJO")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| PipelineError::Settings(e.to_string()))?;

        let settings: Settings = settings
            .try_deserialize()
            .map_err(|e| PipelineError::Settings(e.to_string()))?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.words_per_minute == 0 {
            return Err(PipelineError::Settings(
                "words_per_minute must be greater than 0".to_string(),
            ));
        }

        if self.max_file_size_mb == 0 {
            return Err(PipelineError::Settings(
                "max_file_size_mb must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        (self.max_file_size_mb as u64) * 1024 * 1024
    }
}
