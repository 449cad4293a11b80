// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Configuration file {path} is not valid JSON: {message}")]
    ConfigInvalidJson { path: PathBuf, message: String },

    #[error("Configuration file {path} violates the schema:\n{}", format_items(.errors))]
    ConfigSchemaInvalid { path: PathBuf, errors: Vec<String> },

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Missing front matter in {0}")]
    MissingFrontMatter(String),

    #[error("Invalid front matter in {file}: {message}")]
    FrontMatterInvalid { file: String, message: String },

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Git error: {0}")]
    Git(String),

    #[error("Notification failed: {0}")]
    Notify(String),
}

impl PipelineError {
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileOperation {
            path: path.into(),
            source,
        }
    }

    /// Configuration and schema errors abort a whole invocation.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ConfigNotFound(_)
                | Self::ConfigInvalidJson { .. }
                | Self::ConfigSchemaInvalid { .. }
                | Self::Settings(_)
                | Self::DirectoryNotFound(_)
        )
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

fn format_items(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("  - {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}
