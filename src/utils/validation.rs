// file: src/utils/validation.rs
// description: path, url and naming validation helpers
// reference: input validation patterns

use crate::error::{PipelineError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::path::{Path, PathBuf};
use url::Url;

lazy_static! {
    static ref KEBAB_SLUG: Regex =
        Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("KEBAB_SLUG regex is valid");
}

pub struct Validator;

impl Validator {
    pub fn validate_directory(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(PipelineError::DirectoryNotFound(path.to_path_buf()));
        }

        if !path.is_dir() {
            return Err(PipelineError::Validation(format!(
                "Path is not a directory: {}",
                path.display()
            )));
        }

        Ok(())
    }

    /// Rejects an output directory that equals or contains `protected`, since
    /// outputs are wiped before every run.
    pub fn validate_output_dir(output: &Path, protected: &Path, role: &str) -> Result<()> {
        let output_resolved = Self::resolve_path(output);
        let protected_resolved = Self::resolve_path(protected);

        if protected_resolved.starts_with(&output_resolved) {
            return Err(PipelineError::Validation(format!(
                "Output directory {} would overwrite the {} at {}",
                output.display(),
                role,
                protected.display()
            )));
        }

        Ok(())
    }

    /// Absolute form of `path` with symlinks resolved through its deepest
    /// existing ancestor. Components that do not exist yet are appended as-is.
    pub fn resolve_path(path: &Path) -> PathBuf {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|dir| dir.join(path))
                .unwrap_or_else(|_| path.to_path_buf())
        };

        let mut existing = absolute.as_path();
        let mut missing = Vec::new();
        loop {
            if let Ok(canonical) = existing.canonicalize() {
                return missing
                    .iter()
                    .rev()
                    .fold(canonical, |acc: PathBuf, part| acc.join(part));
            }
            match (existing.parent(), existing.file_name()) {
                (Some(parent), Some(name)) => {
                    missing.push(name.to_os_string());
                    existing = parent;
                }
                _ => return absolute,
            }
        }
    }

    pub fn validate_content_not_empty(content: &str) -> Result<()> {
        if content.trim().is_empty() {
            return Err(PipelineError::Validation("Content is empty".to_string()));
        }
        Ok(())
    }

    /// Absolute URL with a scheme; http(s) URLs must also name a host.
    pub fn validate_url(url: &str) -> Result<()> {
        let parsed = Url::parse(url)
            .map_err(|e| PipelineError::Validation(format!("Invalid URL {}: {}", url, e)))?;

        if matches!(parsed.scheme(), "http" | "https")
            && parsed.host_str().is_none_or(str::is_empty)
        {
            return Err(PipelineError::Validation(format!(
                "URL has no host: {}",
                url
            )));
        }

        Ok(())
    }

    pub fn validate_slug(slug: &str) -> Result<()> {
        if !KEBAB_SLUG.is_match(slug) {
            return Err(PipelineError::Validation(format!(
                "`{}` is not a lowercase kebab-case slug",
                slug
            )));
        }
        Ok(())
    }

    /// Lowercase kebab-case form of free text: `"Hello, World!"` becomes `hello-world`.
    pub fn slugify(text: &str) -> String {
        text.to_lowercase()
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }

    /// `path` relative to `root` with forward slashes.
    pub fn relative_path(path: &Path, root: &Path) -> String {
        Self::sanitize_file_path(&path.strip_prefix(root).unwrap_or(path).to_string_lossy())
    }

    pub fn sanitize_file_path(path: &str) -> String {
        path.replace('\\', "/")
            .replace("//", "/")
            .trim()
            .to_string()
    }
}
