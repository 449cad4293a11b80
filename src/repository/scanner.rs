// file: src/repository/scanner.rs
// description: Directory walking and file discovery with suffix filtering
// reference: https://docs.rs/walkdir

use crate::error::{PipelineError, Result};
use crate::settings::Settings;
use crate::utils::Validator;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

pub const MARKDOWN: &[&str] = &[".md"];
pub const ASSETS: &[&str] = &[".go", ".json"];
pub const CONTENT: &[&str] = &[".md", ".go", ".json"];

pub struct FileScanner {
    skip_patterns: Vec<String>,
    max_file_size: u64,
}

#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub relative_path: String,
    pub size: u64,
}

impl FileScanner {
    pub fn new(skip_patterns: Vec<String>, max_file_size: u64) -> Self {
        Self {
            skip_patterns,
            max_file_size,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.skip_patterns.clone(), settings.max_file_size_bytes())
    }

    /// Lazily walks `root` depth-first in file-name order, yielding files whose
    /// name ends with one of `suffixes`.
    pub fn scan<'a>(
        &'a self,
        root: &'a Path,
        suffixes: &'a [&'a str],
    ) -> Result<impl Iterator<Item = ScannedFile> + 'a> {
        if !root.is_dir() {
            return Err(PipelineError::DirectoryNotFound(root.to_path_buf()));
        }

        debug!("Scanning directory: {}", root.display());

        let files = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    warn!("Skipping unreadable entry: {}", err);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter_map(move |entry| self.accept(root, entry.path(), suffixes));

        Ok(files)
    }

    pub fn scan_directory(&self, root: &Path, suffixes: &[&str]) -> Result<Vec<ScannedFile>> {
        let files: Vec<ScannedFile> = self.scan(root, suffixes)?.collect();
        info!("Found {} files under {}", files.len(), root.display());
        Ok(files)
    }

    fn accept(&self, root: &Path, path: &Path, suffixes: &[&str]) -> Option<ScannedFile> {
        let file_name = path.file_name()?.to_string_lossy();
        if !suffixes.iter().any(|suffix| file_name.ends_with(suffix)) {
            return None;
        }

        let relative_path = Validator::relative_path(path, root);

        if self.should_skip(&relative_path) {
            debug!("Skipping file: {}", relative_path);
            return None;
        }

        let size = path.metadata().map(|m| m.len()).unwrap_or(0);
        if size > self.max_file_size {
            warn!(
                "Skipping large file ({} MB): {}",
                size / 1024 / 1024,
                relative_path
            );
            return None;
        }

        Some(ScannedFile {
            path: path.to_path_buf(),
            relative_path,
            size,
        })
    }

    fn should_skip(&self, relative_path: &str) -> bool {
        for pattern in &self.skip_patterns {
            if let Some(suffix) = pattern.strip_prefix('*') {
                if relative_path.ends_with(suffix) {
                    return true;
                }
            } else if relative_path.contains(pattern.as_str()) {
                return true;
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn scanner(skip: &[&str]) -> FileScanner {
        FileScanner::new(skip.iter().map(|s| s.to_string()).collect(), 1024 * 1024)
    }

    #[test]
    fn test_scan_directory_filters_by_suffix() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("basics/01-intro")).unwrap();
        fs::write(temp.path().join("basics/index.md"), "# Basics").unwrap();
        fs::write(temp.path().join("basics/01-intro/README.md"), "# Intro").unwrap();
        fs::write(temp.path().join("basics/01-intro/main.go"), "package main").unwrap();
        fs::write(temp.path().join("basics/01-intro/notes.txt"), "x").unwrap();

        let files = scanner(&[]).scan_directory(temp.path(), MARKDOWN).unwrap();
        let paths: Vec<_> = files.iter().map(|f| f.relative_path.as_str()).collect();
        assert_eq!(paths, vec!["basics/01-intro/README.md", "basics/index.md"]);

        let files = scanner(&[]).scan_directory(temp.path(), CONTENT).unwrap();
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn test_scan_order_is_deterministic() {
        let temp = TempDir::new().unwrap();
        for name in ["b.md", "a.md", "c.md"] {
            fs::write(temp.path().join(name), "x").unwrap();
        }

        let first: Vec<_> = scanner(&[])
            .scan(temp.path(), MARKDOWN)
            .unwrap()
            .map(|f| f.relative_path)
            .collect();
        let second: Vec<_> = scanner(&[])
            .scan(temp.path(), MARKDOWN)
            .unwrap()
            .map(|f| f.relative_path)
            .collect();

        assert_eq!(first, vec!["a.md", "b.md", "c.md"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_root() {
        let temp = TempDir::new().unwrap();
        let result = scanner(&[]).scan_directory(&temp.path().join("absent"), MARKDOWN);
        assert!(matches!(result, Err(PipelineError::DirectoryNotFound(_))));
    }

    #[test]
    fn test_skip_patterns() {
        let scanner = scanner(&["*.bak.md", "drafts/"]);

        assert!(scanner.should_skip("basics/old.bak.md"));
        assert!(scanner.should_skip("drafts/idea.md"));
        assert!(!scanner.should_skip("basics/index.md"));
    }

    #[test]
    fn test_large_files_skipped() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("big.md"), "x".repeat(2048)).unwrap();

        let files = FileScanner::new(vec![], 1024)
            .scan_directory(temp.path(), MARKDOWN)
            .unwrap();
        assert!(files.is_empty());
    }
}
