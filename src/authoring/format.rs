// file: src/authoring/format.rs
// description: normalizes markdown files in place or reports which would change

use crate::error::{PipelineError, Result};
use crate::parser::MarkdownNormalizer;
use crate::repository::scanner::{FileScanner, MARKDOWN};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

pub struct ContentFormatter {
    scanner: FileScanner,
    normalizer: MarkdownNormalizer,
}

impl ContentFormatter {
    pub fn new(scanner: FileScanner) -> Self {
        Self {
            scanner,
            normalizer: MarkdownNormalizer::new(),
        }
    }

    /// Relative paths of files whose normalized form differs. With `check`
    /// nothing is written.
    pub fn format_tree(&self, root: &Path, check: bool) -> Result<Vec<String>> {
        let mut changed = Vec::new();

        for file in self.scanner.scan(root, MARKDOWN)? {
            let original =
                fs::read_to_string(&file.path).map_err(|e| PipelineError::file(&file.path, e))?;
            let normalized = self.normalizer.normalize(&original);
            if normalized == original {
                continue;
            }

            debug!("{} needs formatting", file.relative_path);
            if !check {
                fs::write(&file.path, &normalized)
                    .map_err(|e| PipelineError::file(&file.path, e))?;
            }
            changed.push(file.relative_path);
        }

        info!(
            "{} file(s) {}",
            changed.len(),
            if check { "need formatting" } else { "formatted" }
        );
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn formatter() -> ContentFormatter {
        ContentFormatter::new(FileScanner::new(Vec::new(), 1024 * 1024))
    }

    #[test]
    fn test_check_reports_without_writing() {
        let temp = TempDir::new().unwrap();
        let messy = "---\ntitle: X\n---\n#Title\n\n\n\ntext   \n";
        fs::write(temp.path().join("a.md"), messy).unwrap();
        fs::write(temp.path().join("b.md"), "# Clean\n").unwrap();

        let changed = formatter().format_tree(temp.path(), true).unwrap();
        assert_eq!(changed, vec!["a.md".to_string()]);
        assert_eq!(fs::read_to_string(temp.path().join("a.md")).unwrap(), messy);
    }

    #[test]
    fn test_format_writes_and_is_stable() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.md"), "#Title\n\n\ntext   \n").unwrap();

        assert_eq!(formatter().format_tree(temp.path(), false).unwrap().len(), 1);
        assert_eq!(
            fs::read_to_string(temp.path().join("a.md")).unwrap(),
            "# Title\n\ntext\n"
        );
        assert!(formatter().format_tree(temp.path(), true).unwrap().is_empty());
    }
}
