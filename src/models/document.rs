// file: src/models/document.rs
// description: source document model: front matter plus body of one content file
// reference: internal data structures

use crate::error::{PipelineError, Result};
use crate::parser::frontmatter::{Frontmatter, FrontmatterParser};
use crate::utils::Validator;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// A topic or category-index file read from disk. Lives for one file's processing.
#[derive(Debug, Clone)]
pub struct Document {
    pub file_path: PathBuf,
    pub relative_path: String,
    pub front_matter: Frontmatter,
    pub body: String,
    pub content_hash: String,
}

impl Document {
    pub fn parse(file_path: PathBuf, relative_path: String, content: &str) -> Result<Self> {
        let (front_matter, body) = FrontmatterParser::new().extract(content, &relative_path)?;

        Ok(Self {
            file_path,
            relative_path,
            front_matter,
            body,
            content_hash: Self::compute_hash(content),
        })
    }

    pub fn load(path: &Path, root: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| PipelineError::file(path, e))?;
        let relative_path = Validator::relative_path(path, root);

        Self::parse(path.to_path_buf(), relative_path, &content)
    }

    fn compute_hash(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    pub fn text(&self, key: &str) -> Option<String> {
        self.front_matter.text(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_document_load() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("basics/01-intro");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("README.md");
        fs::write(&path, "---\ntitle: Intro\n---\n# Intro\n").unwrap();

        let doc = Document::load(&path, temp.path()).unwrap();

        assert_eq!(doc.relative_path, "basics/01-intro/README.md");
        assert_eq!(doc.text("title"), Some("Intro".to_string()));
        assert_eq!(doc.body, "# Intro\n");
        assert_eq!(doc.content_hash.len(), 64);
    }

    #[test]
    fn test_hash_consistency() {
        let content = "Test content";
        assert_eq!(Document::compute_hash(content), Document::compute_hash(content));
    }

    #[test]
    fn test_missing_front_matter_is_reported_with_path() {
        let err = Document::parse(
            PathBuf::from("x.md"),
            "basics/x.md".to_string(),
            "# no front matter",
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Missing front matter in basics/x.md");
    }
}
