// file: src/repository/sync.rs
// description: read-only source control status for the content work tree
// reference: https://docs.rs/gix

use crate::error::{PipelineError, Result};
use crate::models::SourceRevision;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub struct RepositorySync {
    path: PathBuf,
}

impl RepositorySync {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Branch and HEAD commit of the repository containing the work tree.
    pub fn revision(&self) -> Result<SourceRevision> {
        let repo = gix::discover(&self.path)
            .map_err(|e| PipelineError::Git(format!("Failed to open repo: {}", e)))?;

        let commit = repo
            .head_id()
            .map_err(|e| PipelineError::Git(format!("Failed to get HEAD: {}", e)))?
            .to_string();

        let branch = repo
            .head_name()
            .map_err(|e| PipelineError::Git(format!("Failed to get branch: {}", e)))?
            .map(|name| name.shorten().to_string());

        info!(
            "Content repository at {} on {} ({})",
            self.path.display(),
            branch.as_deref().unwrap_or("detached HEAD"),
            commit
        );

        Ok(SourceRevision { branch, commit })
    }

    /// Like [`revision`](Self::revision) but treats "not a repository" as absent.
    pub fn try_revision(&self) -> Option<SourceRevision> {
        match self.revision() {
            Ok(revision) => Some(revision),
            Err(err) => {
                debug!("No source revision for {}: {}", self.path.display(), err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sync_creation() {
        let temp = TempDir::new().unwrap();
        let sync = RepositorySync::new(temp.path());
        assert_eq!(sync.path(), temp.path());
    }

    #[test]
    fn test_plain_directory_has_no_revision() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("content");
        std::fs::create_dir_all(&nested).unwrap();

        // Only meaningful when the temp dir is not itself inside a repository.
        if gix::discover(temp.path()).is_err() {
            assert!(RepositorySync::new(&nested).try_revision().is_none());
        }
    }
}
