// file: src/authoring/profile.rs
// description: local author identity and content creation statistics
// reference: https://docs.rs/uuid

use crate::error::{PipelineError, Result};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorStats {
    pub topics_created: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_created: Option<String>,
    /// Topics created per category slug.
    #[serde(default)]
    pub categories: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// RFC 3339, UTC.
    pub created_at: String,
    #[serde(default)]
    pub stats: AuthorStats,
}

impl AuthorProfile {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            stats: AuthorStats::default(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| PipelineError::file(path, e))?;
        serde_json::from_str(&text).map_err(|e| {
            PipelineError::Validation(format!(
                "Author profile {} is invalid: {}",
                path.display(),
                e
            ))
        })
    }

    pub fn load_optional(path: &Path) -> Result<Option<Self>> {
        if !path.is_file() {
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| PipelineError::file(parent, e))?;
        }
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        fs::write(path, text).map_err(|e| PipelineError::file(path, e))?;
        debug!("Saved author profile to {}", path.display());
        Ok(())
    }

    pub fn record_topic(&mut self, topic_id: &str, category: &str) {
        self.stats.topics_created += 1;
        self.stats.last_created = Some(topic_id.to_string());
        *self
            .stats
            .categories
            .entry(category.to_string())
            .or_insert(0) += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_profile_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".godojo/author.json");

        let mut profile = AuthorProfile::new("Ana", "ana@example.com");
        profile.record_topic("basics/variables", "basics");
        profile.record_topic("basics/loops", "basics");
        profile.save(&path).unwrap();

        let loaded = AuthorProfile::load(&path).unwrap();
        assert_eq!(loaded, profile);
        assert_eq!(loaded.stats.topics_created, 2);
        assert_eq!(loaded.stats.categories.get("basics"), Some(&2));
        assert_eq!(loaded.stats.last_created.as_deref(), Some("basics/loops"));
    }

    #[test]
    fn test_missing_profile() {
        let temp = TempDir::new().unwrap();
        assert_eq!(
            AuthorProfile::load_optional(&temp.path().join("none.json")).unwrap(),
            None
        );
    }

    #[test]
    fn test_corrupt_profile_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("author.json");
        fs::write(&path, "{\"name\": 1}").unwrap();
        assert!(matches!(
            AuthorProfile::load(&path),
            Err(PipelineError::Validation(_))
        ));
    }
}
