// file: src/authoring/scaffold.rs
// description: author workspace initialization and new topic scaffolding
// reference: category/NN-topic directory convention

use crate::authoring::profile::AuthorProfile;
use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::parser::frontmatter::{FieldValue, Frontmatter, FrontmatterParser};
use crate::repository::classifier::TopicDir;
use crate::settings::Settings;
use crate::utils::Validator;
use crate::utils::template::{FileTemplate, TOPIC_TEMPLATE_FILE};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone)]
pub struct InitOutcome {
    pub profile: AuthorProfile,
    /// Files and directories written by this run.
    pub created: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTopic {
    pub id: String,
    pub path: PathBuf,
    pub number: u32,
    pub module: u32,
}

/// Prepares the author workspace. Existing profile and configuration are kept.
pub fn init(settings: &Settings, name: &str, email: &str) -> Result<InitOutcome> {
    let mut created = Vec::new();

    let profile = match AuthorProfile::load_optional(&settings.author_profile)? {
        Some(profile) => {
            info!("Using existing author profile {}", profile.id);
            profile
        }
        None => {
            Validator::validate_content_not_empty(name)
                .map_err(|_| PipelineError::Validation("Author name is empty".to_string()))?;
            let profile = AuthorProfile::new(name.trim(), email.trim());
            profile.save(&settings.author_profile)?;
            created.push(settings.author_profile.clone());
            profile
        }
    };

    if !settings.course_config.exists() {
        let mut text = Config::default_config().to_json_pretty()?;
        text.push('\n');
        fs::write(&settings.course_config, text)
            .map_err(|e| PipelineError::file(&settings.course_config, e))?;
        created.push(settings.course_config.clone());
    }

    if !settings.content_dir.exists() {
        fs::create_dir_all(&settings.content_dir)
            .map_err(|e| PipelineError::file(&settings.content_dir, e))?;
        created.push(settings.content_dir.clone());
    }

    Ok(InitOutcome { profile, created })
}

pub struct TopicScaffolder {
    config: Config,
    content_dir: PathBuf,
    profile_path: PathBuf,
    template: FileTemplate,
}

impl TopicScaffolder {
    pub fn new(config: Config, settings: &Settings) -> Result<Self> {
        let template = FileTemplate::load(
            settings.template_dir.as_deref(),
            TOPIC_TEMPLATE_FILE,
            FileTemplate::topic,
        )?;
        Ok(Self {
            config,
            content_dir: settings.content_dir.clone(),
            profile_path: settings.author_profile.clone(),
            template,
        })
    }

    pub fn new_topic(&self, category_slug: &str, title: &str, description: &str) -> Result<NewTopic> {
        let category = self.config.category(category_slug).ok_or_else(|| {
            PipelineError::Validation(format!(
                "Unknown category `{}` (configured: {})",
                category_slug,
                self.config.slugs().join(", ")
            ))
        })?;

        let mut profile = AuthorProfile::load_optional(&self.profile_path)?.ok_or_else(|| {
            PipelineError::Validation(format!(
                "No author profile at {}; run `godojo init` first",
                self.profile_path.display()
            ))
        })?;

        Validator::validate_content_not_empty(title)?;
        let slug = Validator::slugify(title);
        Validator::validate_slug(&slug)?;

        let category_dir = self.content_dir.join(&category.slug);
        let existing = existing_topics(&category_dir);
        if existing.iter().any(|dir| dir.slug == slug) {
            return Err(PipelineError::Validation(format!(
                "Topic `{}` already exists in {}",
                slug, category.slug
            )));
        }

        let number = existing.iter().map(|dir| dir.number).max().unwrap_or(0) + 1;
        let module = category.modules.start + number - 1;
        let topic_dir = category_dir.join(format!("{:02}-{}", number, slug));
        let path = topic_dir.join(&self.config.structure.topic_file);

        let values = HashMap::from([
            ("title", title.trim().to_string()),
            ("description", description.trim().to_string()),
        ]);
        let body = self.template.render(&values)?;

        let mut front_matter = Frontmatter::default();
        front_matter.insert("title", FieldValue::Text(title.trim().to_string()));
        front_matter.insert("description", FieldValue::Text(description.trim().to_string()));
        front_matter.insert("authorId", FieldValue::Text(profile.id.to_string()));
        front_matter.insert("category", FieldValue::Text(category.slug.clone()));
        front_matter.insert(
            "difficulty",
            FieldValue::Text(category.difficulty.as_str().to_string()),
        );
        front_matter.insert(
            "language",
            FieldValue::Text(self.config.structure.default_language.clone()),
        );
        front_matter.insert("module", FieldValue::Integer(i64::from(module)));
        let text = FrontmatterParser::new().serialize(&front_matter, &body)?;

        fs::create_dir_all(&topic_dir).map_err(|e| PipelineError::file(&topic_dir, e))?;
        fs::write(&path, text).map_err(|e| PipelineError::file(&path, e))?;

        let id = format!("{}/{}", category.slug, slug);
        profile.record_topic(&id, &category.slug);
        profile.save(&self.profile_path)?;

        info!("Created topic {} at {}", id, path.display());
        Ok(NewTopic {
            id,
            path,
            number,
            module,
        })
    }
}

fn existing_topics(category_dir: &Path) -> Vec<TopicDir> {
    let Ok(entries) = fs::read_dir(category_dir) else {
        return Vec::new();
    };
    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| TopicDir::parse(&entry.file_name().to_string_lossy()))
        .collect()
}
