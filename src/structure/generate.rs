// file: src/structure/generate.rs
// description: creates missing category directories and index files from the configuration

use crate::config::{Category, Config};
use crate::error::{PipelineError, Result};
use crate::parser::frontmatter::{FieldValue, Frontmatter, FrontmatterParser};
use crate::utils::template::{CATEGORY_INDEX_TEMPLATE_FILE, FileTemplate};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub struct StructureGenerator {
    config: Config,
    template: FileTemplate,
}

impl StructureGenerator {
    pub fn new(config: Config, template_dir: Option<&Path>) -> Result<Self> {
        let template = FileTemplate::load(
            template_dir,
            CATEGORY_INDEX_TEMPLATE_FILE,
            FileTemplate::category_index,
        )?;
        Ok(Self { config, template })
    }

    /// Returns the paths it created. Existing files are never rewritten.
    pub fn generate(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut created = Vec::new();

        if !root.exists() {
            fs::create_dir_all(root).map_err(|e| PipelineError::file(root, e))?;
            created.push(root.to_path_buf());
        }

        for category in &self.config.categories {
            let dir = root.join(&category.slug);
            if !dir.is_dir() {
                fs::create_dir_all(&dir).map_err(|e| PipelineError::file(&dir, e))?;
                created.push(dir.clone());
            }

            let index = dir.join(&self.config.structure.category_index_file);
            if index.exists() {
                debug!("Keeping existing {}", index.display());
                continue;
            }

            fs::write(&index, self.render_index(category)?)
                .map_err(|e| PipelineError::file(&index, e))?;
            created.push(index);
        }

        info!("Generated {} structure entries under {}", created.len(), root.display());
        Ok(created)
    }

    pub fn render_index(&self, category: &Category) -> Result<String> {
        let title = category
            .title_localized
            .resolve(&self.config.structure.default_language)
            .to_string();

        let mut front_matter = Frontmatter::default();
        front_matter.insert("title", FieldValue::Text(title.clone()));
        front_matter.insert("description", FieldValue::Text(category.description.clone()));
        front_matter.insert("category", FieldValue::Text(category.slug.clone()));

        let values = HashMap::from([
            ("title", title),
            ("description", category.description.clone()),
            ("modules", category.modules.to_string()),
            ("difficulty", category.difficulty.as_str().to_string()),
            ("hours", category.estimated_hours.to_string()),
        ]);
        let body = self.template.render(&values)?;

        FrontmatterParser::new().serialize(&front_matter, &body)
    }
}
