// file: src/structure/tree.rs
// description: cross-checks the on-disk content tree against the course configuration
// reference: category/NN-topic directory convention

use crate::config::{Category, Config};
use crate::error::Result;
use crate::models::{Document, Finding, Report};
use crate::repository::classifier::{FileClassifier, TopicDir};
use crate::utils::Validator;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Front matter every category index must carry.
pub const INDEX_FIELDS: [&str; 3] = ["title", "description", "category"];

pub struct StructureValidator {
    pub(super) config: Config,
    classifier: FileClassifier,
}

impl StructureValidator {
    pub fn new(config: Config) -> Self {
        let classifier = FileClassifier::from_config(&config);
        Self { config, classifier }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Reads the tree under `root` and reports; nothing on disk is touched.
    pub fn validate_tree(&self, root: &Path) -> Result<Report> {
        Validator::validate_directory(root)?;
        info!("Validating content structure under {}", root.display());

        let mut report = Report::new();
        for category in &self.config.categories {
            report = report.merge(self.validate_category(root, category));
        }
        report = report.merge(self.unconfigured_directories(root));

        let report = report.sorted();
        info!("Structure: {}", report.summary_line());
        Ok(report)
    }

    fn validate_category(&self, root: &Path, category: &Category) -> Report {
        let category_dir = root.join(&category.slug);
        let index_path = category_dir.join(self.classifier.category_index_file());
        let index_relative = Validator::relative_path(&index_path, root);

        let mut report = Report::new();
        report.files_checked += 1;

        if !index_path.is_file() {
            report.push(Finding::blocking(
                &index_relative,
                format!("category `{}` has no index file", category.slug),
            ));
        } else {
            match Document::load(&index_path, root) {
                Ok(index) => {
                    for field in INDEX_FIELDS {
                        if !index.front_matter.has(field) {
                            report.push(Finding::blocking(
                                &index_relative,
                                format!("missing required field `{}`", field),
                            ));
                        }
                    }
                    if let Some(declared) = index.text("category")
                        && declared != category.slug
                    {
                        report.push(Finding::blocking(
                            &index_relative,
                            format!(
                                "category `{}` does not match directory `{}`",
                                declared, category.slug
                            ),
                        ));
                    }
                }
                Err(err) => report.push(Finding::blocking(&index_relative, err.to_string())),
            }
        }

        if category_dir.is_dir() {
            report = report.merge(self.validate_topics(root, &category_dir, category));
        }
        report
    }

    fn validate_topics(&self, root: &Path, category_dir: &Path, category: &Category) -> Report {
        let mut report = Report::new();
        let mut numbers = Vec::new();

        for dir in subdirectories(category_dir) {
            let name = dir_name(&dir);
            let relative_dir = Validator::relative_path(&dir, root);

            match TopicDir::parse(&name) {
                Some(topic_dir) => numbers.push(topic_dir.number),
                None => report.push(Finding::advisory(
                    &relative_dir,
                    format!("topic directory `{}` does not follow the NN-slug naming", name),
                )),
            }

            let topic_path = dir.join(self.classifier.topic_file());
            let topic_relative = Validator::relative_path(&topic_path, root);
            report.files_checked += 1;

            if !topic_path.is_file() {
                report.push(Finding::blocking(
                    &topic_relative,
                    format!("missing topic file {}", self.classifier.topic_file()),
                ));
                continue;
            }

            match Document::load(&topic_path, root) {
                Ok(document) => {
                    for finding in self.check_topic(&document, category) {
                        report.push(finding);
                    }
                }
                Err(err) => report.push(Finding::blocking(&topic_relative, err.to_string())),
            }
        }

        for message in sequence_gaps(numbers) {
            report.push(Finding::advisory(
                Validator::relative_path(category_dir, root),
                message,
            ));
        }
        report
    }

    fn check_topic(&self, document: &Document, category: &Category) -> Vec<Finding> {
        let path = document.relative_path.as_str();
        let mut findings = Vec::new();

        match document.text("category") {
            Some(declared) if declared == category.slug => {}
            Some(declared) => findings.push(Finding::blocking(
                path,
                format!(
                    "category `{}` does not match directory `{}`",
                    declared, category.slug
                ),
            )),
            None => findings.push(Finding::blocking(path, "missing required field `category`")),
        }

        let module = document
            .front_matter
            .get("module")
            .and_then(|value| value.as_integer());
        if let Some(module) = module {
            let total = self.config.total_modules();
            if module < 1 || module > i64::from(total) {
                findings.push(Finding::advisory(
                    path,
                    format!("module {} is outside the valid range 1-{}", module, total),
                ));
            } else if !category.modules.contains(module as u32) {
                findings.push(Finding::advisory(
                    path,
                    format!(
                        "module {} is outside category `{}` range {}",
                        module, category.slug, category.modules
                    ),
                ));
            }
        }

        debug!("Checked topic {} ({} findings)", path, findings.len());
        findings
    }

    fn unconfigured_directories(&self, root: &Path) -> Report {
        let slugs = self.config.slugs();
        let mut report = Report::new();
        for dir in subdirectories(root) {
            let name = dir_name(&dir);
            if !slugs.contains(&name.as_str()) {
                report.push(Finding::advisory(
                    &name,
                    format!("directory `{}` is not a configured category", name),
                ));
            }
        }
        report
    }
}

/// Visible subdirectories sorted by name.
fn subdirectories(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir() && !dir_name(path).starts_with('.'))
        .collect();
    dirs.sort();
    dirs
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn sequence_gaps(mut numbers: Vec<u32>) -> Vec<String> {
    numbers.sort_unstable();
    let mut messages = Vec::new();

    if let Some(&first) = numbers.first()
        && first > 1
    {
        messages.push(format!("topic numbering starts at {:02}", first));
    }
    for pair in numbers.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        if next == prev {
            messages.push(format!("topic number {:02} is used more than once", next));
        } else if next > prev + 1 {
            messages.push(format!("sequence gap between {:02} and {:02}", prev, next));
        }
    }
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModuleRange;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const INDEX: &str = "---\ntitle: Go Basics\ndescription: Start here\ncategory: basics\n---\nOverview.\n";

    fn topic(category: &str, module: u32) -> String {
        format!(
            "---\ntitle: Intro\ndescription: First steps\nauthorId: a1\ncategory: {}\nmodule: {}\n---\n# Intro\n",
            category, module
        )
    }

    fn fixture() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("basics/01-intro")).unwrap();
        fs::write(root.join("basics/index.md"), INDEX).unwrap();
        fs::write(root.join("basics/01-intro/README.md"), topic("basics", 1)).unwrap();
        temp
    }

    fn validate(root: &Path) -> Report {
        StructureValidator::new(Config::default_config())
            .validate_tree(root)
            .unwrap()
    }

    #[test]
    fn test_minimal_tree_has_no_findings() {
        let temp = fixture();
        let report = validate(temp.path());
        assert_eq!(report.findings, Vec::new());
        assert_eq!(report.files_checked, 2);
    }

    #[test]
    fn test_missing_index_is_blocking() {
        let temp = fixture();
        fs::remove_file(temp.path().join("basics/index.md")).unwrap();

        let report = validate(temp.path());
        assert!(report.has_blocking());
        assert_eq!(report.findings[0].file_path, "basics/index.md");
    }

    #[test]
    fn test_missing_category_directory_is_blocking() {
        let temp = TempDir::new().unwrap();
        let report = validate(temp.path());
        assert_eq!(report.blocking_count(), 1);
    }

    #[test]
    fn test_index_category_mismatch_and_missing_field() {
        let temp = fixture();
        fs::write(
            temp.path().join("basics/index.md"),
            "---\ntitle: Go Basics\ncategory: advanced\n---\n",
        )
        .unwrap();

        let report = validate(temp.path());
        let messages: Vec<&str> = report.findings.iter().map(|f| f.message.as_str()).collect();
        assert_eq!(report.blocking_count(), 2);
        assert!(messages.iter().any(|m| m.contains("`description`")));
        assert!(messages.iter().any(|m| m.contains("does not match")));
    }

    #[test]
    fn test_module_out_of_range_is_advisory() {
        let temp = fixture();
        fs::write(temp.path().join("basics/01-intro/README.md"), topic("basics", 16)).unwrap();

        let report = validate(temp.path());
        assert!(!report.has_blocking());
        assert_eq!(report.advisory_count(), 1);
        assert!(report.findings[0].message.contains("module 16"));
    }

    #[test]
    fn test_module_outside_category_range() {
        let temp = fixture();
        let mut config = Config::default_config();
        let mut advanced = config.categories[0].clone();
        advanced.slug = "advanced".to_string();
        advanced.modules = ModuleRange::new(16, 30);
        config.categories.push(advanced);
        fs::create_dir_all(temp.path().join("advanced")).unwrap();
        fs::write(
            temp.path().join("advanced/index.md"),
            INDEX.replace("category: basics", "category: advanced"),
        )
        .unwrap();
        fs::write(temp.path().join("basics/01-intro/README.md"), topic("basics", 20)).unwrap();

        let report = StructureValidator::new(config)
            .validate_tree(temp.path())
            .unwrap();
        assert_eq!(report.advisory_count(), 1);
        assert!(report.findings[0].message.contains("range 1-15"));
    }

    #[test]
    fn test_topic_naming_and_gaps() {
        let temp = fixture();
        let root = temp.path();
        fs::create_dir_all(root.join("basics/03-maps")).unwrap();
        fs::write(root.join("basics/03-maps/README.md"), topic("basics", 3)).unwrap();
        fs::create_dir_all(root.join("basics/Loops")).unwrap();
        fs::write(root.join("basics/Loops/README.md"), topic("basics", 2)).unwrap();

        let report = validate(root);
        let messages: Vec<&str> = report.findings.iter().map(|f| f.message.as_str()).collect();
        assert!(!report.has_blocking());
        assert!(messages.iter().any(|m| m.contains("NN-slug")));
        assert!(messages.contains(&"sequence gap between 01 and 03"));
    }

    #[test]
    fn test_missing_topic_file_and_wrong_category() {
        let temp = fixture();
        let root = temp.path();
        fs::create_dir_all(root.join("basics/02-empty")).unwrap();
        fs::write(root.join("basics/01-intro/README.md"), topic("advanced", 1)).unwrap();

        let report = validate(root);
        assert_eq!(report.blocking_count(), 2);
        assert!(report
            .findings
            .iter()
            .any(|f| f.file_path == "basics/02-empty/README.md"));
    }

    #[test]
    fn test_unconfigured_directory_is_advisory() {
        let temp = fixture();
        fs::create_dir_all(temp.path().join("drafts")).unwrap();
        fs::create_dir_all(temp.path().join(".git")).unwrap();

        let report = validate(temp.path());
        assert_eq!(report.advisory_count(), 1);
        assert_eq!(report.findings[0].file_path, "drafts");
    }

    #[test]
    fn test_sequence_gaps() {
        assert_eq!(sequence_gaps(vec![1, 2, 3]), Vec::<String>::new());
        assert_eq!(
            sequence_gaps(vec![4, 2, 2]),
            vec![
                "topic numbering starts at 02".to_string(),
                "topic number 02 is used more than once".to_string(),
                "sequence gap between 02 and 04".to_string(),
            ]
        );
    }
}
