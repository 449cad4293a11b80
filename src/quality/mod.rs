// file: src/quality/mod.rs
// description: heuristic content quality rules producing blocking and advisory findings
// reference: internal content standards

use crate::config::{Config, Difficulty, QualityStandards};
use crate::error::{PipelineError, Result};
use crate::repository::classifier::{FileClassifier, FileKind};
use crate::repository::scanner::{FileScanner, MARKDOWN};
use crate::extractor::patterns::{PLACEHOLDER_TEXT, TODO_MARKER, strip_fenced};
use crate::models::{Document, Finding, Report};
use crate::parser::{Link, MarkdownParser, ParsedMarkdown, SectionExtractor};
use crate::utils::Validator;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const REQUIRED_FIELDS: [&str; 4] = ["title", "description", "authorId", "category"];
pub const MIN_HEADINGS: usize = 3;

/// Applies independent, order-insensitive rules to one document at a time.
pub struct QualityChecker {
    standards: QualityStandards,
    code_language: String,
    languages: Vec<String>,
    content_root: Option<PathBuf>,
    parser: MarkdownParser,
    sections: SectionExtractor,
    classifier: FileClassifier,
}

impl QualityChecker {
    pub fn new(config: &Config) -> Self {
        Self {
            standards: config.quality,
            code_language: config.structure.code_language.clone(),
            languages: config.structure.languages.clone(),
            content_root: None,
            parser: MarkdownParser::new(),
            sections: SectionExtractor::new(),
            classifier: FileClassifier::from_config(config),
        }
    }

    /// Root used to resolve absolute (`/...`) internal links.
    pub fn with_content_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.content_root = Some(root.into());
        self
    }

    pub fn standards(&self) -> QualityStandards {
        self.standards
    }

    /// Loads and checks one file. Unreadable files and missing front matter are
    /// reported as blocking findings rather than errors.
    pub fn check_file(&self, path: &Path, root: &Path) -> Report {
        match Document::load(path, root) {
            Ok(document) => Report::for_file(self.check(&document)),
            Err(err) => {
                let relative = Validator::relative_path(path, root);
                let message = match err {
                    PipelineError::MissingFrontMatter(_) => "missing front matter block".to_string(),
                    other => other.to_string(),
                };
                Report::for_file(vec![Finding::blocking(relative, message)])
            }
        }
    }

    /// Checks every topic file under `root`, in scan order.
    pub fn check_tree(&self, root: &Path, scanner: &FileScanner) -> Result<Report> {
        let files = scanner.scan_directory(root, MARKDOWN)?;
        let report = files
            .iter()
            .filter(|file| {
                matches!(
                    self.classifier.classify(Path::new(&file.relative_path)),
                    FileKind::TopicContent { .. }
                )
            })
            .fold(Report::new(), |report, file| {
                report.merge(self.check_file(&file.path, root))
            });
        Ok(report)
    }

    pub fn check(&self, document: &Document) -> Vec<Finding> {
        let path = document.relative_path.as_str();
        let parsed = self.parser.parse(&document.body);

        let mut findings = Vec::new();
        findings.extend(self.required_fields(document));
        findings.extend(self.secondary_fields(document));
        findings.extend(self.word_count(path, &document.body));
        findings.extend(self.code_examples(path, &parsed));
        findings.extend(self.exercises(path, &document.body));
        findings.extend(self.headings(path, &parsed));
        findings.extend(self.markers(path, &document.body));
        findings.extend(self.links(document, &parsed.links));

        debug!("{}: {} findings", path, findings.len());
        findings
    }

    fn required_fields(&self, document: &Document) -> Vec<Finding> {
        REQUIRED_FIELDS
            .iter()
            .filter(|field| !document.front_matter.has(field))
            .map(|field| {
                Finding::blocking(
                    &document.relative_path,
                    format!("missing required front matter field `{field}`"),
                )
            })
            .collect()
    }

    fn secondary_fields(&self, document: &Document) -> Vec<Finding> {
        let path = &document.relative_path;
        let mut findings = Vec::new();

        match document.text("difficulty") {
            None => findings.push(Finding::advisory(path, "front matter has no `difficulty`")),
            Some(value) if Difficulty::parse(&value).is_none() => findings.push(Finding::advisory(
                path,
                format!(
                    "difficulty `{value}` is not one of {}",
                    Difficulty::ALL.map(|d| d.as_str()).join(", ")
                ),
            )),
            Some(_) => {}
        }

        match document.text("language") {
            None => findings.push(Finding::advisory(path, "front matter has no `language`")),
            Some(value) if !self.languages.contains(&value) => findings.push(Finding::advisory(
                path,
                format!("language `{value}` is not a configured language"),
            )),
            Some(_) => {}
        }

        match document.front_matter.get("module").map(|v| v.as_integer()) {
            None => findings.push(Finding::advisory(path, "front matter has no `module`")),
            Some(Some(module)) if module > 0 => {}
            Some(_) => findings.push(Finding::advisory(
                path,
                "`module` must be a positive integer",
            )),
        }

        findings
    }

    fn word_count(&self, path: &str, body: &str) -> Option<Finding> {
        let words = count_words(body);
        (words < self.standards.min_words).then(|| {
            Finding::blocking(
                path,
                format!(
                    "word count {words} is below the minimum of {}",
                    self.standards.min_words
                ),
            )
        })
    }

    fn code_examples(&self, path: &str, parsed: &ParsedMarkdown) -> Option<Finding> {
        let count = parsed.code_blocks_in(&self.code_language);
        (count < self.standards.min_code_examples).then(|| {
            Finding::blocking(
                path,
                format!(
                    "{count} `{}` code blocks, at least {} required",
                    self.code_language, self.standards.min_code_examples
                ),
            )
        })
    }

    /// Counts exercises the way the build extracts them.
    pub fn count_exercises(&self, body: &str) -> usize {
        self.sections.extract(body).exercises.len()
    }

    fn exercises(&self, path: &str, body: &str) -> Option<Finding> {
        let count = self.count_exercises(body);
        (count < self.standards.min_exercises).then(|| {
            Finding::blocking(
                path,
                format!(
                    "{count} exercises, at least {} required",
                    self.standards.min_exercises
                ),
            )
        })
    }

    fn headings(&self, path: &str, parsed: &ParsedMarkdown) -> Option<Finding> {
        (parsed.headings.len() < MIN_HEADINGS).then(|| {
            Finding::advisory(
                path,
                format!(
                    "only {} headings, {MIN_HEADINGS} or more expected",
                    parsed.headings.len()
                ),
            )
        })
    }

    fn markers(&self, path: &str, body: &str) -> Vec<Finding> {
        let mut findings = Vec::new();
        if TODO_MARKER.is_match(body) {
            findings.push(Finding::advisory(path, "contains a TODO marker"));
        }
        if let Some(found) = PLACEHOLDER_TEXT.find(body) {
            findings.push(Finding::advisory(
                path,
                format!("contains placeholder text `{}`", found.as_str()),
            ));
        }
        findings
    }

    fn links(&self, document: &Document, links: &[Link]) -> Vec<Finding> {
        let base = document
            .file_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        links
            .iter()
            .filter_map(|link| match classify_link(&link.url) {
                LinkTarget::Anchor => None,
                LinkTarget::External => Validator::validate_url(&link.url).err().map(|_| {
                    Finding::advisory(
                        &document.relative_path,
                        format!("malformed external link `{}`", link.url),
                    )
                }),
                LinkTarget::Internal(target) => {
                    let resolved = match (target.strip_prefix('/'), &self.content_root) {
                        (Some(absolute), Some(root)) => root.join(absolute),
                        _ => base.join(&target),
                    };
                    (!resolved.exists()).then(|| {
                        Finding::advisory(
                            &document.relative_path,
                            format!("broken internal link `{}`", link.url),
                        )
                    })
                }
            })
            .collect()
    }
}

/// Whitespace-separated tokens with at least one alphanumeric character,
/// ignoring fenced code blocks.
pub fn count_words(body: &str) -> usize {
    strip_fenced(body)
        .split_whitespace()
        .filter(|token| token.chars().any(char::is_alphanumeric))
        .count()
}

enum LinkTarget {
    Anchor,
    External,
    Internal(String),
}

fn classify_link(url: &str) -> LinkTarget {
    let url = url.trim();
    if url.is_empty() || url.starts_with('#') {
        return LinkTarget::Anchor;
    }

    let lower = url.to_ascii_lowercase();
    if lower.contains("://")
        || lower.starts_with("mailto:")
        || lower.starts_with("http:")
        || lower.starts_with("https:")
        || lower.starts_with("www.")
    {
        return LinkTarget::External;
    }

    let target = url.split(['#', '?']).next().unwrap_or(url);
    if target.is_empty() {
        LinkTarget::Anchor
    } else {
        LinkTarget::Internal(target.to_string())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::FieldValue;
    use std::fs;
    use tempfile::TempDir;

    fn config(min_words: usize) -> Config {
        let mut config = Config::default_config();
        config.quality = QualityStandards {
            min_words,
            min_code_examples: 1,
            min_exercises: 1,
        };
        config
    }

    fn document(front: &str, body: &str) -> Document {
        let content = format!("---\n{front}---\n{body}");
        Document::parse(
            PathBuf::from("/nonexistent/basics/01-intro/README.md"),
            "basics/01-intro/README.md".to_string(),
            &content,
        )
        .unwrap()
    }

    const FULL_FRONT: &str = "title: Intro\ndescription: First steps\nauthorId: a1\ncategory: basics\ndifficulty: Beginner\nlanguage: en\nmodule: 1\n";

    fn body_with_words(words: usize) -> String {
        let prose = vec!["word"; words].join(" ");
        format!(
            "## Theory\n\n{prose}\n\n```go\nfunc main() {{ fmt.Println(\"not counted\") }}\n```\n\n## Exercises\n\n### Exercise 1: Try\n"
        )
    }

    fn blocking(findings: &[Finding]) -> Vec<&str> {
        findings
            .iter()
            .filter(|f| f.is_blocking())
            .map(|f| f.message.as_str())
            .collect()
    }

    #[test]
    fn test_word_count_boundary() {
        // Heading words "Theory", "Exercises", "Exercise", "1:", "Try" count too.
        let heading_words = 5;
        let checker = QualityChecker::new(&config(20));

        let below = document(FULL_FRONT, &body_with_words(20 - heading_words - 1));
        assert_eq!(count_words(&below.body), 19);
        assert!(blocking(&checker.check(&below))
            .iter()
            .any(|m| m.starts_with("word count")));

        let exact = document(FULL_FRONT, &body_with_words(20 - heading_words));
        assert_eq!(count_words(&exact.body), 20);
        assert!(!blocking(&checker.check(&exact))
            .iter()
            .any(|m| m.starts_with("word count")));
    }

    #[test]
    fn test_each_missing_required_field_is_blocking() {
        let checker = QualityChecker::new(&config(0));

        for field in REQUIRED_FIELDS {
            let mut doc = document(FULL_FRONT, &body_with_words(10));
            doc.front_matter.fields.remove(field);

            let findings = checker.check(&doc);
            assert!(
                findings.iter().any(|f| f.is_blocking()
                    && f.file_path == "basics/01-intro/README.md"
                    && f.message.contains(field)),
                "expected blocking finding for `{field}`"
            );
        }
    }

    #[test]
    fn test_complete_document_has_no_blocking_findings() {
        let checker = QualityChecker::new(&config(10));
        let findings = checker.check(&document(FULL_FRONT, &body_with_words(10)));
        assert!(blocking(&findings).is_empty(), "{findings:?}");
    }

    #[test]
    fn test_code_and_exercise_minimums() {
        let mut config = config(0);
        config.quality.min_code_examples = 2;
        config.quality.min_exercises = 2;
        let checker = QualityChecker::new(&config);

        let findings = checker.check(&document(FULL_FRONT, &body_with_words(1)));
        let messages = blocking(&findings);
        assert!(messages.iter().any(|m| m.contains("`go` code blocks")));
        assert!(messages.iter().any(|m| m.contains("exercises")));
    }

    #[test]
    fn test_exercise_count_matches_build_extraction() {
        let checker = QualityChecker::new(&config(0));
        let loose = "## Theory\n\n## Exercise 1\n\n#### Exercise 2: Deep\n\n## Exercises\n\n### Exercise 3\n";
        let doc = document(FULL_FRONT, loose);

        assert_eq!(checker.count_exercises(&doc.body), 0);
        assert!(blocking(&checker.check(&doc))
            .iter()
            .any(|m| m.starts_with("0 exercises")));

        let proper = "## Exercises\n\n### Exercise 1: Swap\n\nSwap two values.\n";
        assert_eq!(checker.count_exercises(proper), 1);
        assert_eq!(
            checker.count_exercises(proper),
            SectionExtractor::new().extract(proper).exercises.len()
        );
    }

    #[test]
    fn test_code_blocks_in_other_languages_do_not_count() {
        let checker = QualityChecker::new(&config(0));
        let body = "## A\n## B\n## Exercises\n```bash\ngo run .\n```\n### Exercise 1: X\n";
        let findings = checker.check(&document(FULL_FRONT, body));
        assert!(blocking(&findings).iter().any(|m| m.contains("code blocks")));
    }

    #[test]
    fn test_advisory_rules() {
        let checker = QualityChecker::new(&config(0));
        let front = "title: T\ndescription: D\nauthorId: a\ncategory: basics\ndifficulty: Legendary\nlanguage: fr\nmodule: zero\n";
        let body = "# One\n\nTODO: finish. Lorem ipsum.\n\n[bad](http://) [gone](./missing.md) [ok](#top)\n\n```go\nx\n```\n### Exercise 1: A\n";

        let findings = checker.check(&document(front, body));
        let advisories: Vec<&str> = findings
            .iter()
            .filter(|f| !f.is_blocking())
            .map(|f| f.message.as_str())
            .collect();

        assert!(advisories.iter().any(|m| m.contains("difficulty `Legendary`")));
        assert!(advisories.iter().any(|m| m.contains("language `fr`")));
        assert!(advisories.iter().any(|m| m.contains("positive integer")));
        assert!(advisories.iter().any(|m| m.contains("headings")));
        assert!(advisories.iter().any(|m| m.contains("TODO")));
        assert!(advisories.iter().any(|m| m.contains("placeholder")));
        assert!(advisories.iter().any(|m| m.contains("malformed external link")));
        assert!(advisories.iter().any(|m| m.contains("broken internal link `./missing.md`")));
        assert!(!advisories.iter().any(|m| m.contains("#top")));
    }

    #[test]
    fn test_internal_link_resolves_against_document() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("basics/01-intro");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("main.go"), "package main").unwrap();
        let path = dir.join("README.md");
        fs::write(
            &path,
            format!("---\n{FULL_FRONT}---\n[code](main.go#L1) [site](https://go.dev)\n"),
        )
        .unwrap();

        let checker = QualityChecker::new(&config(0)).with_content_root(temp.path());
        let report = checker.check_file(&path, temp.path());

        assert!(!report
            .findings
            .iter()
            .any(|f| f.message.contains("link")));
    }

    #[test]
    fn test_missing_front_matter_is_blocking() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("README.md");
        fs::write(&path, "# No front matter\n").unwrap();

        let report = QualityChecker::new(&config(0)).check_file(&path, temp.path());
        assert!(report.has_blocking());
        assert_eq!(report.findings[0].file_path, "README.md");
    }

    #[test]
    fn test_module_as_quoted_number_is_accepted() {
        let checker = QualityChecker::new(&config(0));
        let mut doc = document(FULL_FRONT, &body_with_words(1));
        doc.front_matter
            .insert("module", FieldValue::Text("4".to_string()));
        assert!(!checker
            .check(&doc)
            .iter()
            .any(|f| f.message.contains("module")));
    }

    #[test]
    fn test_check_tree_covers_topic_files_only() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("basics/01-intro")).unwrap();
        fs::create_dir_all(root.join("basics/02-loops")).unwrap();
        fs::write(root.join("basics/index.md"), "no front matter here").unwrap();
        fs::write(
            root.join("basics/01-intro/README.md"),
            format!("---\n{FULL_FRONT}---\n{}", body_with_words(10)),
        )
        .unwrap();
        fs::write(root.join("basics/02-loops/README.md"), "# Loops\n").unwrap();

        let checker = QualityChecker::new(&config(5)).with_content_root(root);
        let report = checker
            .check_tree(root, &FileScanner::new(Vec::new(), 1024 * 1024))
            .unwrap();

        assert_eq!(report.files_checked, 2);
        assert_eq!(report.passed_count(), 1);
        assert!(report
            .findings
            .iter()
            .filter(|f| f.is_blocking())
            .all(|f| f.file_path == "basics/02-loops/README.md"));
    }
}
