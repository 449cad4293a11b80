// file: src/pipeline/processor.rs
// description: converts scanned content files into built topic and category records
// reference: parses front matter, splits sections and computes topic statistics

use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::models::{BuiltTopic, Document, TopicStats};
use crate::parser::{FieldValue, MarkdownParser, SectionExtractor};
use crate::quality::count_words;
use crate::repository::{FileClassifier, FileKind, ScannedFile, TopicDir};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// Front matter keys mapped onto dedicated topic fields; everything else goes
/// into `metadata`.
const TOPIC_FIELDS: [&str; 9] = [
    "title",
    "description",
    "category",
    "difficulty",
    "authorId",
    "language",
    "module",
    "tags",
    "slug",
];

/// Category index content: overview text and optional title/description overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryIndex {
    pub category: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub overview: Option<String>,
    pub source_path: String,
}

#[derive(Debug, Clone)]
pub enum ProcessingResult {
    Topic {
        topic: Box<BuiltTopic>,
        /// Source topic directory relative to the content root, e.g. `basics/01-intro`.
        source_dir: String,
    },
    CategoryIndex(CategoryIndex),
    Skipped,
}

pub struct FileProcessor {
    config: Config,
    classifier: FileClassifier,
    sections: SectionExtractor,
    parser: MarkdownParser,
    words_per_minute: usize,
}

impl FileProcessor {
    pub fn new(config: Config, words_per_minute: usize) -> Self {
        let classifier = FileClassifier::from_config(&config);
        Self {
            config,
            classifier,
            sections: SectionExtractor::new(),
            parser: MarkdownParser::new(),
            words_per_minute,
        }
    }

    pub fn process(&self, scanned_file: &ScannedFile, root: &Path) -> Result<ProcessingResult> {
        let kind = self
            .classifier
            .classify(Path::new(&scanned_file.relative_path));

        match kind {
            FileKind::TopicContent {
                category,
                topic_dir,
            } => {
                info!("Processing topic: {}", scanned_file.relative_path);
                let document = Document::load(&scanned_file.path, root)?;
                let topic = self.build_topic(&document, &category, &topic_dir)?;
                Ok(ProcessingResult::Topic {
                    topic: Box::new(topic),
                    source_dir: format!("{}/{}", category, topic_dir),
                })
            }
            FileKind::CategoryIndex { category } => {
                debug!("Processing category index: {}", scanned_file.relative_path);
                let document = Document::load(&scanned_file.path, root)?;
                Ok(ProcessingResult::CategoryIndex(
                    self.build_category_index(&document, &category),
                ))
            }
            FileKind::Asset { .. } | FileKind::Other => {
                debug!("Not a content file: {}", scanned_file.relative_path);
                Ok(ProcessingResult::Skipped)
            }
        }
    }

    /// Builds the output record for one topic document. The topic's `category`
    /// front matter (falling back to its directory) must name a configured category.
    pub fn build_topic(
        &self,
        document: &Document,
        dir_category: &str,
        topic_dir: &str,
    ) -> Result<BuiltTopic> {
        let category = document
            .text("category")
            .unwrap_or_else(|| dir_category.to_string());

        if self.config.category(&category).is_none() {
            return Err(PipelineError::Validation(format!(
                "{}: unknown category `{}` (configured: {})",
                document.relative_path,
                category,
                self.config.slugs().join(", ")
            )));
        }

        let dir = TopicDir::parse_lenient(topic_dir);
        let title = document
            .text("title")
            .or_else(|| self.first_heading(&document.body))
            .unwrap_or_else(|| dir.slug.clone());

        let module = document
            .front_matter
            .get("module")
            .and_then(FieldValue::as_integer)
            .and_then(|m| u32::try_from(m).ok())
            .filter(|m| *m > 0);

        let tags = document
            .front_matter
            .get("tags")
            .map(FieldValue::as_list)
            .unwrap_or_default();

        let metadata: BTreeMap<String, FieldValue> = document
            .front_matter
            .fields
            .iter()
            .filter(|(key, _)| !TOPIC_FIELDS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let sections = self.sections.extract(&document.body);
        let stats = TopicStats::new(
            count_words(&document.body),
            &sections,
            self.words_per_minute,
        );

        debug!(
            "{}: {} words, {} examples, {} exercises",
            document.relative_path,
            stats.word_count,
            stats.code_example_count,
            stats.exercise_count
        );

        Ok(BuiltTopic {
            id: format!("{}/{}", category, dir.slug),
            slug: dir.slug,
            category,
            order: dir.number,
            module,
            title,
            description: document.text("description").unwrap_or_default(),
            difficulty: document.text("difficulty"),
            author_id: document.text("authorId"),
            language: document.text("language"),
            tags,
            metadata,
            source_path: document.relative_path.clone(),
            source_hash: document.content_hash.clone(),
            sections,
            stats,
            assets: Vec::new(),
        })
    }

    pub fn build_category_index(&self, document: &Document, category: &str) -> CategoryIndex {
        let overview = document.body.trim();
        CategoryIndex {
            category: document
                .text("category")
                .unwrap_or_else(|| category.to_string()),
            title: document.text("title"),
            description: document.text("description"),
            overview: (!overview.is_empty()).then(|| overview.to_string()),
            source_path: document.relative_path.clone(),
        }
    }

    fn first_heading(&self, body: &str) -> Option<String> {
        self.parser
            .parse(body)
            .headings
            .into_iter()
            .find(|h| h.level == 1)
            .map(|h| h.text)
    }
}
