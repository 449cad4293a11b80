// file: src/exporter/search.rs
// description: flat search index and autocomplete terms for exported topics
// reference: markup-free text assembled from topic sections

use crate::models::{AutocompleteEntry, BuiltTopic, SearchEntry};
use crate::parser::MarkdownParser;
use std::collections::{BTreeMap, BTreeSet};

const MIN_TERM_LENGTH: usize = 2;

pub struct SearchIndexer {
    parser: MarkdownParser,
    entries: Vec<SearchEntry>,
    terms: BTreeMap<String, BTreeSet<String>>,
}

impl SearchIndexer {
    pub fn new() -> Self {
        Self {
            parser: MarkdownParser::new(),
            entries: Vec::new(),
            terms: BTreeMap::new(),
        }
    }

    pub fn add(&mut self, topic: &BuiltTopic) {
        self.entries.push(SearchEntry {
            id: topic.id.clone(),
            title: topic.title.clone(),
            description: topic.description.clone(),
            category: topic.category.clone(),
            difficulty: topic.difficulty.clone(),
            text: self.searchable_text(topic),
        });

        let title_terms = topic
            .title
            .split(|c: char| !c.is_alphanumeric())
            .map(str::to_lowercase);
        let tag_terms = topic.tags.iter().map(|tag| tag.trim().to_lowercase());

        for term in title_terms.chain(tag_terms) {
            if term.chars().count() >= MIN_TERM_LENGTH {
                self.terms
                    .entry(term)
                    .or_default()
                    .insert(topic.id.clone());
            }
        }
    }

    /// Title, description and section prose with markup and fenced code removed.
    pub fn searchable_text(&self, topic: &BuiltTopic) -> String {
        let sections = &topic.sections;
        let mut parts: Vec<&str> = vec![topic.title.as_str(), topic.description.as_str()];

        parts.extend(sections.theory.as_deref());
        for example in &sections.examples {
            parts.push(&example.title);
            parts.push(&example.explanation);
        }
        for exercise in &sections.exercises {
            parts.push(&exercise.title);
            parts.push(&exercise.content);
        }
        parts.extend(sections.best_practices.as_deref());
        parts.extend(sections.common_mistakes.as_deref());
        parts.extend(sections.real_world.as_deref());
        parts.extend(sections.summary.as_deref());

        parts
            .into_iter()
            .map(|part| self.parser.searchable_text(part))
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn entries(&self) -> &[SearchEntry] {
        &self.entries
    }

    /// Sorted unique terms, each with the sorted ids of the topics it points to.
    pub fn autocomplete(&self) -> Vec<AutocompleteEntry> {
        self.terms
            .iter()
            .map(|(term, topics)| AutocompleteEntry {
                term: term.clone(),
                topics: topics.iter().cloned().collect(),
            })
            .collect()
    }
}

impl Default for SearchIndexer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CodeExample, ParsedSections, TopicStats};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn topic(id: &str, title: &str, tags: &[&str]) -> BuiltTopic {
        let sections = ParsedSections {
            theory: Some("Slices are **views** into arrays.".to_string()),
            examples: vec![CodeExample {
                title: "Append".to_string(),
                code: "s = append(s, 1)".to_string(),
                explanation: "Grows the slice.\n\n```go\nsecret := 1\n```".to_string(),
            }],
            ..ParsedSections::default()
        };

        BuiltTopic {
            id: id.to_string(),
            slug: id.rsplit('/').next().unwrap().to_string(),
            category: "basics".to_string(),
            order: 1,
            module: Some(1),
            title: title.to_string(),
            description: "About slices".to_string(),
            difficulty: Some("Beginner".to_string()),
            author_id: None,
            language: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            metadata: BTreeMap::new(),
            source_path: format!("{id}/README.md"),
            source_hash: String::new(),
            stats: TopicStats::new(10, &sections, 200),
            sections,
            assets: Vec::new(),
        }
    }

    #[test]
    fn test_search_text_strips_markup_and_code() {
        let indexer = SearchIndexer::new();
        let text = indexer.searchable_text(&topic("basics/slices", "Slices", &[]));

        assert!(text.starts_with("Slices About slices Slices are views into arrays."));
        assert!(text.contains("Grows the slice."));
        assert!(!text.contains("**"));
        assert!(!text.contains("secret"));
        assert!(!text.contains("append(s"));
    }

    #[test]
    fn test_autocomplete_terms_are_sorted_and_unique() {
        let mut indexer = SearchIndexer::new();
        indexer.add(&topic("basics/slices", "Slices and Arrays", &["Collections"]));
        indexer.add(&topic("basics/maps", "Maps", &["collections"]));

        let terms: Vec<String> = indexer.autocomplete().into_iter().map(|e| e.term).collect();
        assert_eq!(terms, vec!["and", "arrays", "collections", "maps", "slices"]);

        let collections = indexer
            .autocomplete()
            .into_iter()
            .find(|e| e.term == "collections")
            .unwrap();
        assert_eq!(collections.topics, vec!["basics/maps", "basics/slices"]);
        assert_eq!(indexer.entries().len(), 2);
    }
}
