// file: src/structure/package.rs
// description: validates an exported platform package before it is shipped
// reference: json export of built topics with search index and package manifest

use crate::error::{PipelineError, Result};
use crate::exporter::REQUIRED_FILES;
use crate::exporter::json::SEARCH_INDEX;
use crate::extractor::patterns::is_runnable_go;
use crate::models::{ExportedTopic, Finding, Report, SearchEntry, TopicSummary};
use crate::pipeline::TOPICS_INDEX;
use crate::structure::StructureValidator;
use crate::utils::{Validator, parse_yaml};
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::info;
use yaml_rust::Yaml;

impl StructureValidator {
    pub fn validate_package(&self, export_root: &Path) -> Result<Report> {
        Validator::validate_directory(export_root)?;
        info!("Validating export package {}", export_root.display());

        let mut report = Report::new();

        for file in REQUIRED_FILES {
            if !export_root.join(file).is_file() {
                report.push(Finding::blocking(file, "required package file is missing"));
            }
        }

        for category in &self.config.categories {
            let relative = format!("{}/category.yaml", category.slug);
            report.files_checked += 1;
            if let Some(finding) = check_category_yaml(export_root, &relative) {
                report.push(finding);
            }
        }

        let summaries: Vec<TopicSummary> = match read_json(export_root, TOPICS_INDEX) {
            Ok(Some(summaries)) => summaries,
            Ok(None) => Vec::new(),
            Err(err) => {
                report.push(Finding::blocking(TOPICS_INDEX, err.to_string()));
                Vec::new()
            }
        };

        for summary in &summaries {
            report.files_checked += 1;
            for finding in self.check_exported_topic(export_root, summary) {
                report.push(finding);
            }
        }

        match read_json::<Vec<SearchEntry>>(export_root, SEARCH_INDEX) {
            Ok(Some(entries)) => {
                let indexed: BTreeSet<&str> = entries.iter().map(|e| e.id.as_str()).collect();
                for summary in &summaries {
                    if !indexed.contains(summary.id.as_str()) {
                        report.push(Finding::advisory(
                            SEARCH_INDEX,
                            format!("topic {} is not in the search index", summary.id),
                        ));
                    }
                }
            }
            Ok(None) => {}
            Err(err) => report.push(Finding::blocking(SEARCH_INDEX, err.to_string())),
        }

        let report = report.sorted();
        info!("Package: {}", report.summary_line());
        Ok(report)
    }

    fn check_exported_topic(&self, export_root: &Path, summary: &TopicSummary) -> Vec<Finding> {
        let path = summary.path.as_str();
        let topic: ExportedTopic = match read_json(export_root, path) {
            Ok(Some(topic)) => topic,
            Ok(None) => {
                return vec![Finding::blocking(
                    path,
                    format!("topic {} has no exported file", summary.id),
                )];
            }
            Err(err) => return vec![Finding::blocking(path, err.to_string())],
        };

        let mut findings = Vec::new();
        if self.config.category(&topic.category).is_none() {
            findings.push(Finding::blocking(
                path,
                format!("category `{}` is not configured", topic.category),
            ));
        }

        for example in &topic.examples {
            if !is_runnable_go(&example.code) {
                findings.push(Finding::advisory(
                    path,
                    format!(
                        "example `{}` lacks `package main` or `func main`",
                        example.title
                    ),
                ));
            }
        }
        findings
    }
}

fn check_category_yaml(export_root: &Path, relative: &str) -> Option<Finding> {
    let path = export_root.join(relative);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(_) => return Some(Finding::blocking(relative, "category file is missing")),
    };

    match parse_yaml(&text) {
        Ok(Yaml::Hash(_)) => None,
        Ok(_) => Some(Finding::blocking(relative, "category file is not a mapping")),
        Err(err) => Some(Finding::blocking(relative, err.to_string())),
    }
}

/// `Ok(None)` when the file does not exist.
fn read_json<T: DeserializeOwned>(root: &Path, relative: &str) -> Result<Option<T>> {
    let path = root.join(relative);
    if !path.is_file() {
        return Ok(None);
    }
    let text = fs::read_to_string(&path).map_err(|e| PipelineError::file(&path, e))?;
    let value = serde_json::from_str(&text).map_err(|e| {
        PipelineError::Serialization(format!("{} does not parse: {}", relative, e))
    })?;
    Ok(Some(value))
}
