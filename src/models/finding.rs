// file: src/models/finding.rs
// description: quality and structure findings with a value-type report accumulator
// reference: internal data structures

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Blocking,
    Advisory,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blocking => f.write_str("blocking"),
            Self::Advisory => f.write_str("advisory"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub severity: Severity,
    pub file_path: String,
    pub message: String,
}

impl Finding {
    pub fn blocking(file_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Blocking,
            file_path: file_path.into(),
            message: message.into(),
        }
    }

    pub fn advisory(file_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Advisory,
            file_path: file_path.into(),
            message: message.into(),
        }
    }

    pub fn is_blocking(&self) -> bool {
        self.severity == Severity::Blocking
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.file_path, self.message)
    }
}

/// Findings accumulated over one run. Built by value and merged, never shared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub files_checked: usize,
    pub findings: Vec<Finding>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report for a single checked file.
    pub fn for_file(findings: Vec<Finding>) -> Self {
        Self {
            files_checked: 1,
            findings,
        }
    }

    pub fn with(mut self, finding: Finding) -> Self {
        self.findings.push(finding);
        self
    }

    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn merge(mut self, other: Report) -> Self {
        self.files_checked += other.files_checked;
        self.findings.extend(other.findings);
        self
    }

    pub fn blocking_count(&self) -> usize {
        self.findings.iter().filter(|f| f.is_blocking()).count()
    }

    pub fn advisory_count(&self) -> usize {
        self.findings.len() - self.blocking_count()
    }

    pub fn has_blocking(&self) -> bool {
        self.findings.iter().any(Finding::is_blocking)
    }

    /// Files without any blocking finding.
    pub fn passed_count(&self) -> usize {
        let failing: BTreeSet<&str> = self
            .findings
            .iter()
            .filter(|f| f.is_blocking())
            .map(|f| f.file_path.as_str())
            .collect();
        self.files_checked.saturating_sub(failing.len())
    }

    /// Turns every advisory finding into a blocking one.
    pub fn strict(mut self) -> Self {
        for finding in &mut self.findings {
            finding.severity = Severity::Blocking;
        }
        self
    }

    pub fn sorted(mut self) -> Self {
        self.findings.sort_by(|a, b| {
            (a.file_path.as_str(), a.severity, a.message.as_str()).cmp(&(
                b.file_path.as_str(),
                b.severity,
                b.message.as_str(),
            ))
        });
        self
    }

    pub fn summary_line(&self) -> String {
        format!(
            "{} checked, {} passed, {} blocking, {} advisory",
            self.files_checked,
            self.passed_count(),
            self.blocking_count(),
            self.advisory_count()
        )
    }
}
