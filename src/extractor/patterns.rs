// file: src/extractor/patterns.rs
// description: compiled regex patterns and fence-aware splitting for the document schema
// reference: https://docs.rs/regex

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Document schema headings
    pub static ref EXAMPLE_TITLE: Regex = Regex::new(
        r"^(?:(?i:example)\s+\d+\s*[:.\-]\s*|\d+[.)]\s+)(.+)$"
    ).expect("EXAMPLE_TITLE regex is valid");

    pub static ref EXERCISE_TITLE: Regex = Regex::new(
        r"^Exercise\s+(\d+)\s*:\s*(.+?)\s*$"
    ).expect("EXERCISE_TITLE regex is valid");

    // Quality markers
    pub static ref TODO_MARKER: Regex = Regex::new(
        r"\bTODO\b"
    ).expect("TODO_MARKER regex is valid");

    pub static ref PLACEHOLDER_TEXT: Regex = Regex::new(
        r"(?i)lorem ipsum|\bTBD\b|\[placeholder\]|\bFIXME\b|\binsert (?:text|content) here\b"
    ).expect("PLACEHOLDER_TEXT regex is valid");

    // Exercise hints
    pub static ref HINT_MARKER: Regex = Regex::new(
        r"(?i)^\s*(?:[-*]\s+)?(?:\*\*|__)?hints?(?:\*\*|__)?\s*:\s*(?:\*\*|__)?\s*(.*)$"
    ).expect("HINT_MARKER regex is valid");

    pub static ref BULLET_ITEM: Regex = Regex::new(
        r"^\s*(?:[-*+]|\d+[.)])\s+(.+?)\s*$"
    ).expect("BULLET_ITEM regex is valid");

    // Layout
    pub static ref TOPIC_DIR: Regex = Regex::new(
        r"^(\d{2,})-([a-z0-9]+(?:-[a-z0-9]+)*)$"
    ).expect("TOPIC_DIR regex is valid");

    pub static ref TEMPLATE_PLACEHOLDER: Regex = Regex::new(
        r"\{([a-z][a-z0-9_]*)\}"
    ).expect("TEMPLATE_PLACEHOLDER regex is valid");

    // Go snippets
    pub static ref GO_PACKAGE_MAIN: Regex = Regex::new(
        r"(?m)^\s*package\s+main\b"
    ).expect("GO_PACKAGE_MAIN regex is valid");

    pub static ref GO_PACKAGE_ANY: Regex = Regex::new(
        r"(?m)^\s*package\s+\w+"
    ).expect("GO_PACKAGE_ANY regex is valid");

    pub static ref GO_FUNC_MAIN: Regex = Regex::new(
        r"\bfunc\s+main\s*\(\s*\)"
    ).expect("GO_FUNC_MAIN regex is valid");

    pub static ref GO_TOP_LEVEL_DECL: Regex = Regex::new(
        r"(?m)^(?:func|type|var|const)\b"
    ).expect("GO_TOP_LEVEL_DECL regex is valid");

    pub static ref GO_BLOCK_DECL: Regex = Regex::new(
        r"^(?:func|type)\b"
    ).expect("GO_BLOCK_DECL regex is valid");

    pub static ref GO_IMPORT: Regex = Regex::new(
        r"(?m)^\s*import\b"
    ).expect("GO_IMPORT regex is valid");
}

/// A run of document text: either prose or one fenced code block.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Prose(String),
    Fence {
        language: Option<String>,
        code: String,
        raw: String,
    },
}

impl Segment {
    pub fn raw(&self) -> &str {
        match self {
            Self::Prose(text) => text,
            Self::Fence { raw, .. } => raw,
        }
    }
}

/// Opening fence marker (three or more backticks or tildes) and its info string.
pub fn fence_open(line: &str) -> Option<(String, Option<String>)> {
    let trimmed = line.trim_start();
    for ch in ['`', '~'] {
        let count = trimmed.chars().take_while(|&c| c == ch).count();
        if count >= 3 {
            let info = trimmed[count..].split_whitespace().next().map(str::to_string);
            return Some((ch.to_string().repeat(count), info));
        }
    }
    None
}

pub fn fence_closes(line: &str, marker: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with(marker) && trimmed.chars().all(|c| Some(c) == marker.chars().next())
}

/// Splits `text` into prose and fenced segments. Concatenating every segment's
/// raw text reproduces the input. An unterminated fence runs to the end.
pub fn split_fenced(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut prose = String::new();
    let mut open: Option<(String, Option<String>, String, String)> = None;

    for line in text.split_inclusive('\n') {
        if let Some((marker, language, mut code, mut raw)) = open.take() {
            raw.push_str(line);
            if fence_closes(line, &marker) {
                segments.push(Segment::Fence { language, code, raw });
            } else {
                code.push_str(line);
                open = Some((marker, language, code, raw));
            }
            continue;
        }

        if let Some((marker, language)) = fence_open(line) {
            if !prose.is_empty() {
                segments.push(Segment::Prose(std::mem::take(&mut prose)));
            }
            open = Some((marker, language, String::new(), line.to_string()));
        } else {
            prose.push_str(line);
        }
    }

    if let Some((_, language, code, raw)) = open {
        segments.push(Segment::Fence { language, code, raw });
    }
    if !prose.is_empty() {
        segments.push(Segment::Prose(prose));
    }

    segments
}

/// `text` with every fenced block removed.
pub fn strip_fenced(text: &str) -> String {
    split_fenced(text)
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Prose(text) => Some(text),
            Segment::Fence { .. } => None,
        })
        .collect()
}

pub fn is_runnable_go(code: &str) -> bool {
    GO_PACKAGE_MAIN.is_match(code) && GO_FUNC_MAIN.is_match(code)
}
