// file: src/parser/normalizer.rs
// description: Markdown normalization for structural consistency
// reference: CommonMark block structure

pub struct MarkdownNormalizer;

impl MarkdownNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalizes headings, list markers, trailing whitespace and blank-line runs.
    ///
    /// Front matter and fenced code blocks are copied through untouched, and the
    /// result always ends with exactly one newline.
    pub fn normalize(&self, content: &str) -> String {
        let (front, body) = split_front_matter(content);

        let mut result: Vec<String> = Vec::new();
        let mut fence: Option<String> = None;
        let mut blank_run = 0;

        for line in body.lines() {
            if let Some(marker) = fence.as_deref() {
                if line.trim_start().starts_with(marker) {
                    fence = None;
                }
                result.push(line.trim_end().to_string());
                continue;
            }

            if let Some(marker) = fence_marker(line) {
                fence = Some(marker);
                blank_run = 0;
                result.push(line.trim_end().to_string());
                continue;
            }

            if line.trim().is_empty() {
                blank_run += 1;
                if blank_run == 1 {
                    result.push(String::new());
                }
                continue;
            }
            blank_run = 0;

            let line = self.normalize_heading(line);
            let line = self.normalize_list_item(&line);
            result.push(line.trim_end().to_string());
        }

        while result.last().is_some_and(|l| l.is_empty()) {
            result.pop();
        }

        let mut output = String::from(front);
        output.push_str(&result.join("\n"));
        output.push('\n');
        output
    }

    fn normalize_heading(&self, line: &str) -> String {
        let trimmed = line.trim();
        if !trimmed.starts_with('#') {
            return line.to_string();
        }

        let level = trimmed.chars().take_while(|&c| c == '#').count();
        let text = trimmed.trim_start_matches('#').trim();

        if !text.is_empty() && level <= 6 {
            format!("{} {}", "#".repeat(level), text)
        } else {
            line.to_string()
        }
    }

    fn normalize_list_item(&self, line: &str) -> String {
        let trimmed = line.trim_start();

        if let Some(stripped) = trimmed
            .strip_prefix("* ")
            .or_else(|| trimmed.strip_prefix("- "))
            .or_else(|| trimmed.strip_prefix("+ "))
        {
            let indent = line.len() - trimmed.len();
            let text = stripped.trim();
            format!("{}- {}", " ".repeat(indent), text)
        } else {
            line.to_string()
        }
    }
}

impl Default for MarkdownNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

fn fence_marker(line: &str) -> Option<String> {
    let trimmed = line.trim_start();
    for ch in ['`', '~'] {
        let count = trimmed.chars().take_while(|&c| c == ch).count();
        if count >= 3 {
            return Some(ch.to_string().repeat(count));
        }
    }
    None
}

/// Returns the raw front matter block (delimiters included) and the rest.
fn split_front_matter(content: &str) -> (&str, &str) {
    if !content.starts_with("---\n") && !content.starts_with("---\r\n") {
        return ("", content);
    }

    let mut offset = 0;
    for (index, line) in content.split_inclusive('\n').enumerate() {
        offset += line.len();
        if index > 0 && line.trim_end() == "---" {
            return content.split_at(offset);
        }
    }

    ("", content)
}
