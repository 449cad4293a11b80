// file: src/parser/markdown.rs
// description: markdown structure extraction with pulldown-cmark
// reference: https://docs.rs/pulldown-cmark

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};

pub struct MarkdownParser;

#[derive(Debug, Clone, Default)]
pub struct ParsedMarkdown {
    /// Prose with markup and code blocks removed.
    pub plain_text: String,
    pub headings: Vec<Heading>,
    pub links: Vec<Link>,
    pub code_blocks: Vec<CodeBlock>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    pub level: u32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub text: String,
    pub url: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    pub language: Option<String>,
    pub content: String,
}

impl CodeBlock {
    /// True when the first word of the info string equals `language`.
    pub fn is_language(&self, language: &str) -> bool {
        self.language
            .as_deref()
            .is_some_and(|lang| lang.eq_ignore_ascii_case(language))
    }
}

impl ParsedMarkdown {
    pub fn code_blocks_in(&self, language: &str) -> usize {
        self.code_blocks
            .iter()
            .filter(|block| block.is_language(language))
            .count()
    }
}

impl MarkdownParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, content: &str) -> ParsedMarkdown {
        let parser = Parser::new(content);

        let mut plain_text = String::new();
        let mut headings = Vec::new();
        let mut links = Vec::new();
        let mut code_blocks = Vec::new();

        let mut current_heading: Option<(u32, String)> = None;
        let mut current_link: Option<(String, String, String)> = None;
        let mut current_code: Option<(Option<String>, String)> = None;

        for event in parser {
            match event {
                Event::Start(Tag::Heading { level, .. }) => {
                    current_heading = Some((level as u32, String::new()));
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some((level, text)) = current_heading.take() {
                        headings.push(Heading {
                            level,
                            text: text.trim().to_string(),
                        });
                    }
                    plain_text.push('\n');
                }
                Event::Start(Tag::Link {
                    dest_url, title, ..
                }) => {
                    current_link = Some((dest_url.to_string(), title.to_string(), String::new()));
                }
                Event::End(TagEnd::Link) => {
                    if let Some((url, title, text)) = current_link.take() {
                        links.push(Link {
                            text: text.trim().to_string(),
                            url,
                            title: if title.is_empty() { None } else { Some(title) },
                        });
                    }
                }
                Event::Start(Tag::CodeBlock(kind)) => {
                    let language = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .map(|lang| lang.to_string()),
                        CodeBlockKind::Indented => None,
                    };
                    current_code = Some((language, String::new()));
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((language, content)) = current_code.take() {
                        code_blocks.push(CodeBlock { language, content });
                    }
                }
                Event::Text(text) | Event::Code(text) => {
                    if let Some((_, ref mut code)) = current_code {
                        code.push_str(&text);
                        continue;
                    }
                    if let Some((_, ref mut heading_text)) = current_heading {
                        heading_text.push_str(&text);
                    }
                    if let Some((_, _, ref mut link_text)) = current_link {
                        link_text.push_str(&text);
                    }
                    plain_text.push_str(&text);
                    plain_text.push(' ');
                }
                Event::SoftBreak | Event::HardBreak | Event::End(TagEnd::Paragraph) => {
                    plain_text.push('\n');
                }
                _ => {}
            }
        }

        ParsedMarkdown {
            plain_text: plain_text.trim().to_string(),
            headings,
            links,
            code_blocks,
        }
    }

    /// Plain text collapsed to single spaces, suitable for search indexing.
    pub fn searchable_text(&self, content: &str) -> String {
        self.parse(content)
            .plain_text
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_parsing() {
        let parser = MarkdownParser::new();
        let content = "# Title\n\nSome content here.";
        let parsed = parser.parse(content);

        assert_eq!(parsed.headings.len(), 1);
        assert_eq!(parsed.headings[0].text, "Title");
        assert_eq!(parsed.headings[0].level, 1);
        assert!(parsed.plain_text.contains("Some content"));
    }

    #[test]
    fn test_link_extraction() {
        let parser = MarkdownParser::new();
        let content = "See [the docs](https://go.dev/doc) and [next](../02-next/README.md).";
        let parsed = parser.parse(content);

        assert_eq!(parsed.links.len(), 2);
        assert_eq!(parsed.links[0].url, "https://go.dev/doc");
        assert_eq!(parsed.links[0].text, "the docs");
        assert_eq!(parsed.links[1].url, "../02-next/README.md");
    }

    #[test]
    fn test_code_blocks_carry_language_and_stay_out_of_text() {
        let parser = MarkdownParser::new();
        let content = "Intro\n\n```go\nfmt.Println(\"hi\")\n```\n\n```text\nhi\n```\n";
        let parsed = parser.parse(content);

        assert_eq!(parsed.code_blocks.len(), 2);
        assert_eq!(parsed.code_blocks[0].language.as_deref(), Some("go"));
        assert_eq!(parsed.code_blocks_in("go"), 1);
        assert!(!parsed.plain_text.contains("Println"));
    }

    #[test]
    fn test_searchable_text_strips_markup() {
        let parser = MarkdownParser::new();
        let text = parser.searchable_text("## Heading\n\nSome **bold** and `code`.\n\n```go\nx := 1\n```");
        assert_eq!(text, "Heading Some bold and code .");
    }
}
