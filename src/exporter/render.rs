// file: src/exporter/render.rs
// description: markdown to display node tree conversion
// reference: https://docs.rs/pulldown-cmark

use crate::models::DisplayNode;
use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag};

pub struct MarkdownRenderer;

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Structural transform of Markdown into nested display nodes.
    pub fn render(&self, markdown: &str) -> Vec<DisplayNode> {
        let mut root: Vec<DisplayNode> = Vec::new();
        let mut stack: Vec<DisplayNode> = Vec::new();

        for event in Parser::new(markdown) {
            match event {
                Event::Start(tag) => stack.push(open(tag)),
                Event::End(_) => {
                    if let Some(mut node) = stack.pop() {
                        if node.kind == "codeBlock" {
                            node.text = node.text.map(|t| t.trim_end_matches('\n').to_string());
                        }
                        append(&mut stack, &mut root, node);
                    }
                }
                Event::Text(text) => {
                    if let Some(code) = stack.last_mut().filter(|n| n.kind == "codeBlock") {
                        code.text.get_or_insert_with(String::new).push_str(&text);
                    } else {
                        push_text(&mut stack, &mut root, &text);
                    }
                }
                Event::Code(code) => {
                    append(&mut stack, &mut root, DisplayNode::text("code", code.to_string()))
                }
                Event::SoftBreak => push_text(&mut stack, &mut root, " "),
                Event::HardBreak => append(&mut stack, &mut root, DisplayNode::new("lineBreak")),
                Event::Rule => append(&mut stack, &mut root, DisplayNode::new("rule")),
                Event::Html(html) | Event::InlineHtml(html) => {
                    append(&mut stack, &mut root, DisplayNode::text("html", html.to_string()))
                }
                _ => {}
            }
        }

        // Unbalanced input: fold whatever is still open.
        while let Some(node) = stack.pop() {
            append(&mut stack, &mut root, node);
        }

        root
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn open(tag: Tag<'_>) -> DisplayNode {
    match tag {
        Tag::Paragraph => DisplayNode::new("paragraph"),
        Tag::Heading { level, .. } => DisplayNode {
            level: Some(level as u32),
            ..DisplayNode::new("heading")
        },
        Tag::BlockQuote(_) => DisplayNode::new("blockquote"),
        Tag::CodeBlock(kind) => DisplayNode {
            language: match kind {
                CodeBlockKind::Fenced(info) => {
                    info.split_whitespace().next().map(|lang| lang.to_string())
                }
                CodeBlockKind::Indented => None,
            },
            ..DisplayNode::new("codeBlock")
        },
        Tag::List(start) => DisplayNode {
            ordered: Some(start.is_some()),
            ..DisplayNode::new("list")
        },
        Tag::Item => DisplayNode::new("listItem"),
        Tag::Emphasis => DisplayNode::new("emphasis"),
        Tag::Strong => DisplayNode::new("strong"),
        Tag::Strikethrough => DisplayNode::new("strikethrough"),
        Tag::Link { dest_url, .. } => DisplayNode {
            href: Some(dest_url.to_string()),
            ..DisplayNode::new("link")
        },
        Tag::Image { dest_url, .. } => DisplayNode {
            href: Some(dest_url.to_string()),
            ..DisplayNode::new("image")
        },
        Tag::Table(_) => DisplayNode::new("table"),
        Tag::TableHead | Tag::TableRow => DisplayNode::new("tableRow"),
        Tag::TableCell => DisplayNode::new("tableCell"),
        _ => DisplayNode::new("fragment"),
    }
}

fn append(stack: &mut [DisplayNode], root: &mut Vec<DisplayNode>, node: DisplayNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => root.push(node),
    }
}

/// Appends text, merging into a directly preceding text node.
fn push_text(stack: &mut [DisplayNode], root: &mut Vec<DisplayNode>, text: &str) {
    let siblings = match stack.last_mut() {
        Some(parent) => &mut parent.children,
        None => root,
    };

    if let Some(last) = siblings.last_mut()
        && last.kind == "text"
    {
        last.text.get_or_insert_with(String::new).push_str(text);
        return;
    }

    siblings.push(DisplayNode::text("text", text));
}
