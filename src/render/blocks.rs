//! Structured rich-text blocks (portable text) and their renderers.
//!
//! Parsing is total: anything that is not a recognizable text block becomes
//! [`TextBlock::Unknown`] and renders as plain text.

use crate::render::image::is_web_url;
use askama_escape::{escape, Html};
use reqwest::Url;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Bullet,
    Number,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mark {
    Strong,
    Emphasis,
    Link { href: String },
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub marks: Vec<Mark>,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into(), marks: Vec::new() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextBlock {
    Paragraph(Vec<Span>),
    Heading { level: u8, children: Vec<Span> },
    ListItem { kind: ListKind, level: u8, children: Vec<Span> },
    Unknown { kind: String, text: String },
}

pub fn parse_blocks(values: &[Value]) -> Vec<TextBlock> {
    values.iter().map(parse_block).collect()
}

pub fn parse_block(value: &Value) -> TextBlock {
    match value {
        Value::String(text) => TextBlock::Paragraph(vec![Span::plain(text.clone())]),
        Value::Object(obj) if obj.get("_type").and_then(Value::as_str) == Some("block") => parse_text_block(value),
        other => TextBlock::Unknown {
            kind: other
                .get("_type")
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_string(),
            text: loose_text(other),
        },
    }
}

fn parse_text_block(value: &Value) -> TextBlock {
    let mark_defs: HashMap<&str, Mark> = value
        .get("markDefs")
        .and_then(Value::as_array)
        .map(|defs| {
            defs.iter()
                .filter_map(|def| {
                    let key = def.get("_key")?.as_str()?;
                    let mark = match def.get("_type").and_then(Value::as_str) {
                        Some("link") => Mark::Link {
                            href: def.get("href").and_then(Value::as_str).unwrap_or_default().to_string(),
                        },
                        Some(other) => Mark::Unknown(other.to_string()),
                        None => Mark::Unknown(key.to_string()),
                    };
                    Some((key, mark))
                })
                .collect()
        })
        .unwrap_or_default();

    let children: Vec<Span> = value
        .get("children")
        .and_then(Value::as_array)
        .map(|children| {
            children
                .iter()
                .filter_map(|child| {
                    let text = child.get("text").and_then(Value::as_str)?;
                    let marks = child
                        .get("marks")
                        .and_then(Value::as_array)
                        .map(|marks| {
                            marks
                                .iter()
                                .filter_map(Value::as_str)
                                .map(|name| decorator(name, &mark_defs))
                                .collect()
                        })
                        .unwrap_or_default();
                    Some(Span { text: text.to_string(), marks })
                })
                .collect()
        })
        .unwrap_or_default();

    let level = value
        .get("level")
        .and_then(Value::as_u64)
        .map(|l| l.clamp(1, 6) as u8)
        .unwrap_or(1);

    match value.get("listItem").and_then(Value::as_str) {
        Some("bullet") => return TextBlock::ListItem { kind: ListKind::Bullet, level, children },
        Some("number") => return TextBlock::ListItem { kind: ListKind::Number, level, children },
        _ => {}
    }

    match value.get("style").and_then(Value::as_str) {
        Some(style) if style.len() == 2 && style.starts_with('h') => match style[1..].parse::<u8>() {
            Ok(level @ 1..=6) => TextBlock::Heading { level, children },
            _ => TextBlock::Paragraph(children),
        },
        // normal, blockquote and custom styles all read as paragraphs
        _ => TextBlock::Paragraph(children),
    }
}

fn decorator(name: &str, mark_defs: &HashMap<&str, Mark>) -> Mark {
    match name {
        "strong" => Mark::Strong,
        "em" => Mark::Emphasis,
        key => mark_defs.get(key).cloned().unwrap_or_else(|| Mark::Unknown(key.to_string())),
    }
}

/// Best-effort text from an unrecognized node: its `text`, or its children's.
fn loose_text(value: &Value) -> String {
    if let Some(text) = value.get("text").and_then(Value::as_str) {
        return text.to_string();
    }
    value
        .get("children")
        .and_then(Value::as_array)
        .map(|children| {
            children
                .iter()
                .filter_map(|c| c.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}

/// Link targets that may be rendered: web and site-relative URLs, `mailto:` and `tel:`.
fn is_safe_href(href: &str) -> bool {
    let href = href.trim();
    is_web_url(href) || matches!(Url::parse(href), Ok(url) if matches!(url.scheme(), "mailto" | "tel"))
}

fn safe_href(mark: &Mark) -> Option<&str> {
    match mark {
        Mark::Link { href } if is_safe_href(href) => Some(href.trim()),
        _ => None,
    }
}

fn push_escaped(out: &mut String, text: &str) {
    let _ = write!(out, "{}", escape(text, Html));
}

fn render_span_html(out: &mut String, span: &Span) {
    let mut closers: Vec<&str> = Vec::new();
    for mark in &span.marks {
        match mark {
            Mark::Strong => {
                out.push_str("<strong>");
                closers.push("</strong>");
            }
            Mark::Emphasis => {
                out.push_str("<em>");
                closers.push("</em>");
            }
            Mark::Link { .. } => {
                // unsafe targets keep their text but lose the anchor
                if let Some(href) = safe_href(mark) {
                    out.push_str("<a href=\"");
                    push_escaped(out, href);
                    out.push_str("\" target=\"_blank\" rel=\"noopener noreferrer\">");
                    closers.push("</a>");
                }
            }
            Mark::Unknown(_) => {}
        }
    }
    for (i, line) in span.text.split('\n').enumerate() {
        if i > 0 {
            out.push_str("<br/>");
        }
        push_escaped(out, line);
    }
    for closer in closers.iter().rev() {
        out.push_str(closer);
    }
}

fn render_children_html(out: &mut String, children: &[Span]) {
    for span in children {
        render_span_html(out, span);
    }
}

fn list_tags(kind: ListKind) -> (&'static str, &'static str) {
    match kind {
        ListKind::Bullet => ("<ul>", "</ul>"),
        ListKind::Number => ("<ol>", "</ol>"),
    }
}

/// Renders blocks to HTML. Consecutive list items share one list element and
/// a deeper level opens a nested list inside its parent item.
pub fn render_html(blocks: &[TextBlock]) -> String {
    let mut out = String::new();
    // Every open list has its last `<li>` still open.
    let mut open_lists: Vec<ListKind> = Vec::new();

    let close_to = |out: &mut String, open: &mut Vec<ListKind>, depth: usize| {
        while open.len() > depth {
            if let Some(kind) = open.pop() {
                out.push_str("</li>");
                out.push_str(list_tags(kind).1);
            }
        }
    };

    for block in blocks {
        match block {
            TextBlock::ListItem { kind, level, children } => {
                let depth = usize::from((*level).max(1));
                close_to(&mut out, &mut open_lists, depth);
                if open_lists.len() == depth && open_lists.last() != Some(kind) {
                    close_to(&mut out, &mut open_lists, depth - 1);
                }
                if open_lists.len() == depth {
                    out.push_str("</li>");
                }
                while open_lists.len() < depth {
                    out.push_str(list_tags(*kind).0);
                    open_lists.push(*kind);
                    if open_lists.len() < depth {
                        out.push_str("<li>");
                    }
                }
                out.push_str("<li>");
                render_children_html(&mut out, children);
            }
            other => {
                close_to(&mut out, &mut open_lists, 0);
                match other {
                    TextBlock::Paragraph(children) => {
                        out.push_str("<p>");
                        render_children_html(&mut out, children);
                        out.push_str("</p>");
                    }
                    TextBlock::Heading { level, children } => {
                        let _ = write!(out, "<h{}>", level);
                        render_children_html(&mut out, children);
                        let _ = write!(out, "</h{}>", level);
                    }
                    TextBlock::Unknown { text, .. } => {
                        if !text.is_empty() {
                            out.push_str("<p>");
                            push_escaped(&mut out, text);
                            out.push_str("</p>");
                        }
                    }
                    TextBlock::ListItem { .. } => unreachable!("list items handled above"),
                }
            }
        }
    }
    close_to(&mut out, &mut open_lists, 0);
    out
}

fn span_text(span: &Span) -> String {
    match span.marks.iter().find_map(safe_href) {
        Some(href) => format!("{} ({})", span.text, href),
        None => span.text.clone(),
    }
}

/// Renders blocks for a terminal: headings underlined, lists indented, link targets inline.
pub fn render_text(blocks: &[TextBlock]) -> String {
    let mut lines: Vec<String> = Vec::new();
    // Item counters per list level; index 0 is level 1.
    let mut counters: Vec<usize> = Vec::new();

    for block in blocks {
        if !matches!(block, TextBlock::ListItem { .. }) {
            counters.clear();
        }
        match block {
            TextBlock::Paragraph(children) => {
                lines.push(children.iter().map(span_text).collect());
                lines.push(String::new());
            }
            TextBlock::Heading { level, children } => {
                let text: String = children.iter().map(span_text).collect();
                let rule = if *level <= 2 { '=' } else { '-' };
                lines.push(text.clone());
                lines.push(rule.to_string().repeat(text.chars().count()));
                lines.push(String::new());
            }
            TextBlock::ListItem { kind, level, children } => {
                let depth = usize::from((*level).max(1));
                counters.truncate(depth);
                counters.resize(depth, 0);
                let indent = "  ".repeat(depth - 1);
                let bullet = match kind {
                    ListKind::Bullet => {
                        counters[depth - 1] = 0;
                        "-".to_string()
                    }
                    ListKind::Number => {
                        counters[depth - 1] += 1;
                        format!("{}.", counters[depth - 1])
                    }
                };
                let text: String = children.iter().map(span_text).collect();
                lines.push(format!("{}{} {}", indent, bullet, text));
            }
            TextBlock::Unknown { text, .. } => {
                if !text.is_empty() {
                    lines.push(text.clone());
                    lines.push(String::new());
                }
            }
        }
    }

    lines.join("\n").trim_end().to_string()
}
