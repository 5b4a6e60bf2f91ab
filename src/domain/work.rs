use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n+").expect("valid newline regex"));

/// A single portfolio entry, as normalized from the content store.
///
/// The serialized form is the session-cache format: camelCase keys with the
/// store's `_id`. Every collection field is always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub slug: String,
    pub category: String,
    /// `YYYY-MM-DD` as authored; the store orders by it, newest first.
    pub date: String,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub excerpt: String,
    /// Structured-text blocks in their portable JSON form.
    #[serde(default)]
    pub details: Vec<serde_json::Value>,
    #[serde(default)]
    pub full_description: Vec<serde_json::Value>,
}

impl WorkItem {
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()
    }

    /// First `max_words` words of the excerpt on one line, with `...` when cut.
    pub fn short_excerpt(&self, max_words: usize) -> String {
        let flat = NEWLINES.replace_all(&self.excerpt, " ");
        let flat = flat.trim();
        // split(' ') rather than split_whitespace: word counting follows single spaces
        let words: Vec<&str> = flat.split(' ').collect();
        let mut short = words.iter().take(max_words).copied().collect::<Vec<_>>().join(" ");
        if words.len() > max_words {
            short.push_str("...");
        }
        short
    }

    pub fn has_gallery(&self) -> bool {
        !self.images.is_empty()
    }
}

/// The ordered collection of work items for the current session.
///
/// Order is whatever the store returned (date descending); it is never re-sorted here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    items: Vec<WorkItem>,
}

impl Catalog {
    pub fn new(items: Vec<WorkItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[WorkItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Duplicate slugs are kept; lookup resolves to the first in catalog order.
    pub fn find_by_slug(&self, slug: &str) -> Option<&WorkItem> {
        self.items.iter().find(|w| w.slug == slug)
    }

    pub fn first(&self, n: usize) -> &[WorkItem] {
        &self.items[..n.min(self.items.len())]
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::WorkItem;

    pub fn work(id: &str, slug: &str) -> WorkItem {
        WorkItem {
            id: id.to_string(),
            title: format!("Work {}", id),
            slug: slug.to_string(),
            category: "Survey".to_string(),
            date: "2024-01-10".to_string(),
            duration: None,
            thumbnail: None,
            images: Vec::new(),
            excerpt: String::new(),
            details: Vec::new(),
            full_description: Vec::new(),
        }
    }

    pub fn catalog_of(n: usize) -> Vec<WorkItem> {
        (0..n).map(|i| work(&format!("w{}", i), &format!("work-{}", i))).collect()
    }
}
