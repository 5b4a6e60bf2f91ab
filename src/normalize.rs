//! Raw content-store record → [`WorkItem`].
//!
//! Normalization is total: every field has an explicit default, so a record
//! with any combination of missing or oddly-shaped fields still produces an item.

use crate::constants::{DEFAULT_CATEGORY, DEFAULT_TITLE};
use crate::domain::WorkItem;
use serde_json::Value;
use tracing::debug;

/// A loosely-typed document as returned by the content store.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord(pub Value);

impl From<Value> for RawRecord {
    fn from(value: Value) -> Self {
        RawRecord(value)
    }
}

impl RawRecord {
    fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name).filter(|v| !v.is_null())
    }

    /// Non-empty string at `name`.
    fn text(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_str).filter(|s| !s.is_empty())
    }
}

/// `"url"` or `{ "asset": { "url": "..." } }`
fn asset_url(value: &Value) -> Option<&str> {
    value
        .as_str()
        .or_else(|| value.pointer("/asset/url").and_then(Value::as_str))
        .filter(|s| !s.is_empty())
}

fn block_array(record: &RawRecord, name: &str) -> Vec<Value> {
    record
        .field(name)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

pub fn normalize_record(record: &RawRecord) -> WorkItem {
    let id = match record.field("_id") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    };

    let slug = record
        .text("slug")
        .or_else(|| record.field("slug").and_then(|s| s.get("current")).and_then(Value::as_str))
        .unwrap_or_default()
        .to_string();

    let category = record
        .text("category")
        .or_else(|| record.field("category").and_then(|c| c.get("title")).and_then(Value::as_str))
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_CATEGORY)
        .to_string();

    let images = record
        .field("images")
        .and_then(Value::as_array)
        .map(|imgs| {
            imgs.iter()
                .map(|img| asset_url(img).unwrap_or_default().to_string())
                .collect()
        })
        .unwrap_or_default();

    if slug.is_empty() {
        debug!(id = %id, "Work record has no slug; it cannot be deep-linked");
    }

    WorkItem {
        id,
        title: record.text("title").unwrap_or(DEFAULT_TITLE).to_string(),
        slug,
        category,
        date: record
            .text("date")
            .or_else(|| record.text("publishedAt"))
            .unwrap_or_default()
            .to_string(),
        duration: record.text("duration").map(str::to_string),
        thumbnail: record.field("thumbnail").and_then(asset_url).map(str::to_string),
        images,
        excerpt: record
            .text("excerpt")
            .or_else(|| record.text("description"))
            .unwrap_or_default()
            .to_string(),
        details: block_array(record, "details"),
        full_description: block_array(record, "fullDescription"),
    }
}

pub fn normalize_batch(records: &[Value]) -> Vec<WorkItem> {
    records
        .iter()
        .map(|raw| normalize_record(&RawRecord::from(raw.clone())))
        .collect()
}
