//! The work catalog as seen by one page session.
//!
//! [`WorkCatalogLoader`] owns the catalog, the connectivity error, and the two
//! visible-count counters. The selected item is never stored here: it is read
//! back from the navigable address on every call so it survives reloads and
//! can be bookmarked.

use crate::abort::AbortSignal;
use crate::app::ports::{AddressPort, ContentStorePort, SessionStorePort};
use crate::constants::{
    CACHE_KEY, LOAD_ERROR_MESSAGE, PRIMARY_INITIAL_VISIBLE, PRIMARY_REVEAL_STEP, SIDEBAR_INITIAL_VISIBLE,
    SIDEBAR_REVEAL_STEP, WORKS_QUERY, WORK_QUERY_PARAM,
};
use crate::domain::{Catalog, WorkItem};
use crate::error::{Result, WorksError};
use crate::normalize::normalize_batch;
use crate::observability::metrics;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealKind {
    Primary,
    Sidebar,
}

impl RevealKind {
    pub fn step(self) -> usize {
        match self {
            RevealKind::Primary => PRIMARY_REVEAL_STEP,
            RevealKind::Sidebar => SIDEBAR_REVEAL_STEP,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A fresh catalog of this many items replaced whatever was shown.
    Fresh(usize),
    /// The fetch failed; the previous catalog (if any) is still shown alongside the error.
    Failed,
    /// The page went away first. Nothing was touched.
    Aborted,
}

pub struct WorkCatalogLoader {
    store: Arc<dyn ContentStorePort>,
    session: Arc<dyn SessionStorePort>,
    address: Arc<dyn AddressPort>,
    cache_key: String,
    catalog: Catalog,
    error: Option<String>,
    visible_primary: usize,
    visible_sidebar: usize,
}

impl WorkCatalogLoader {
    pub fn new(
        store: Arc<dyn ContentStorePort>,
        session: Arc<dyn SessionStorePort>,
        address: Arc<dyn AddressPort>,
    ) -> Self {
        Self {
            store,
            session,
            address,
            cache_key: CACHE_KEY.to_string(),
            catalog: Catalog::default(),
            error: None,
            visible_primary: PRIMARY_INITIAL_VISIBLE,
            visible_sidebar: SIDEBAR_INITIAL_VISIBLE,
        }
    }

    pub fn with_cache_key(mut self, cache_key: impl Into<String>) -> Self {
        self.cache_key = cache_key.into();
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn visible_count(&self, kind: RevealKind) -> usize {
        match kind {
            RevealKind::Primary => self.visible_primary,
            RevealKind::Sidebar => self.visible_sidebar,
        }
    }

    /// Shows the cached snapshot (if any), then revalidates against the store.
    #[instrument(skip(self, signal))]
    pub async fn load(&mut self, signal: &AbortSignal) -> LoadOutcome {
        self.hydrate_from_cache();
        self.refresh(signal).await
    }

    /// Installs the session snapshot when it holds a non-empty list.
    /// Returns whether anything was installed. A missing or corrupt snapshot is a miss.
    pub fn hydrate_from_cache(&mut self) -> bool {
        let Some(cached) = self.session.get_item(&self.cache_key) else {
            metrics::cache::miss();
            return false;
        };

        match serde_json::from_str::<Catalog>(&cached) {
            Ok(catalog) if !catalog.is_empty() => {
                debug!("Showing {} cached works while revalidating", catalog.len());
                metrics::cache::hit();
                self.catalog = catalog;
                true
            }
            Ok(_) => {
                metrics::cache::miss();
                false
            }
            Err(e) => {
                debug!("Discarding unreadable works cache: {}", e);
                self.session.remove_item(&self.cache_key);
                metrics::cache::miss();
                false
            }
        }
    }

    /// Fetches the catalog. On success the catalog and the snapshot are replaced;
    /// on failure the current catalog stays and the error message is set.
    pub async fn refresh(&mut self, signal: &AbortSignal) -> LoadOutcome {
        if signal.is_aborted() {
            metrics::fetch::aborted();
            return LoadOutcome::Aborted;
        }

        let store = Arc::clone(&self.store);
        let fetched = tokio::select! {
            biased;
            _ = signal.aborted() => Err(WorksError::Aborted),
            result = store.fetch(WORKS_QUERY, &[], signal) => result,
        };

        let records = match fetched.and_then(expect_array) {
            Ok(records) => records,
            Err(e) if e.is_aborted() => {
                debug!("Works fetch aborted");
                metrics::fetch::aborted();
                return LoadOutcome::Aborted;
            }
            Err(e) => {
                warn!("Failed to fetch works: {}", e);
                metrics::fetch::error();
                self.error = Some(LOAD_ERROR_MESSAGE.to_string());
                return LoadOutcome::Failed;
            }
        };

        // A late abort still wins: the page is gone, so the result is dropped.
        if signal.is_aborted() {
            metrics::fetch::aborted();
            return LoadOutcome::Aborted;
        }

        let items = normalize_batch(&records);
        let count = items.len();
        metrics::fetch::success(count);
        info!("Loaded {} works from the content store", count);

        self.catalog = Catalog::new(items);
        self.error = None;
        self.write_cache();
        LoadOutcome::Fresh(count)
    }

    fn write_cache(&self) {
        let snapshot = match serde_json::to_string(&self.catalog) {
            Ok(s) => s,
            Err(e) => {
                debug!("Could not serialize works cache: {}", e);
                return;
            }
        };
        if let Err(e) = self.session.set_item(&self.cache_key, &snapshot) {
            debug!("Could not write works cache: {}", e);
        }
    }

    pub fn selected_slug(&self) -> Option<String> {
        self.address.query_param(WORK_QUERY_PARAM).filter(|s| !s.is_empty())
    }

    /// First item whose slug matches the address's `work` parameter.
    pub fn selected(&self) -> Option<&WorkItem> {
        let slug = self.selected_slug()?;
        self.catalog.find_by_slug(&slug)
    }

    pub fn select_item(&self, slug: &str) {
        debug!(slug, "Selecting work");
        self.address.replace_query_param(WORK_QUERY_PARAM, Some(slug));
    }

    pub fn close_item(&self) {
        self.address.replace_query_param(WORK_QUERY_PARAM, None);
    }

    /// Grows the given list by its step, never past the catalog length.
    pub fn reveal_more(&mut self, kind: RevealKind) {
        let total = self.catalog.len();
        if total == 0 {
            return;
        }
        let counter = match kind {
            RevealKind::Primary => &mut self.visible_primary,
            RevealKind::Sidebar => &mut self.visible_sidebar,
        };
        *counter = (*counter + kind.step()).min(total);
    }

    pub fn displayed_works(&self) -> &[WorkItem] {
        self.catalog.first(self.visible_primary)
    }

    /// Every item except the selected one, capped at the sidebar's visible count.
    pub fn sidebar_works(&self) -> Vec<&WorkItem> {
        self.sidebar_pool().take(self.visible_sidebar).collect()
    }

    fn sidebar_pool(&self) -> impl Iterator<Item = &WorkItem> {
        let selected_id = self.selected().map(|w| w.id.clone());
        self.catalog
            .items()
            .iter()
            .filter(move |w| selected_id.as_deref() != Some(w.id.as_str()))
    }

    pub fn can_reveal_more(&self, kind: RevealKind) -> bool {
        if self.catalog.is_empty() {
            return false;
        }
        match kind {
            RevealKind::Primary => self.visible_primary < self.catalog.len(),
            RevealKind::Sidebar => self.visible_sidebar < self.sidebar_pool().count(),
        }
    }

    pub fn sidebar_heading(&self) -> &'static str {
        if self.selected().is_some() {
            "Other Works"
        } else {
            "Recent Works"
        }
    }

    /// Newest `n` items, as shown in the home page's featured strip.
    pub fn featured(&self, n: usize) -> &[WorkItem] {
        self.catalog.first(n)
    }
}

fn expect_array(payload: Value) -> Result<Vec<Value>> {
    match payload {
        Value::Array(records) => Ok(records),
        other => Err(WorksError::MalformedResponse(format!(
            "expected an array of works, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
