use crate::app::ports::{ClipboardPort, NativeSharePort, SharePayload};
use crate::constants::{NOTIFICATION_TTL_SECS, SHARE_ERROR_MESSAGE, SHARE_SUCCESS_MESSAGE, WORK_QUERY_PARAM};
use crate::domain::WorkItem;
use crate::observability::metrics;
use reqwest::Url;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

#[derive(Debug, Default)]
struct NotifierState {
    current: Option<Notification>,
    generation: u64,
}

/// Transient notifications that clear themselves after a fixed interval.
#[derive(Debug, Clone)]
pub struct Notifier {
    state: Arc<Mutex<NotifierState>>,
    ttl: Duration,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(Duration::from_secs(NOTIFICATION_TTL_SECS))
    }
}

impl Notifier {
    pub fn new(ttl: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(NotifierState::default())),
            ttl,
        }
    }

    pub fn current(&self) -> Option<Notification> {
        self.lock().current.clone()
    }

    /// Shows `notification` and schedules its removal. Must be called inside a tokio runtime.
    pub fn show(&self, notification: Notification) {
        let generation = {
            let mut state = self.lock();
            state.generation += 1;
            state.current = Some(notification);
            state.generation
        };
        self.schedule_dismiss(generation);
    }

    fn schedule_dismiss(&self, generation: u64) {
        let state = Arc::clone(&self.state);
        let ttl = self.ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let mut state = state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            // A newer notification owns its own timer.
            if state.generation == generation {
                state.current = None;
            }
        });
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, NotifierState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Canonical address of an item: origin + catalog path + `?work=<slug>`.
pub fn share_url_for(origin: &str, catalog_path: &str, slug: &str) -> String {
    match Url::parse(origin).and_then(|base| base.join(catalog_path)) {
        Ok(mut url) => {
            url.query_pairs_mut().clear().append_pair(WORK_QUERY_PARAM, slug);
            url.to_string()
        }
        Err(_) => format!("{}{}", origin.trim_end_matches('/'), work_href(catalog_path, slug)),
    }
}

/// Site-relative link to a work's detail view, `<catalog_path>?work=<slug>`,
/// with the slug form-encoded like the address encodes it.
pub fn work_href(catalog_path: &str, slug: &str) -> String {
    let query = Url::parse_with_params("http://localhost/", &[(WORK_QUERY_PARAM, slug)])
        .ok()
        .and_then(|url| url.query().map(str::to_string))
        .unwrap_or_else(|| format!("{}={}", WORK_QUERY_PARAM, slug));
    format!("{}?{}", catalog_path, query)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    Copied(String),
    Failed,
}

pub struct ShareService {
    native: Arc<dyn NativeSharePort>,
    clipboard: Arc<dyn ClipboardPort>,
    notifier: Notifier,
    origin: String,
    catalog_path: String,
}

impl ShareService {
    pub fn new(
        native: Arc<dyn NativeSharePort>,
        clipboard: Arc<dyn ClipboardPort>,
        notifier: Notifier,
        origin: impl Into<String>,
        catalog_path: impl Into<String>,
    ) -> Self {
        Self {
            native,
            clipboard,
            notifier,
            origin: origin.into(),
            catalog_path: catalog_path.into(),
        }
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn share_url(&self, item: &WorkItem) -> String {
        share_url_for(&self.origin, &self.catalog_path, &item.slug)
    }

    /// Shares through the platform when it can, otherwise copies the link.
    /// Returns `None` when nothing is selected.
    pub async fn share_item(&self, item: Option<&WorkItem>) -> Option<ShareOutcome> {
        let item = item?;
        let url = self.share_url(item);

        let result = if self.native.is_available() {
            let payload = SharePayload {
                title: item.title.clone(),
                text: item.excerpt.clone(),
                url: url.clone(),
            };
            self.native.share(&payload).await.map(|_| ShareOutcome::Shared)
        } else {
            match self.clipboard.write_text(&url).await {
                Ok(()) => {
                    self.notifier.show(Notification {
                        message: SHARE_SUCCESS_MESSAGE.to_string(),
                        kind: NotificationKind::Success,
                    });
                    Ok(ShareOutcome::Copied(url))
                }
                Err(e) => Err(e),
            }
        };

        match result {
            Ok(outcome) => {
                debug!(slug = %item.slug, ?outcome, "Shared work");
                metrics::share::completed();
                Some(outcome)
            }
            Err(e) => {
                error!("Failed to share work {}: {}", item.slug, e);
                metrics::share::failed();
                self.notifier.show(Notification {
                    message: SHARE_ERROR_MESSAGE.to_string(),
                    kind: NotificationKind::Error,
                });
                Some(ShareOutcome::Failed)
            }
        }
    }
}
