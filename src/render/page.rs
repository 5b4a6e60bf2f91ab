use crate::app::catalog_loader::{RevealKind, WorkCatalogLoader};
use crate::app::share::{share_url_for, work_href, Notification, NotificationKind};
use crate::config::SiteConfig;
use crate::constants::SHORT_EXCERPT_WORDS;
use crate::domain::WorkItem;
use crate::error::Result;
use crate::render::blocks::{parse_blocks, render_html};
use crate::render::image::{image_src, onerror_fallback};
use askama::Template;

#[derive(Debug, Clone)]
pub struct WorkCardView {
    pub href: String,
    pub title: String,
    pub category: String,
    pub date: String,
    pub excerpt: String,
    pub short_excerpt: String,
    /// Thumbnail source, already resolved against the placeholder.
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone)]
pub struct WorkDetailView {
    pub slug: String,
    pub title: String,
    pub category: String,
    pub date: String,
    pub duration: Option<String>,
    pub excerpt: String,
    pub share_url: String,
    pub details_html: String,
    pub gallery: Vec<String>,
    pub full_description_html: String,
}

#[derive(Debug, Clone)]
pub struct NotificationView {
    pub kind: String,
    pub message: String,
}

#[derive(Template)]
#[template(path = "works.html")]
pub struct WorksPageTemplate {
    pub catalog_path: String,
    pub onerror: String,
    pub notification: Option<NotificationView>,
    pub error: Option<String>,
    pub detail: Option<WorkDetailView>,
    pub skeleton: bool,
    pub cards: Vec<WorkCardView>,
    pub show_more_primary: bool,
    pub sidebar_heading: String,
    pub sidebar: Vec<WorkCardView>,
    pub show_more_sidebar: bool,
}

fn card_view(work: &WorkItem, site: &SiteConfig) -> WorkCardView {
    WorkCardView {
        href: work_href(&site.catalog_path, &work.slug),
        title: work.title.clone(),
        category: work.category.clone(),
        date: work.date.clone(),
        excerpt: work.excerpt.clone(),
        short_excerpt: work.short_excerpt(SHORT_EXCERPT_WORDS),
        thumbnail: work
            .thumbnail
            .as_deref()
            .map(|src| image_src(Some(src), &site.placeholder_image).to_string()),
    }
}

fn detail_view(work: &WorkItem, site: &SiteConfig) -> WorkDetailView {
    WorkDetailView {
        slug: work.slug.clone(),
        title: work.title.clone(),
        category: work.category.clone(),
        date: work.date.clone(),
        duration: work.duration.clone(),
        excerpt: work.excerpt.clone(),
        share_url: share_url_for(&site.origin, &site.catalog_path, &work.slug),
        details_html: render_html(&parse_blocks(&work.details)),
        gallery: work
            .images
            .iter()
            .map(|src| image_src(Some(src.as_str()), &site.placeholder_image).to_string())
            .collect(),
        full_description_html: render_html(&parse_blocks(&work.full_description)),
    }
}

impl WorksPageTemplate {
    /// Projects the loader's current state into the page: the detail view when
    /// the address selects a known item, the paginated list otherwise.
    pub fn from_loader(loader: &WorkCatalogLoader, site: &SiteConfig, notification: Option<&Notification>) -> Self {
        let selected = loader.selected();
        Self {
            catalog_path: site.catalog_path.clone(),
            onerror: onerror_fallback(&site.placeholder_image),
            notification: notification.map(|n| NotificationView {
                kind: match n.kind {
                    NotificationKind::Success => "success".to_string(),
                    NotificationKind::Error => "error".to_string(),
                },
                message: n.message.clone(),
            }),
            error: loader.error().map(str::to_string),
            detail: selected.map(|w| detail_view(w, site)),
            skeleton: loader.catalog().is_empty(),
            cards: loader.displayed_works().iter().map(|w| card_view(w, site)).collect(),
            show_more_primary: loader.can_reveal_more(RevealKind::Primary),
            sidebar_heading: loader.sidebar_heading().to_string(),
            sidebar: loader.sidebar_works().into_iter().map(|w| card_view(w, site)).collect(),
            show_more_sidebar: loader.can_reveal_more(RevealKind::Sidebar),
        }
    }
}

pub fn render_works_page(
    loader: &WorkCatalogLoader,
    site: &SiteConfig,
    notification: Option<&Notification>,
) -> Result<String> {
    Ok(WorksPageTemplate::from_loader(loader, site, notification).render()?)
}
