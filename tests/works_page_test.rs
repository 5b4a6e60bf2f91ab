#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use ucp_works::abort::AbortSignal;
    use ucp_works::app::catalog_loader::WorkCatalogLoader;
    use ucp_works::app::ports::ContentStorePort;
    use ucp_works::app::share::{Notification, NotificationKind};
    use ucp_works::config::SiteConfig;
    use ucp_works::error::{Result, WorksError};
    use ucp_works::infra::address::InMemoryAddress;
    use ucp_works::infra::session_store::InMemorySessionStore;
    use ucp_works::render::render_works_page;

    struct FixedStore(Option<Value>);

    #[async_trait]
    impl ContentStorePort for FixedStore {
        async fn fetch(&self, _query: &str, _params: &[(String, Value)], _signal: &AbortSignal) -> Result<Value> {
            self.0.clone().ok_or_else(|| WorksError::MalformedResponse("down".into()))
        }
    }

    fn site() -> SiteConfig {
        SiteConfig {
            origin: "https://ucp.example".into(),
            ..SiteConfig::default()
        }
    }

    async fn loaded(feed: Option<Value>, href: &str) -> WorkCatalogLoader {
        let mut loader = WorkCatalogLoader::new(
            Arc::new(FixedStore(feed)),
            Arc::new(InMemorySessionStore::new()),
            Arc::new(InMemoryAddress::new(href).unwrap()),
        );
        loader.load(&AbortSignal::never()).await;
        loader
    }

    fn feed() -> Value {
        json!([
            {
                "_id": "w1", "title": "Hull Survey", "slug": "hull-survey", "date": "2024-01-10",
                "duration": "5 Days", "excerpt": "Hull <inspection> at Apapa",
                "thumbnail": "ftp://bad/thumb.jpg",
                "images": ["https://cdn.sanity.io/1.jpg", ""],
                "details": ["Diver survey"],
                "fullDescription": [
                    { "_type": "block", "style": "h2", "children": [{ "_type": "span", "text": "Outcome" }] },
                    { "_type": "block", "listItem": "bullet", "children": [{ "_type": "span", "text": "Class approved" }] }
                ]
            },
            { "_id": "w2", "title": "Draft Survey", "slug": "draft-survey", "date": "2023-12-01" }
        ])
    }

    #[tokio::test]
    async fn test_list_view_renders_cards_and_sidebar() {
        let loader = loaded(Some(feed()), "https://ucp.example/Our-works").await;
        let html = render_works_page(&loader, &site(), None).unwrap();

        assert!(html.contains("Work Portfolio"));
        assert!(html.contains("Recent Works"));
        assert!(html.contains("href=\"&#x2f;Our-works?work=hull-survey\"") || html.contains("href=\"/Our-works?work=hull-survey\""));
        assert!(html.contains("Hull &lt;inspection&gt; at Apapa"));
        // Unloadable thumbnail is swapped for the placeholder up front
        assert!(!html.contains("ftp:"));
        assert!(!html.contains("work-card-skeleton"));
        assert!(!html.contains("data-reveal=\"primary\""));
    }

    #[tokio::test]
    async fn test_detail_view_renders_structured_text_and_gallery() {
        let loader = loaded(Some(feed()), "https://ucp.example/Our-works?work=hull-survey").await;
        let html = render_works_page(&loader, &site(), None).unwrap();

        assert!(html.contains("work-detail"));
        assert!(!html.contains("Work Portfolio"));
        assert!(html.contains("Other Works"));
        assert!(html.contains("Duration: 5 Days"));
        assert!(html.contains("<p>Diver survey</p>"));
        assert!(html.contains("<h2>Outcome</h2><ul><li>Class approved</li></ul>"));
        assert!(html.contains("Image 1"));
        assert!(html.contains("Image 2"));
        assert!(html.contains("onerror="));
        assert!(html.contains("data-share-url="));
    }

    #[tokio::test]
    async fn test_empty_catalog_with_error_shows_skeleton_and_message() {
        let loader = loaded(None, "https://ucp.example/Our-works").await;
        let html = render_works_page(&loader, &site(), None).unwrap();

        assert!(html.contains("work-card-skeleton"));
        assert!(html.contains("Unable to load works. Please check your connection."));
    }

    #[tokio::test]
    async fn test_notification_is_rendered() {
        let loader = loaded(Some(feed()), "https://ucp.example/Our-works").await;
        let note = Notification { message: "Link copied to clipboard".into(), kind: NotificationKind::Success };
        let html = render_works_page(&loader, &site(), Some(&note)).unwrap();

        assert!(html.contains("notification-success"));
        assert!(html.contains("Link copied to clipboard"));
    }

    #[tokio::test]
    async fn test_unknown_selection_falls_back_to_list() {
        let loader = loaded(Some(feed()), "https://ucp.example/Our-works?work=missing").await;
        let html = render_works_page(&loader, &site(), None).unwrap();

        assert!(html.contains("Work Portfolio"));
        assert!(html.contains("Recent Works"));
    }
}
