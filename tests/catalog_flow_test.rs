#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use ucp_works::abort::{AbortController, AbortSignal};
    use ucp_works::app::catalog_loader::{LoadOutcome, RevealKind, WorkCatalogLoader};
    use ucp_works::app::ports::{AddressPort, ContentStorePort, SessionStorePort};
    use ucp_works::constants::CACHE_KEY;
    use ucp_works::domain::WorkItem;
    use ucp_works::error::{Result, WorksError};
    use ucp_works::infra::address::InMemoryAddress;
    use ucp_works::infra::session_store::{FileSessionStore, InMemorySessionStore};

    struct FixedStore(Value);

    #[async_trait]
    impl ContentStorePort for FixedStore {
        async fn fetch(&self, _query: &str, _params: &[(String, Value)], _signal: &AbortSignal) -> Result<Value> {
            Ok(self.0.clone())
        }
    }

    struct OfflineStore;

    #[async_trait]
    impl ContentStorePort for OfflineStore {
        async fn fetch(&self, _query: &str, _params: &[(String, Value)], _signal: &AbortSignal) -> Result<Value> {
            Err(WorksError::Status { status: 503, body: "unavailable".into() })
        }
    }

    /// Honors the signal the way a real client does.
    struct SlowStore;

    #[async_trait]
    impl ContentStorePort for SlowStore {
        async fn fetch(&self, _query: &str, _params: &[(String, Value)], signal: &AbortSignal) -> Result<Value> {
            signal.aborted().await;
            Err(WorksError::Aborted)
        }
    }

    fn feed() -> Value {
        json!([
            {
                "_id": "w3", "title": "Hull Survey", "slug": "hull-survey", "date": "2024-03-10",
                "category": "Survey", "excerpt": "Underwater hull inspection",
                "thumbnail": "https://cdn.sanity.io/images/hull.jpg",
                "images": ["https://cdn.sanity.io/images/hull-1.jpg"],
                "details": ["Diver inspection", "Thickness gauging"],
                "fullDescription": [{ "_type": "block", "style": "normal", "children": [{ "_type": "span", "text": "Completed in Lagos." }] }]
            },
            { "_id": "w2", "title": "Anchor Handling", "slug": "anchor-handling", "date": "2024-02-01" },
            { "_id": "w1", "title": "Draft Survey", "slug": "draft-survey", "date": "2023-12-20", "category": null }
        ])
    }

    fn address() -> Arc<InMemoryAddress> {
        Arc::new(InMemoryAddress::for_page("https://ucp.example", "/Our-works").unwrap())
    }

    #[tokio::test]
    async fn test_second_session_shows_snapshot_before_fetching() {
        let dir = tempfile::tempdir().unwrap();

        let mut first = WorkCatalogLoader::new(
            Arc::new(FixedStore(feed())),
            Arc::new(FileSessionStore::new(dir.path())),
            address(),
        );
        assert_eq!(first.load(&AbortSignal::never()).await, LoadOutcome::Fresh(3));

        // Next visit: the store is down but the snapshot is still there.
        let mut second = WorkCatalogLoader::new(
            Arc::new(OfflineStore),
            Arc::new(FileSessionStore::new(dir.path())),
            address(),
        );
        assert_eq!(second.load(&AbortSignal::never()).await, LoadOutcome::Failed);
        assert_eq!(second.catalog(), first.catalog());
        assert_eq!(second.error(), Some("Unable to load works. Please check your connection."));
    }

    #[tokio::test]
    async fn test_bookmarked_address_selects_on_load() {
        let addr = Arc::new(InMemoryAddress::new("https://ucp.example/Our-works?work=anchor-handling").unwrap());
        let mut loader = WorkCatalogLoader::new(
            Arc::new(FixedStore(feed())),
            Arc::new(InMemorySessionStore::new()),
            addr.clone(),
        );

        assert!(loader.selected().is_none());
        loader.load(&AbortSignal::never()).await;

        let selected = loader.selected().unwrap();
        assert_eq!(selected.id, "w2");
        assert_eq!(selected.category, "General");
        let others: Vec<&str> = loader.sidebar_works().iter().map(|w| w.slug.as_str()).collect();
        assert_eq!(others, ["hull-survey", "draft-survey"]);

        loader.close_item();
        assert_eq!(addr.href(), "https://ucp.example/Our-works");
        assert_eq!(loader.sidebar_works().len(), 3);
    }

    #[tokio::test]
    async fn test_unmount_before_fetch_resolves_leaves_state_alone() {
        let session = Arc::new(InMemorySessionStore::new());
        let mut loader = WorkCatalogLoader::new(Arc::new(SlowStore), session.clone(), address());

        let controller = AbortController::new();
        let signal = controller.signal();
        let (outcome, _) = tokio::join!(loader.load(&signal), async move {
            tokio::task::yield_now().await;
            drop(controller);
        });

        assert_eq!(outcome, LoadOutcome::Aborted);
        assert!(loader.catalog().is_empty());
        assert!(loader.error().is_none());
        assert!(session.get_item(CACHE_KEY).is_none());
    }

    #[tokio::test]
    async fn test_fresh_fetch_overwrites_snapshot() {
        let session = Arc::new(InMemorySessionStore::new());
        let stale = vec![WorkItem {
            id: "old".into(),
            title: "Old".into(),
            slug: "old".into(),
            category: "General".into(),
            date: "2020-01-01".into(),
            duration: None,
            thumbnail: None,
            images: vec![],
            excerpt: String::new(),
            details: vec![],
            full_description: vec![],
        }];
        session.set_item(CACHE_KEY, &serde_json::to_string(&stale).unwrap()).unwrap();

        let mut loader = WorkCatalogLoader::new(Arc::new(FixedStore(feed())), session.clone(), address());
        assert!(loader.hydrate_from_cache());
        assert_eq!(loader.catalog().items()[0].id, "old");

        loader.refresh(&AbortSignal::never()).await;
        let cached: Vec<WorkItem> = serde_json::from_str(&session.get_item(CACHE_KEY).unwrap()).unwrap();
        assert_eq!(cached.len(), 3);
        assert_eq!(cached[0].slug, "hull-survey");
    }

    #[tokio::test]
    async fn test_reveal_more_never_fetches() {
        let mut loader = WorkCatalogLoader::new(Arc::new(OfflineStore), Arc::new(InMemorySessionStore::new()), address());
        let many: Vec<Value> = (0..10).map(|i| json!({ "_id": i.to_string(), "slug": format!("w-{}", i) })).collect();
        let mut fed = WorkCatalogLoader::new(Arc::new(FixedStore(Value::Array(many))), Arc::new(InMemorySessionStore::new()), address());
        fed.load(&AbortSignal::never()).await;

        assert_eq!(fed.displayed_works().len(), 3);
        fed.reveal_more(RevealKind::Primary);
        assert_eq!(fed.displayed_works().len(), 7);
        fed.reveal_more(RevealKind::Primary);
        fed.reveal_more(RevealKind::Primary);
        assert_eq!(fed.displayed_works().len(), 10);

        loader.reveal_more(RevealKind::Primary);
        assert!(loader.error().is_none());
    }
}
