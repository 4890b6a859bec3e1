//! Integration tests for source providers, reloads and bulk actions

use callboard::prelude::*;
use std::sync::Arc;

fn recording(id: &str, title: &str, category: &str) -> Recording {
    Recording::with_id(
        id,
        title.to_string(),
        "Fox Mulder".to_string(),
        Some(format!("Transcript of {}", title)),
        category.to_string(),
        "neutral".to_string(),
        vec!["qa".to_string()],
        "2024-05-01T10:00:00Z".to_string(),
        90,
    )
}

struct FailingProvider;

#[async_trait]
impl SourceProvider<Recording> for FailingProvider {
    async fn fetch_collection(&self) -> Result<Vec<Recording>> {
        Err(anyhow::anyhow!("recordings API returned 503"))
    }
}

#[tokio::test]
async fn test_reload_from_in_memory_source() {
    let store = InMemorySource::new();
    store.insert(recording("r1", "Billing dispute", "billing")).unwrap();

    let mut view: QueryView<Recording> = QueryView::new(Vec::new());
    assert!(reload_view(&mut view, &store).await.unwrap());
    assert_eq!(view.visible_len(), 1);

    store.insert(recording("r2", "Router reset", "support")).unwrap();
    reload_view(&mut view, &store).await.unwrap();
    assert_eq!(view.visible_ids(), vec!["r1", "r2"]);
}

#[tokio::test]
async fn test_failed_reload_keeps_last_good_collection() {
    let mut view = QueryView::new(vec![recording("r1", "Billing dispute", "billing")]);
    view.toggle("r1");

    let err = reload_view(&mut view, &FailingProvider).await.unwrap_err();
    assert!(matches!(err, SourceError::FetchFailed { .. }));
    assert_eq!(err.error_code(), "SOURCE_FETCH_FAILED");

    assert_eq!(view.visible_len(), 1);
    assert!(view.selection().is_selected("r1"));
}

#[tokio::test]
async fn test_stale_fetch_is_discarded() {
    let mut view = QueryView::new(vec![recording("r1", "Old", "billing")]);

    let slow = view.begin_fetch();
    let fast = view.begin_fetch();

    assert!(view.apply_fetched(fast, vec![recording("r2", "Fresh", "billing")]));
    assert!(!view.apply_fetched(slow, vec![recording("r3", "Stale", "billing")]));
    assert_eq!(view.visible_ids(), vec!["r2"]);
}

#[tokio::test]
async fn test_combined_source_concatenates_in_order() {
    let team_a = InMemorySource::from_records(vec![
        recording("a1", "Onboarding", "sales"),
        recording("a2", "Upsell", "sales"),
    ])
    .unwrap();
    let team_b = vec![recording("b1", "Outage", "support")];

    let combined = CombinedSource::<Recording>::new()
        .with_provider(Arc::new(team_a))
        .with_provider(Arc::new(team_b));

    let mut view = QueryView::<Recording>::new(Vec::new())
        .with_query(QueryState::new().with_filter("category", "sales"));
    reload_view(&mut view, &combined).await.unwrap();
    assert_eq!(view.visible_ids(), vec!["a1", "a2"]);

    let failing = combined.with_provider(Arc::new(FailingProvider));
    assert!(failing.fetch_collection().await.is_err());
}

#[tokio::test]
async fn test_bulk_action_over_filtered_selection() {
    let mut view = QueryView::new(vec![
        recording("r1", "Refund call", "billing"),
        recording("r2", "Password reset", "support"),
        recording("r3", "Invoice question", "billing"),
    ]);
    view.set_filter("category", "billing");
    view.toggle_all();

    let sink = CollectingNotifier::new();
    let count = dispatch_bulk(&mut view, &sink, "export", |records| async move {
        assert_eq!(records.len(), 2);
        Ok::<(), anyhow::Error>(())
    })
    .await
    .unwrap();

    assert_eq!(count, 2);
    assert_eq!(view.selection_state(), SelectionState::Empty);
    let received = sink.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].0, NotificationKind::Success);
}

#[tokio::test]
async fn test_bulk_failure_converts_to_error_response() {
    let mut view = QueryView::new(vec![recording("r1", "Refund call", "billing")]);
    view.toggle("r1");

    let err = dispatch_bulk(&mut view, &TracingNotifier, "export", |_| async {
        Err::<(), _>(anyhow::anyhow!("storage quota exceeded"))
    })
    .await
    .unwrap_err();

    let response = CallboardError::from(err).to_response();
    assert_eq!(response.code, "BULK_ACTION_FAILED");
    assert!(response.message.contains("storage quota exceeded"));
    assert_eq!(view.selected_ids().len(), 1);
}
