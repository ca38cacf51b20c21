//! Unit tests for change reconciliation.
//!
//! Requirements: 4.5, 8 (removed ids never remain on the board)

use std::collections::BTreeMap;
use std::sync::Arc;

use bookmark_board::managers::bookmark_store::{BookmarkStore, MemoryBookmarkStore};
use bookmark_board::managers::order_store::OrderStore;
use bookmark_board::managers::storage_area::{KeyValueArea, LocalArea, SyncArea};
use bookmark_board::services::board_renderer::BoardRenderer;
use bookmark_board::services::change_reconciler::{ChangeReconciler, ReconcileStep};
use bookmark_board::types::bookmark::{ChangeEvent, ChangeKind, NodeChanges};
use bookmark_board::types::settings::{ReconcileSettings, StorageSettings};

fn order_store() -> OrderStore {
    let remote: Arc<dyn KeyValueArea> = Arc::new(SyncArea::unavailable());
    let local: Arc<dyn KeyValueArea> = Arc::new(LocalArea::in_memory().unwrap());
    OrderStore::new(remote, local, &StorageSettings::default())
}

fn settings(refresh_on_remove: bool) -> ReconcileSettings {
    ReconcileSettings {
        refresh_on_remove,
        ..ReconcileSettings::default()
    }
}

/// Removes `id` from the store and returns the notification it emitted.
fn remove_and_capture(store: &MemoryBookmarkStore, id: &str) -> ChangeEvent {
    let mut sub = store.subscribe(ChangeKind::Removed);
    store.remove(id).unwrap();
    sub.receiver.try_recv().unwrap()
}

#[test]
fn test_created_moved_changed_plan_a_full_render() {
    let store = MemoryBookmarkStore::with_sample_tree();
    let mut sub = store.subscribe(ChangeKind::Changed);
    store
        .update(
            "101",
            &NodeChanges {
                title: Some("MDN".to_string()),
                url: None,
            },
        )
        .unwrap();
    let event = sub.receiver.try_recv().unwrap();
    let reconciler = ChangeReconciler::new(&ReconcileSettings::default());
    assert_eq!(reconciler.plan(&event), vec![ReconcileStep::FullRender]);
}

#[test]
fn test_changed_event_rerenders_new_title() {
    let store = MemoryBookmarkStore::with_sample_tree();
    let orders = order_store();
    let mut renderer = BoardRenderer::new();
    renderer.render(&store, &orders).unwrap();

    let mut sub = store.subscribe(ChangeKind::Changed);
    store
        .update(
            "10",
            &NodeChanges {
                title: Some("Web".to_string()),
                url: None,
            },
        )
        .unwrap();
    let event = sub.receiver.try_recv().unwrap();

    let report = ChangeReconciler::new(&ReconcileSettings::default())
        .apply(&event, &store, &orders, &mut renderer);
    assert!(report.rendered);
    assert!(report.removal.is_none());
    assert_eq!(renderer.board().column("10").unwrap().title, "Web");
}

fn saved(entries: Vec<(&str, Vec<&str>)>) -> BTreeMap<String, Vec<String>> {
    entries
        .into_iter()
        .map(|(k, ids)| (k.to_string(), ids.into_iter().map(String::from).collect()))
        .collect()
}

#[test]
fn test_removed_with_refresh_patches_then_rerenders() {
    let store = MemoryBookmarkStore::with_sample_tree();
    let orders = order_store();
    orders.save_bookmark_order(&saved(vec![("10", vec!["102", "101"])]));
    let mut renderer = BoardRenderer::new();
    renderer.render(&store, &orders).unwrap();

    let event = remove_and_capture(&store, "101");
    let report = ChangeReconciler::new(&settings(true)).apply(&event, &store, &orders, &mut renderer);

    let patch = report.removal.unwrap();
    assert_eq!(patch.column_id, "10");
    assert_eq!(patch.count, 1);
    assert_eq!(patch.fade_ms, 300);
    assert!(report.rendered);
    assert!(!renderer.visible_ids().contains("101"));
    assert_eq!(
        report.saved_order.unwrap().get("10"),
        Some(&vec!["102".to_string()])
    );
}

#[test]
fn test_removed_without_refresh_still_drops_the_id() {
    let store = MemoryBookmarkStore::with_sample_tree();
    let orders = order_store();
    let mut renderer = BoardRenderer::new();
    renderer.render(&store, &orders).unwrap();

    let event = remove_and_capture(&store, "201");
    let report = ChangeReconciler::new(&settings(false)).apply(&event, &store, &orders, &mut renderer);

    assert!(!report.rendered);
    assert!(report.removal.unwrap().emptied);
    assert!(!renderer.visible_ids().contains("201"));
    assert_eq!(
        renderer.board().column("2").unwrap().placeholder.as_deref(),
        Some("No bookmarks")
    );
}

#[test]
fn test_removed_id_not_on_board_is_harmless() {
    let store = MemoryBookmarkStore::with_sample_tree();
    let orders = order_store();
    let mut renderer = BoardRenderer::new();

    let event = remove_and_capture(&store, "111");
    let report = ChangeReconciler::new(&settings(true)).apply(&event, &store, &orders, &mut renderer);
    assert!(report.removal.is_none());
    assert!(report.rendered);
    assert!(!renderer.visible_ids().contains("111"));
}

#[test]
fn test_removal_before_first_render_keeps_saved_order() {
    let store = MemoryBookmarkStore::with_sample_tree();
    let orders = order_store();
    orders.save_bookmark_order(&saved(vec![("10", vec!["102", "101"]), ("11", vec!["112", "111"])]));
    let mut renderer = BoardRenderer::new();

    let event = remove_and_capture(&store, "111");
    let report = ChangeReconciler::new(&settings(false)).apply(&event, &store, &orders, &mut renderer);
    assert!(report.removal.is_none());

    let expected = saved(vec![("10", vec!["102", "101"]), ("11", vec!["112"])]);
    assert_eq!(report.saved_order, Some(expected.clone()));
    assert_eq!(orders.get_bookmark_order(), Some(expected));

    renderer.render(&store, &orders).unwrap();
    assert_eq!(
        renderer.board().column("10").unwrap().root_bookmark_ids(),
        vec!["102", "101"]
    );
}

#[test]
fn test_removal_of_unsaved_id_leaves_record_untouched() {
    let store = MemoryBookmarkStore::with_sample_tree();
    let orders = order_store();
    orders.save_bookmark_order(&saved(vec![("10", vec!["102", "101"])]));
    let mut renderer = BoardRenderer::new();
    renderer.render(&store, &orders).unwrap();

    let event = remove_and_capture(&store, "201");
    let report = ChangeReconciler::new(&settings(true)).apply(&event, &store, &orders, &mut renderer);
    assert!(report.removal.is_some());
    assert!(report.saved_order.is_none());
    assert_eq!(orders.get_bookmark_order(), Some(saved(vec![("10", vec!["102", "101"])])));
}
