//! Unit tests for OrderStore mode selection and best-effort persistence.
//!
//! Requirements: 4.4, 10.4

use std::collections::BTreeMap;
use std::sync::Arc;

use bookmark_board::managers::order_store::{collect_bookmark_order, OrderStore};
use bookmark_board::managers::storage_area::{KeyValueArea, LocalArea, SyncArea};
use bookmark_board::types::board::{
    Board, BoardColumn, BoardItem, BookmarkCard, ColumnKind, SubfolderView,
};
use bookmark_board::types::settings::StorageSettings;

fn ids(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

fn stores(remote: Arc<SyncArea>) -> (OrderStore, Arc<LocalArea>) {
    let local = Arc::new(LocalArea::in_memory().unwrap());
    let store = OrderStore::new(
        remote as Arc<dyn KeyValueArea>,
        local.clone() as Arc<dyn KeyValueArea>,
        &StorageSettings::default(),
    );
    (store, local)
}

fn card(id: &str) -> BookmarkCard {
    BookmarkCard {
        id: id.to_string(),
        title: id.to_string(),
        url: format!("https://{}.io", id),
        domain: format!("{}.io", id),
    }
}

#[test]
fn test_column_order_roundtrip_through_sync_area() {
    let remote = Arc::new(SyncArea::new(102_400, 8_192));
    let (store, local) = stores(remote.clone());
    store.save_column_order(&ids(&["11", "10", "uncategorized"]));
    assert_eq!(store.get_column_order(), Some(ids(&["11", "10", "uncategorized"])));
    assert!(local.get(&["bookmark_board_column_order"]).unwrap().is_empty());
}

#[test]
fn test_falls_back_to_local_when_sync_unavailable() {
    let remote = Arc::new(SyncArea::unavailable());
    let (store, local) = stores(remote);
    store.save_column_order(&ids(&["2", "10"]));
    assert_eq!(store.get_column_order(), Some(ids(&["2", "10"])));
    assert!(local.get(&["bookmark_board_column_order"]).unwrap().contains_key("bookmark_board_column_order"));
}

#[test]
fn test_probe_runs_per_call() {
    let remote = Arc::new(SyncArea::new(102_400, 8_192));
    let (store, _local) = stores(remote.clone());
    store.save_column_order(&ids(&["a"]));
    remote.set_available(false);
    assert_eq!(store.get_column_order(), None);
    remote.set_available(true);
    assert_eq!(store.get_column_order(), Some(ids(&["a"])));
}

#[test]
fn test_quota_failure_is_swallowed() {
    let remote = Arc::new(SyncArea::new(102_400, 16));
    let (store, _local) = stores(remote);
    store.save_column_order(&ids(&["a-very-long-column-id", "another"]));
    assert_eq!(store.get_column_order(), None);
}

#[test]
fn test_missing_maps_load_as_empty_record() {
    let (store, _local) = stores(Arc::new(SyncArea::unavailable()));
    let record = store.load_record();
    assert!(record.column_order.is_empty());
    assert!(record.bookmark_order.is_empty());
}

#[test]
fn test_clear_all_removes_both_maps() {
    let (store, _local) = stores(Arc::new(SyncArea::unavailable()));
    store.save_column_order(&ids(&["10"]));
    let mut map = BTreeMap::new();
    map.insert("10".to_string(), ids(&["101"]));
    store.save_bookmark_order(&map);
    store.clear_all();
    assert_eq!(store.get_column_order(), None);
    assert_eq!(store.get_bookmark_order(), None);
}

#[test]
fn test_collect_bookmark_order_keys_and_skips_empty() {
    let board = Board {
        columns: vec![
            BoardColumn {
                column_id: "10".to_string(),
                kind: ColumnKind::Folder,
                title: "Frontend".to_string(),
                count: 2,
                items: vec![
                    BoardItem::Bookmark(card("b2")),
                    BoardItem::Subfolder(SubfolderView {
                        folder_id: "sf1".to_string(),
                        title: "Inner".to_string(),
                        expanded: true,
                        items: vec![card("b9")],
                        placeholder: None,
                    }),
                    BoardItem::Subfolder(SubfolderView {
                        folder_id: "sf2".to_string(),
                        title: "Empty".to_string(),
                        expanded: true,
                        items: vec![],
                        placeholder: Some("(Empty)".to_string()),
                    }),
                ],
                placeholder: None,
            },
            BoardColumn {
                column_id: "uncategorized".to_string(),
                kind: ColumnKind::Uncategorized,
                title: "Uncategorized".to_string(),
                count: 0,
                items: vec![],
                placeholder: Some("No bookmarks".to_string()),
            },
        ],
        status: Default::default(),
    };
    let order = collect_bookmark_order(&board);
    assert_eq!(order.get("10"), Some(&ids(&["b2"])));
    assert_eq!(order.get("subfolder-sf1"), Some(&ids(&["b9"])));
    assert!(!order.contains_key("subfolder-sf2"));
    assert!(!order.contains_key("uncategorized"));
}
