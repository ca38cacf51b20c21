//! Unit tests for column and bookmark edits.
//!
//! Requirements: 3 (system columns refuse edits with feedback), 10.7

use std::sync::Arc;

use bookmark_board::app::BoardApp;
use bookmark_board::managers::bookmark_store::{BookmarkStore, MemoryBookmarkStore};
use bookmark_board::managers::storage_area::{KeyValueArea, LocalArea, SyncArea};
use bookmark_board::services::settings_engine::SettingsEngine;
use bookmark_board::types::board::BoardItem;
use bookmark_board::types::errors::EditError;
use bookmark_board::types::notice::{NoticeLevel, LONG_NOTICE_MILLIS};
use tempfile::TempDir;

fn app(dir: &TempDir) -> (BoardApp, Arc<MemoryBookmarkStore>) {
    let store = Arc::new(MemoryBookmarkStore::with_sample_tree());
    let remote: Arc<dyn KeyValueArea> = Arc::new(SyncArea::unavailable());
    let local: Arc<dyn KeyValueArea> = Arc::new(LocalArea::in_memory().unwrap());
    let settings = SettingsEngine::new(Some(dir.path().join("board.json").to_string_lossy().to_string()));
    let mut app = BoardApp::with_parts(store.clone(), remote, local, settings);
    app.render_board().unwrap();
    (app, store)
}

#[test]
fn test_rename_column_updates_store_and_board() {
    let dir = TempDir::new().unwrap();
    let (mut app, store) = app(&dir);
    app.rename_column("10", "  Web  ").unwrap();
    assert_eq!(store.get_tree().unwrap().find("10").unwrap().title, "Web");
    assert_eq!(app.board().column("10").unwrap().title, "Web");
    let notices = app.take_notices();
    assert_eq!(notices[0].message, "Column title updated to \"Web\"");
}

#[test]
fn test_rename_uncategorized_is_refused_with_long_notice() {
    let dir = TempDir::new().unwrap();
    let (mut app, _store) = app(&dir);
    let err = app.rename_column("uncategorized", "Loose").unwrap_err();
    assert!(matches!(err, EditError::ProtectedColumn(_)));
    let notices = app.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Info);
    assert_eq!(notices[0].duration_ms, LONG_NOTICE_MILLIS);
    assert!(notices[0].message.starts_with("Uncategorized column cannot be renamed"));
}

#[test]
fn test_rename_system_columns_is_refused() {
    let dir = TempDir::new().unwrap();
    let (mut app, store) = app(&dir);
    assert!(app.rename_column("2", "Mine").is_err());
    assert!(app.rename_column("3", "Phone").is_err());
    let notices = app.take_notices();
    assert!(notices[0].message.contains("Other Bookmarks"));
    assert!(notices[1].message.contains("Mobile Bookmarks"));
    assert_eq!(store.get_tree().unwrap().find("2").unwrap().title, "Other Bookmarks");
}

#[test]
fn test_blank_title_is_rejected() {
    let dir = TempDir::new().unwrap();
    let (mut app, _store) = app(&dir);
    assert_eq!(app.rename_column("10", "   "), Err(EditError::EmptyTitle));
    assert!(app.take_notices().is_empty());
}

#[test]
fn test_create_subfolder_appends_group() {
    let dir = TempDir::new().unwrap();
    let (mut app, _store) = app(&dir);
    let folder = app.create_subfolder("11", "Databases").unwrap();
    let column = app.board().column("11").unwrap();
    match column.items.last() {
        Some(BoardItem::Subfolder(view)) => {
            assert_eq!(view.folder_id, folder.id);
            assert_eq!(view.placeholder.as_deref(), Some("(Empty)"));
        }
        other => panic!("expected new subfolder, got {:?}", other),
    }
    assert_eq!(app.take_notices()[0].message, "Subfolder created");
}

#[test]
fn test_create_subfolder_on_uncategorized_is_refused() {
    let dir = TempDir::new().unwrap();
    let (mut app, _store) = app(&dir);
    assert!(matches!(
        app.create_subfolder("uncategorized", "X"),
        Err(EditError::ProtectedColumn(_))
    ));
}

#[test]
fn test_rename_subfolder() {
    let dir = TempDir::new().unwrap();
    let (mut app, _store) = app(&dir);
    let folder = app.create_subfolder("10", "Old").unwrap();
    app.take_notices();
    app.rename_subfolder(&folder.id, "New").unwrap();
    let column = app.board().column("10").unwrap();
    assert_eq!(column.subfolder(&folder.id).unwrap().title, "New");
    assert_eq!(app.take_notices()[0].message, "Subfolder title updated to \"New\"");
}

#[test]
fn test_delete_column_and_system_refusal() {
    let dir = TempDir::new().unwrap();
    let (mut app, _store) = app(&dir);
    app.delete_column("11").unwrap();
    assert!(app.board().column("11").is_none());
    assert!(app.delete_column("2").is_err());
    assert!(app.board().column("2").is_some());
}

#[test]
fn test_edit_and_delete_bookmark() {
    let dir = TempDir::new().unwrap();
    let (mut app, store) = app(&dir);
    app.edit_bookmark("121", Some("Hub"), Some("https://github.com/rust-lang"))
        .unwrap();
    let node = store.get_tree().unwrap().find("121").cloned().unwrap();
    assert_eq!(node.title, "Hub");
    assert_eq!(node.url.as_deref(), Some("https://github.com/rust-lang"));

    app.delete_bookmark("121").unwrap();
    assert!(store.get_tree().unwrap().find("121").is_none());
    assert_eq!(
        app.board().column("uncategorized").unwrap().root_bookmark_ids(),
        vec!["120"]
    );
}

#[test]
fn test_store_failure_becomes_error_notice() {
    let dir = TempDir::new().unwrap();
    let (mut app, _store) = app(&dir);
    let err = app.delete_bookmark("does-not-exist").unwrap_err();
    assert!(matches!(err, EditError::Store(_)));
    let notices = app.take_notices();
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert_eq!(notices[0].message, "Failed to delete bookmark");
}
