//! Unit tests for the RPC handler: every JSON-RPC method dispatched by `handle_method`.
//!
//! These tests go through the same code path as the `bookmark-board-rpc` binary,
//! using a temporary on-disk SQLite database and settings file.

use std::sync::Mutex;

use serde_json::{json, Value};
use tempfile::TempDir;

use bookmark_board::app::BoardApp;
use bookmark_board::rpc_handler::handle_method;

/// Create a fresh, rendered BoardApp backed by a temp directory.
fn setup() -> (Mutex<BoardApp>, TempDir) {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let settings = tmp.path().join("board.json").to_string_lossy().to_string();
    let app = BoardApp::open(tmp.path(), Some(settings)).expect("Failed to init BoardApp");
    let app = Mutex::new(app);
    handle_method(&app, "board.render", &json!({})).unwrap();
    (app, tmp)
}

fn column_ids(board: &Value) -> Vec<String> {
    board["columns"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["columnId"].as_str().unwrap().to_string())
        .collect()
}

// ─── Ping ───

#[test]
fn test_ping() {
    let (app, _tmp) = setup();
    let res = handle_method(&app, "ping", &json!({})).unwrap();
    assert_eq!(res, json!({"pong": true}));
}

// ─── Unknown method ───

#[test]
fn test_unknown_method_returns_error() {
    let (app, _tmp) = setup();
    let res = handle_method(&app, "nonexistent.method", &json!({}));
    assert!(res.unwrap_err().contains("unknown method"));
}

// ─── Board ───

#[test]
fn test_board_render_shape() {
    let (app, _tmp) = setup();
    let board = handle_method(&app, "board.render", &json!({})).unwrap();
    assert_eq!(column_ids(&board), vec!["10", "11", "uncategorized", "2", "3"]);
    assert_eq!(board["status"]["state"], "ready");
    assert_eq!(board["columns"][0]["items"][0]["type"], "bookmark");
    assert_eq!(board["columns"][0]["items"][0]["domain"], "developer.mozilla.org");
    assert_eq!(board["columns"][4]["placeholder"], "No bookmarks");
}

#[test]
fn test_board_drop_moves_card() {
    let (app, _tmp) = setup();
    let res = handle_method(
        &app,
        "board.drop",
        &json!({
            "itemId": "120",
            "kind": "bookmark",
            "destination": {"type": "columnRoot", "columnId": "10"},
            "index": 0
        }),
    )
    .unwrap();
    assert_eq!(res, json!({"parentId": "10", "index": 0}));

    let board = handle_method(&app, "board.get", &json!({})).unwrap();
    assert_eq!(board["columns"][0]["items"][0]["id"], "120");
    let notices = handle_method(&app, "notices.take", &json!({})).unwrap();
    assert_eq!(notices[0]["level"], "success");
    assert_eq!(notices[0]["message"], "Moved to \"Frontend\"");
}

#[test]
fn test_board_drop_rejects_bad_params() {
    let (app, _tmp) = setup();
    let res = handle_method(&app, "board.drop", &json!({"itemId": "120"}));
    assert!(res.unwrap_err().contains("invalid params"));
}

#[test]
fn test_board_drop_folder_onto_itself_is_refused() {
    let (app, _tmp) = setup();
    let res = handle_method(
        &app,
        "board.drop",
        &json!({
            "itemId": "10",
            "kind": "folder",
            "destination": {"type": "subfolder", "folderId": "10"},
            "index": 0
        }),
    );
    assert!(res.is_err());
    let notices = handle_method(&app, "notices.take", &json!({})).unwrap();
    assert_eq!(notices[0]["level"], "info");
}

#[test]
fn test_column_drop_returns_saved_order() {
    let (app, _tmp) = setup();
    let res = handle_method(&app, "board.columnDrop", &json!({"from": 0, "to": 1})).unwrap();
    assert_eq!(res["columnOrder"], json!(["11", "10", "uncategorized", "2", "3"]));

    let board = handle_method(&app, "board.render", &json!({})).unwrap();
    assert_eq!(column_ids(&board)[0], "11");

    let bad = handle_method(&app, "board.columnDrop", &json!({"from": 0, "to": 99}));
    assert!(bad.unwrap_err().contains("invalid column move"));
}

#[test]
fn test_remove_item_returns_patch() {
    let (app, _tmp) = setup();
    let patch = handle_method(&app, "board.removeItem", &json!({"id": "101"})).unwrap();
    assert_eq!(patch["columnId"], "10");
    assert_eq!(patch["count"], 1);
    assert_eq!(patch["fadeMs"], 300);

    let missing = handle_method(&app, "board.removeItem", &json!({"id": "nope"})).unwrap();
    assert!(missing.is_null());
}

#[test]
fn test_update_item_in_place() {
    let (app, _tmp) = setup();
    let res = handle_method(
        &app,
        "board.updateItem",
        &json!({"node": {"id": "102", "title": "React Docs", "url": "https://react.dev/learn"}}),
    )
    .unwrap();
    assert_eq!(res, json!({"updated": true}));
    let board = handle_method(&app, "board.get", &json!({})).unwrap();
    assert_eq!(board["columns"][0]["items"][1]["title"], "React Docs");
}

#[test]
fn test_toggle_subfolder() {
    let (app, _tmp) = setup();
    let folder = handle_method(
        &app,
        "board.createSubfolder",
        &json!({"columnId": "10", "title": "Tools"}),
    )
    .unwrap();
    let folder_id = folder["id"].as_str().unwrap().to_string();

    let first = handle_method(&app, "board.toggleSubfolder", &json!({"folderId": folder_id})).unwrap();
    let second = handle_method(&app, "board.toggleSubfolder", &json!({"folderId": folder_id})).unwrap();
    assert_ne!(first["expanded"], second["expanded"]);

    let unknown = handle_method(&app, "board.toggleSubfolder", &json!({"folderId": "nope"}));
    assert!(unknown.unwrap_err().contains("unknown subfolder"));
}

// ─── Column edits ───

#[test]
fn test_rename_column() {
    let (app, _tmp) = setup();
    let node = handle_method(
        &app,
        "board.renameColumn",
        &json!({"columnId": "11", "title": "Server"}),
    )
    .unwrap();
    assert_eq!(node["title"], "Server");
    let board = handle_method(&app, "board.get", &json!({})).unwrap();
    assert_eq!(board["columns"][1]["title"], "Server");
}

#[test]
fn test_rename_uncategorized_is_refused() {
    let (app, _tmp) = setup();
    let res = handle_method(
        &app,
        "board.renameColumn",
        &json!({"columnId": "uncategorized", "title": "Loose"}),
    );
    assert!(res.unwrap_err().contains("cannot be modified"));
    let notices = handle_method(&app, "notices.take", &json!({})).unwrap();
    assert_eq!(notices[0]["durationMs"], 5000);
}

#[test]
fn test_delete_column() {
    let (app, _tmp) = setup();
    handle_method(&app, "board.deleteColumn", &json!({"columnId": "11"})).unwrap();
    let board = handle_method(&app, "board.get", &json!({})).unwrap();
    assert!(!column_ids(&board).contains(&"11".to_string()));

    let res = handle_method(&app, "board.deleteColumn", &json!({"columnId": "3"}));
    assert!(res.is_err());
}

#[test]
fn test_missing_param_is_reported() {
    let (app, _tmp) = setup();
    let res = handle_method(&app, "board.renameColumn", &json!({"columnId": "10"}));
    assert_eq!(res.unwrap_err(), "missing title");
}

// ─── Bookmarks ───

#[test]
fn test_bookmark_edit_and_delete() {
    let (app, _tmp) = setup();
    let node = handle_method(
        &app,
        "bookmark.edit",
        &json!({"id": "201", "title": "YT"}),
    )
    .unwrap();
    assert_eq!(node["title"], "YT");
    assert_eq!(node["url"], "https://www.youtube.com/");

    handle_method(&app, "bookmark.delete", &json!({"id": "201"})).unwrap();
    let board = handle_method(&app, "board.get", &json!({})).unwrap();
    assert_eq!(board["columns"][3]["placeholder"], "No bookmarks");
}

// ─── Order, settings ───

#[test]
fn test_order_clear_restores_tree_order() {
    let (app, _tmp) = setup();
    handle_method(&app, "board.columnDrop", &json!({"from": 0, "to": 4})).unwrap();
    let board = handle_method(&app, "order.clear", &json!({})).unwrap();
    assert_eq!(column_ids(&board), vec!["10", "11", "uncategorized", "2", "3"]);
}

#[test]
fn test_settings_get_and_set() {
    let (app, _tmp) = setup();
    let settings = handle_method(&app, "settings.get", &json!({})).unwrap();
    assert_eq!(settings["reconcile"]["refresh_on_remove"], true);

    handle_method(
        &app,
        "settings.set",
        &json!({"key": "reconcile.fade_millis", "value": 500}),
    )
    .unwrap();
    let settings = handle_method(&app, "settings.get", &json!({})).unwrap();
    assert_eq!(settings["reconcile"]["fade_millis"], 500);

    let bad = handle_method(&app, "settings.set", &json!({"key": "nope.value", "value": 1}));
    assert!(bad.unwrap_err().contains("Invalid settings key"));
}
