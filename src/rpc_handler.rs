//! RPC method handler for the Bookmark Board JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! `handle_method` dispatches a method call to the [`BoardApp`] and returns
//! the result as JSON.

use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::app::BoardApp;
use crate::services::drag_reconciler::DropRequest;
use crate::services::settings_engine::SettingsEngineTrait;
use crate::types::bookmark::BookmarkNode;

fn str_param<'a>(params: &'a Value, key: &str) -> Result<&'a str, String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", key))
}

fn usize_param(params: &Value, key: &str) -> Result<usize, String> {
    params
        .get(key)
        .and_then(|v| v.as_u64())
        .map(|n| n as usize)
        .ok_or_else(|| format!("missing {}", key))
}

fn parse<T: DeserializeOwned>(value: &Value) -> Result<T, String> {
    serde_json::from_value(value.clone()).map_err(|e| format!("invalid params: {}", e))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|e| e.to_string())
}

/// Dispatch a JSON-RPC method call.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub fn handle_method(app: &Mutex<BoardApp>, method: &str, params: &Value) -> Result<Value, String> {
    let mut a = app.lock().map_err(|e| e.to_string())?;
    match method {
        // ─── Board ───
        "board.render" => {
            // A failed render is reported through the board's status.
            let _ = a.render_board();
            to_json(a.board())
        }
        "board.get" => to_json(a.board()),
        "board.drop" => {
            let request: DropRequest = parse(params)?;
            let outcome = a.on_drop(&request).map_err(|e| e.to_string())?;
            to_json(&outcome)
        }
        "board.columnDrop" => {
            let from = usize_param(params, "from")?;
            let to = usize_param(params, "to")?;
            let order = a
                .move_column(from, to)
                .ok_or_else(|| format!("invalid column move {} -> {}", from, to))?;
            Ok(json!({ "columnOrder": order }))
        }
        "board.removeItem" => {
            let id = str_param(params, "id")?;
            match a.remove_item(id) {
                Some(patch) => to_json(&patch),
                None => Ok(Value::Null),
            }
        }
        "board.updateItem" => {
            let node: BookmarkNode = parse(params.get("node").unwrap_or(params))?;
            Ok(json!({ "updated": a.update_item(&node) }))
        }
        "board.toggleSubfolder" => {
            let folder_id = str_param(params, "folderId")?;
            let expanded = a
                .toggle_subfolder(folder_id)
                .ok_or_else(|| format!("unknown subfolder: {}", folder_id))?;
            Ok(json!({ "expanded": expanded }))
        }

        // ─── Column edits ───
        "board.renameColumn" => {
            let column_id = str_param(params, "columnId")?;
            let title = str_param(params, "title")?;
            let node = a.rename_column(column_id, title).map_err(|e| e.to_string())?;
            to_json(&node)
        }
        "board.renameSubfolder" => {
            let folder_id = str_param(params, "folderId")?;
            let title = str_param(params, "title")?;
            let node = a.rename_subfolder(folder_id, title).map_err(|e| e.to_string())?;
            to_json(&node)
        }
        "board.createSubfolder" => {
            let column_id = str_param(params, "columnId")?;
            let title = str_param(params, "title")?;
            let node = a.create_subfolder(column_id, title).map_err(|e| e.to_string())?;
            to_json(&node)
        }
        "board.deleteColumn" => {
            let column_id = str_param(params, "columnId")?;
            a.delete_column(column_id).map_err(|e| e.to_string())?;
            Ok(json!({ "ok": true }))
        }

        // ─── Bookmarks ───
        "bookmark.edit" => {
            let id = str_param(params, "id")?;
            let title = params.get("title").and_then(|v| v.as_str());
            let url = params.get("url").and_then(|v| v.as_str());
            let node = a.edit_bookmark(id, title, url).map_err(|e| e.to_string())?;
            to_json(&node)
        }
        "bookmark.delete" => {
            let id = str_param(params, "id")?;
            a.delete_bookmark(id).map_err(|e| e.to_string())?;
            Ok(json!({ "ok": true }))
        }

        // ─── Order, notices, settings ───
        "order.clear" => {
            let _ = a.clear_order();
            to_json(a.board())
        }
        "notices.take" => to_json(&a.take_notices()),
        "settings.get" => to_json(a.settings()),
        "settings.set" => {
            let key = str_param(params, "key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            a.settings_engine
                .set_value(key, value)
                .map_err(|e| e.to_string())?;
            Ok(json!({ "ok": true }))
        }

        "ping" => Ok(json!({ "pong": true })),
        _ => Err(format!("unknown method: {}", method)),
    }
}
