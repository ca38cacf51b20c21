//! Column Editor.
//!
//! Header and card actions that write to the bookmark store: renaming columns and
//! subfolders, adding subfolders, deleting columns, editing and deleting bookmarks.
//! The uncategorized column and the fixed system folders refuse edits with an
//! explanatory notice instead of a store call.

use tracing::{info, warn};

use crate::managers::bookmark_store::BookmarkStore;
use crate::types::board::{Board, ColumnKind};
use crate::types::bookmark::{
    is_system_folder, BookmarkNode, CreateDetails, NodeChanges, OTHER_BOOKMARKS_ID,
    UNCATEGORIZED_ID,
};
use crate::types::errors::EditError;
use crate::types::notice::{Notice, NoticeLevel, LONG_NOTICE_MILLIS};

const UNCATEGORIZED_RENAME_TEXT: &str =
    "Uncategorized column cannot be renamed. Drag these bookmarks to other columns to organize them.";
const UNCATEGORIZED_EDIT_TEXT: &str =
    "Uncategorized column cannot be modified. Drag these bookmarks to other columns to organize them.";

fn system_folder_name(id: &str) -> &'static str {
    if id == OTHER_BOOKMARKS_ID {
        "Other Bookmarks"
    } else {
        "Mobile Bookmarks"
    }
}

fn long_info(message: impl Into<String>) -> Notice {
    Notice::new(NoticeLevel::Info, message, LONG_NOTICE_MILLIS)
}

fn is_uncategorized(board: &Board, column_id: &str) -> bool {
    column_id == UNCATEGORIZED_ID
        || board
            .column(column_id)
            .is_some_and(|c| c.kind == ColumnKind::Uncategorized)
}

fn clean_title(title: &str) -> Result<String, EditError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(EditError::EmptyTitle);
    }
    Ok(title.to_string())
}

/// Checks that a column maps to an editable folder. Pushes the refusal notice if not.
fn guard_column(
    board: &Board,
    notices: &mut Vec<Notice>,
    column_id: &str,
    uncategorized_text: &str,
    action: &str,
) -> Result<(), EditError> {
    if is_uncategorized(board, column_id) {
        notices.push(long_info(uncategorized_text));
        return Err(EditError::ProtectedColumn(column_id.to_string()));
    }
    if is_system_folder(column_id) {
        notices.push(long_info(format!(
            "\"{}\" is a Chrome special folder and cannot be {} directly.",
            system_folder_name(column_id),
            action
        )));
        return Err(EditError::ProtectedColumn(column_id.to_string()));
    }
    Ok(())
}

/// Renames a folder column.
pub fn rename_column(
    store: &dyn BookmarkStore,
    board: &Board,
    notices: &mut Vec<Notice>,
    column_id: &str,
    title: &str,
) -> Result<BookmarkNode, EditError> {
    guard_column(board, notices, column_id, UNCATEGORIZED_RENAME_TEXT, "renamed")?;
    let title = clean_title(title)?;
    let changes = NodeChanges {
        title: Some(title.clone()),
        url: None,
    };
    match store.update(column_id, &changes) {
        Ok(node) => {
            info!(column = column_id, "column renamed");
            notices.push(Notice::success(format!("Column title updated to \"{}\"", title)));
            Ok(node)
        }
        Err(e) => {
            warn!(column = column_id, error = %e, "failed to rename column");
            notices.push(Notice::error("Failed to update column title"));
            Err(e.into())
        }
    }
}

/// Renames a subfolder shown inside a column.
pub fn rename_subfolder(
    store: &dyn BookmarkStore,
    notices: &mut Vec<Notice>,
    folder_id: &str,
    title: &str,
) -> Result<BookmarkNode, EditError> {
    let title = clean_title(title)?;
    let changes = NodeChanges {
        title: Some(title.clone()),
        url: None,
    };
    match store.update(folder_id, &changes) {
        Ok(node) => {
            notices.push(Notice::success(format!("Subfolder title updated to \"{}\"", title)));
            Ok(node)
        }
        Err(e) => {
            warn!(folder = folder_id, error = %e, "failed to rename subfolder");
            notices.push(Notice::error("Failed to update subfolder title"));
            Err(e.into())
        }
    }
}

/// Adds a subfolder at the end of a folder or system column.
pub fn create_subfolder(
    store: &dyn BookmarkStore,
    board: &Board,
    notices: &mut Vec<Notice>,
    column_id: &str,
    title: &str,
) -> Result<BookmarkNode, EditError> {
    if is_uncategorized(board, column_id) {
        notices.push(long_info(UNCATEGORIZED_EDIT_TEXT));
        return Err(EditError::ProtectedColumn(column_id.to_string()));
    }
    let title = clean_title(title)?;
    let details = CreateDetails {
        parent_id: column_id.to_string(),
        title,
        url: None,
        index: None,
    };
    match store.create(&details) {
        Ok(node) => {
            info!(column = column_id, folder = %node.id, "subfolder created");
            notices.push(Notice::success("Subfolder created"));
            Ok(node)
        }
        Err(e) => {
            warn!(column = column_id, error = %e, "failed to create subfolder");
            notices.push(Notice::error("Failed to create subfolder"));
            Err(e.into())
        }
    }
}

/// Deletes a folder column with everything in it.
pub fn delete_column(
    store: &dyn BookmarkStore,
    board: &Board,
    notices: &mut Vec<Notice>,
    column_id: &str,
) -> Result<(), EditError> {
    guard_column(board, notices, column_id, UNCATEGORIZED_EDIT_TEXT, "deleted")?;
    match store.remove(column_id) {
        Ok(()) => {
            info!(column = column_id, "column deleted");
            notices.push(Notice::success("Column deleted"));
            Ok(())
        }
        Err(e) => {
            warn!(column = column_id, error = %e, "failed to delete column");
            notices.push(Notice::error("Failed to delete column"));
            Err(e.into())
        }
    }
}

/// Updates a bookmark's title and/or URL. `None` leaves a field unchanged.
pub fn edit_bookmark(
    store: &dyn BookmarkStore,
    notices: &mut Vec<Notice>,
    id: &str,
    title: Option<&str>,
    url: Option<&str>,
) -> Result<BookmarkNode, EditError> {
    let url = match url.map(str::trim) {
        Some("") => return Err(EditError::EmptyTitle),
        other => other.map(str::to_string),
    };
    let changes = NodeChanges {
        title: title.map(|t| t.trim().to_string()),
        url,
    };
    match store.update(id, &changes) {
        Ok(node) => {
            notices.push(Notice::success("Bookmark updated"));
            Ok(node)
        }
        Err(e) => {
            warn!(id, error = %e, "failed to edit bookmark");
            notices.push(Notice::error("Failed to update bookmark"));
            Err(e.into())
        }
    }
}

pub fn delete_bookmark(
    store: &dyn BookmarkStore,
    notices: &mut Vec<Notice>,
    id: &str,
) -> Result<(), EditError> {
    match store.remove(id) {
        Ok(()) => {
            notices.push(Notice::success("Bookmark deleted"));
            Ok(())
        }
        Err(e) => {
            warn!(id, error = %e, "failed to delete bookmark");
            notices.push(Notice::error("Failed to delete bookmark"));
            Err(e.into())
        }
    }
}
