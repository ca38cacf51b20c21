//! Bookmark Board console demo.
//!
//! Renders the sample bookmark tree as a board and walks through drops, column
//! reordering and store notifications, printing the board after each step.

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use bookmark_board::app::BoardApp;
use bookmark_board::logging::init_logging;
use bookmark_board::managers::bookmark_store::{BookmarkStore, MemoryBookmarkStore};
use bookmark_board::managers::storage_area::{KeyValueArea, LocalArea, SyncArea};
use bookmark_board::services::board_service::BoardService;
use bookmark_board::services::drag_reconciler::{DraggedKind, DropRequest};
use bookmark_board::services::settings_engine::SettingsEngine;
use bookmark_board::types::board::{Board, BoardItem, Container};
use bookmark_board::types::notice::Notice;
use bookmark_board::types::settings::StorageSettings;

fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  📦 {}", name);
    println!("───────────────────────────────────────────────────────────────");
}

fn print_board(board: &Board) {
    for column in &board.columns {
        println!("  [{}] {} ({})", column.column_id, column.title, column.count);
        if let Some(placeholder) = &column.placeholder {
            println!("      {}", placeholder);
        }
        for item in &column.items {
            match item {
                BoardItem::Bookmark(card) => println!("      • {} ({})", card.title, card.domain),
                BoardItem::Subfolder(view) => {
                    println!("      ▸ {}", view.title);
                    for card in &view.items {
                        println!("          • {} ({})", card.title, card.domain);
                    }
                    if let Some(placeholder) = &view.placeholder {
                        println!("          {}", placeholder);
                    }
                }
            }
        }
    }
}

fn print_notices(notices: &[Notice]) {
    for notice in notices {
        println!("  ✉ {:?}: {}", notice.level, notice.message);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_logging();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║              Bookmark Board v{} (demo)                    ║", env!("CARGO_PKG_VERSION"));
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let storage = StorageSettings::default();
    let store = Arc::new(MemoryBookmarkStore::with_sample_tree());
    let remote: Arc<dyn KeyValueArea> = Arc::new(SyncArea::new(
        storage.sync_quota_bytes,
        storage.sync_quota_bytes_per_item,
    ));
    let local: Arc<dyn KeyValueArea> = Arc::new(LocalArea::in_memory()?);
    let mut app = BoardApp::with_parts(store.clone(), remote, local, SettingsEngine::new(None));

    section("Initial render");
    app.render_board()?;
    print_board(app.board());

    section("Drop \"Cursor\" into Frontend at index 0");
    let drop = DropRequest {
        item_id: "120".to_string(),
        kind: DraggedKind::Bookmark,
        destination: Container::ColumnRoot {
            column_id: "10".to_string(),
        },
        index: 0,
    };
    app.on_drop(&drop)?;
    print_notices(&app.take_notices());
    print_board(app.board());

    section("Drop folder Frontend onto itself");
    let self_drop = DropRequest {
        item_id: "10".to_string(),
        kind: DraggedKind::Folder,
        destination: Container::Subfolder {
            folder_id: "10".to_string(),
        },
        index: 0,
    };
    if let Err(e) = app.on_drop(&self_drop) {
        println!("  rejected: {}", e);
    }
    print_notices(&app.take_notices());

    section("Move the first column to the end");
    let last = app.board().columns.len().saturating_sub(1);
    if let Some(order) = app.move_column(0, last) {
        println!("  saved column order: {:?}", order);
    }

    section("Store notifications");
    let service = BoardService::new(app);
    service.render_board().await?;
    println!("  listeners attached: {}", service.attach().await);
    store.remove("111")?;
    tokio::time::sleep(Duration::from_millis(50)).await;
    print_board(&service.board().await);
    println!("  listeners detached: {}", service.detach().await);
    println!("  detached again: {}", service.detach().await);

    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("  ✅ Demo finished");
    println!("═══════════════════════════════════════════════════════════════");
    Ok(())
}
