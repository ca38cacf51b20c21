//! App Core for Bookmark Board.
//!
//! `BoardApp` wires the bookmark store, the order store and the board engine
//! together and is the single entry point used by the binaries and the async
//! service. Every gesture handler catches its own failures: store errors become
//! notices, persistence errors become log lines.

use std::error::Error;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::database::Database;
use crate::managers::bookmark_store::{BookmarkStore, MemoryBookmarkStore};
use crate::managers::order_store::OrderStore;
use crate::managers::storage_area::{KeyValueArea, LocalArea, SyncArea};
use crate::services::board_renderer::{BoardRenderer, RemovalPatch};
use crate::services::change_reconciler::{ChangeReconciler, ReconcileReport, ReconcileStep};
use crate::services::column_editor;
use crate::services::drag_reconciler::{DragReconciler, DropOutcome, DropRequest};
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::types::board::Board;
use crate::types::bookmark::{BookmarkNode, ChangeEvent};
use crate::types::errors::{EditError, MoveError, RenderError};
use crate::types::notice::Notice;
use crate::types::order::OrderRecord;
use crate::types::settings::BoardSettings;

/// File name of the local order database inside the data directory.
pub const DATABASE_FILE: &str = "board.db";

/// Callback invoked with the saved ordering whenever it changes.
pub type OrderListener = Box<dyn Fn(&OrderRecord) + Send + Sync>;

/// Central application struct holding the collaborators and the board engine.
pub struct BoardApp {
    pub store: Arc<dyn BookmarkStore>,
    pub orders: OrderStore,
    pub renderer: BoardRenderer,
    pub settings_engine: SettingsEngine,
    drag: DragReconciler,
    changes: ChangeReconciler,
    notices: Vec<Notice>,
    order_listeners: Vec<OrderListener>,
}

impl BoardApp {
    /// Opens the app over an on-disk local area in `data_dir` and the in-process
    /// store holding the sample tree. The synchronized area is unavailable outside
    /// a host, so orders land in the local database.
    ///
    /// `settings_path` overrides the settings file location.
    pub fn open(data_dir: &Path, settings_path: Option<String>) -> Result<Self, Box<dyn Error>> {
        fs::create_dir_all(data_dir)?;
        let db = Database::open(data_dir.join(DATABASE_FILE))?;

        let mut settings_engine = SettingsEngine::new(settings_path);
        if let Err(e) = settings_engine.load() {
            warn!(error = %e, "settings unreadable, using defaults");
        }

        let store: Arc<dyn BookmarkStore> = Arc::new(MemoryBookmarkStore::with_sample_tree());
        let remote: Arc<dyn KeyValueArea> = Arc::new(SyncArea::unavailable());
        let local: Arc<dyn KeyValueArea> = Arc::new(LocalArea::new(db));
        info!(data_dir = %data_dir.display(), "board app opened");
        Ok(Self::with_parts(store, remote, local, settings_engine))
    }

    /// Assembles the app from explicit collaborators.
    pub fn with_parts(
        store: Arc<dyn BookmarkStore>,
        remote: Arc<dyn KeyValueArea>,
        local: Arc<dyn KeyValueArea>,
        settings_engine: SettingsEngine,
    ) -> Self {
        let settings = settings_engine.get_settings().clone();
        Self {
            store,
            orders: OrderStore::new(remote, local, &settings.storage),
            renderer: BoardRenderer::new(),
            drag: DragReconciler::new(&settings.reconcile),
            changes: ChangeReconciler::new(&settings.reconcile),
            settings_engine,
            notices: Vec::new(),
            order_listeners: Vec::new(),
        }
    }

    pub fn settings(&self) -> &BoardSettings {
        self.settings_engine.get_settings()
    }

    pub fn board(&self) -> &Board {
        self.renderer.board()
    }

    /// Full render from a fresh tree and the saved order.
    pub fn render_board(&mut self) -> Result<&Board, RenderError> {
        self.renderer.render(self.store.as_ref(), &self.orders)?;
        Ok(self.renderer.board())
    }

    pub fn on_drop(&mut self, request: &DropRequest) -> Result<DropOutcome, MoveError> {
        let outcome = self.drag.on_drop(
            self.store.as_ref(),
            &self.orders,
            &mut self.renderer,
            &mut self.notices,
            request,
        )?;
        self.notify_order_changed();
        Ok(outcome)
    }

    /// Applies a column drag to the live board and persists the resulting order.
    pub fn move_column(&mut self, from: usize, to: usize) -> Option<Vec<String>> {
        if !self.renderer.board_mut().move_column(from, to) {
            return None;
        }
        Some(self.on_column_drag_end())
    }

    /// Persists the live column order verbatim.
    pub fn on_column_drag_end(&mut self) -> Vec<String> {
        let order = self.drag.on_column_drag_end(&self.orders, self.renderer.board());
        self.notify_order_changed();
        order
    }

    /// Removes an item from the board in place, without touching the store.
    pub fn remove_item(&mut self, id: &str) -> Option<RemovalPatch> {
        let fade = self.settings().reconcile.fade_millis;
        self.renderer.remove_item(id, fade)
    }

    /// Refreshes a card or folder title in place.
    pub fn update_item(&mut self, node: &BookmarkNode) -> bool {
        self.renderer.update_item(node)
    }

    /// Steps the change reconciler would take for an event.
    pub fn change_plan(&self, event: &ChangeEvent) -> Vec<ReconcileStep> {
        self.changes.plan(event)
    }

    /// Reconciles one store notification with the board.
    pub fn handle_change(&mut self, event: &ChangeEvent) -> ReconcileReport {
        let report = self
            .changes
            .apply(event, self.store.as_ref(), &self.orders, &mut self.renderer);
        if report.saved_order.is_some() {
            self.notify_order_changed();
        }
        report
    }

    /// Registers a callback for saved-order changes.
    pub fn on_order_changed(&mut self, listener: OrderListener) {
        self.order_listeners.push(listener);
    }

    fn notify_order_changed(&self) {
        if self.order_listeners.is_empty() {
            return;
        }
        let record = self.orders.load_record();
        for listener in &self.order_listeners {
            listener(&record);
        }
    }

    pub fn toggle_subfolder(&mut self, folder_id: &str) -> Option<bool> {
        self.renderer.board_mut().toggle_subfolder(folder_id)
    }

    /// Forgets all manual ordering and re-renders in tree order.
    pub fn clear_order(&mut self) -> Result<&Board, RenderError> {
        self.orders.clear_all();
        self.notify_order_changed();
        self.render_board()
    }

    /// Drains queued notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn refresh_after_edit(&mut self) {
        if let Err(e) = self.renderer.render(self.store.as_ref(), &self.orders) {
            warn!(error = %e, "refresh after edit failed");
        }
    }

    pub fn rename_column(&mut self, column_id: &str, title: &str) -> Result<BookmarkNode, EditError> {
        let node = column_editor::rename_column(
            self.store.as_ref(),
            self.renderer.board(),
            &mut self.notices,
            column_id,
            title,
        )?;
        self.refresh_after_edit();
        Ok(node)
    }

    pub fn rename_subfolder(&mut self, folder_id: &str, title: &str) -> Result<BookmarkNode, EditError> {
        let node =
            column_editor::rename_subfolder(self.store.as_ref(), &mut self.notices, folder_id, title)?;
        self.refresh_after_edit();
        Ok(node)
    }

    pub fn create_subfolder(&mut self, column_id: &str, title: &str) -> Result<BookmarkNode, EditError> {
        let node = column_editor::create_subfolder(
            self.store.as_ref(),
            self.renderer.board(),
            &mut self.notices,
            column_id,
            title,
        )?;
        self.refresh_after_edit();
        Ok(node)
    }

    pub fn delete_column(&mut self, column_id: &str) -> Result<(), EditError> {
        column_editor::delete_column(
            self.store.as_ref(),
            self.renderer.board(),
            &mut self.notices,
            column_id,
        )?;
        self.refresh_after_edit();
        Ok(())
    }

    pub fn edit_bookmark(
        &mut self,
        id: &str,
        title: Option<&str>,
        url: Option<&str>,
    ) -> Result<BookmarkNode, EditError> {
        let node = column_editor::edit_bookmark(self.store.as_ref(), &mut self.notices, id, title, url)?;
        self.refresh_after_edit();
        Ok(node)
    }

    pub fn delete_bookmark(&mut self, id: &str) -> Result<(), EditError> {
        column_editor::delete_bookmark(self.store.as_ref(), &mut self.notices, id)?;
        self.refresh_after_edit();
        Ok(())
    }
}
