//! Drag Reconciler.
//!
//! Owns the contract between a finished drag gesture and the bookmark store:
//! resolves the destination parent, rejects illegal folder drops before touching
//! the store, performs the move, persists the affected orderings and re-renders
//! from the store so the board always ends up matching tree truth.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::managers::bookmark_store::BookmarkStore;
use crate::managers::order_store::OrderStore;
use crate::services::board_renderer::BoardRenderer;
use crate::services::tree_adapter::ancestors;
use crate::types::board::{Board, ColumnKind, Container};
use crate::types::bookmark::{BookmarkNode, MoveDestination, BOOKMARKS_BAR_ID, UNCATEGORIZED_ID};
use crate::types::errors::MoveError;
use crate::types::notice::Notice;
use crate::types::settings::ReconcileSettings;

/// What is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraggedKind {
    Bookmark,
    Folder,
}

/// A completed drop, as reported by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropRequest {
    pub item_id: String,
    pub kind: DraggedKind,
    pub destination: Container,
    /// Final position of the item among all items of the destination container,
    /// subfolder groups included, counted without the dragged item.
    pub index: usize,
}

/// The move that was applied. `index` is in the store's child index space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropOutcome {
    pub parent_id: String,
    pub index: usize,
}

/// Resolves the store parent a drop into `destination` lands in.
///
/// - subfolder interior: the subfolder itself;
/// - uncategorized column root: the bookmarks bar;
/// - any other column root: that column's folder.
pub fn resolve_target_parent(board: &Board, destination: &Container) -> Result<String, MoveError> {
    match destination {
        Container::Subfolder { folder_id } if !folder_id.is_empty() => Ok(folder_id.clone()),
        Container::ColumnRoot { column_id } if !column_id.is_empty() => {
            let uncategorized = column_id == UNCATEGORIZED_ID
                || board
                    .column(column_id)
                    .is_some_and(|c| c.kind == ColumnKind::Uncategorized);
            if uncategorized {
                Ok(BOOKMARKS_BAR_ID.to_string())
            } else {
                Ok(column_id.clone())
            }
        }
        other => Err(MoveError::UnresolvedTarget(format!("{:?}", other))),
    }
}

/// Translates a drop index into the store's child index of `target_parent`.
///
/// Folder columns and subfolders show their children one to one, so the index is
/// already a store index. The uncategorized column shows only the loose bookmarks of
/// the bar, so the slot is mapped onto the bar's full child list; past the last loose
/// bookmark it appends.
fn store_index(
    store: &dyn BookmarkStore,
    board: &Board,
    request: &DropRequest,
    target_parent: &str,
) -> usize {
    let is_bar_root = target_parent == BOOKMARKS_BAR_ID
        && matches!(request.destination, Container::ColumnRoot { .. });
    if !is_bar_root {
        return request.index;
    }
    let Ok(tree) = store.get_tree() else {
        return request.index;
    };
    let Some(bar) = tree.find(BOOKMARKS_BAR_ID) else {
        return request.index;
    };
    let children: Vec<&BookmarkNode> = bar
        .children
        .as_deref()
        .unwrap_or(&[])
        .iter()
        .filter(|c| c.id != request.item_id)
        .collect();
    let slot = board.bookmark_slot(&request.destination, &request.item_id, request.index);
    children
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.is_folder())
        .nth(slot)
        .map(|(i, _)| i)
        .unwrap_or(children.len())
}

fn rerender(store: &dyn BookmarkStore, orders: &OrderStore, renderer: &mut BoardRenderer) {
    if let Err(e) = renderer.render(store, orders) {
        warn!(error = %e, "render after drop failed");
    }
}

fn destination_title(board: &Board, destination: &Container) -> String {
    match destination {
        Container::ColumnRoot { column_id } => board
            .column(column_id)
            .map(|c| c.title.clone())
            .unwrap_or_default(),
        Container::Subfolder { folder_id } => board
            .columns
            .iter()
            .find_map(|c| c.subfolder(folder_id))
            .map(|v| v.title.clone())
            .unwrap_or_default(),
    }
}

/// Reconciles drops with the store.
#[derive(Debug, Clone)]
pub struct DragReconciler {
    detect_descendant_cycles: bool,
}

impl DragReconciler {
    pub fn new(settings: &ReconcileSettings) -> Self {
        Self {
            detect_descendant_cycles: settings.detect_descendant_cycles,
        }
    }

    /// Rejects a folder dropped onto itself or, when enabled, into its own subtree.
    ///
    /// The direct check needs no store call. The descendant check walks the target's
    /// ancestor chain in a fresh tree; if the tree can't be fetched the store's own
    /// cycle rejection still applies.
    pub fn check_guards(
        &self,
        store: &dyn BookmarkStore,
        request: &DropRequest,
        target_parent: &str,
    ) -> Result<(), MoveError> {
        if request.kind != DraggedKind::Folder {
            return Ok(());
        }
        if target_parent == request.item_id {
            return Err(MoveError::SelfDrop);
        }
        if self.detect_descendant_cycles {
            if let Ok(tree) = store.get_tree() {
                if ancestors(&tree, target_parent).contains(&request.item_id) {
                    return Err(MoveError::DescendantDrop);
                }
            }
        }
        Ok(())
    }

    /// Handles a finished bookmark or subfolder drag.
    pub fn on_drop(
        &self,
        store: &dyn BookmarkStore,
        orders: &OrderStore,
        renderer: &mut BoardRenderer,
        notices: &mut Vec<Notice>,
        request: &DropRequest,
    ) -> Result<DropOutcome, MoveError> {
        let target_parent = match resolve_target_parent(renderer.board(), &request.destination) {
            Ok(parent) => parent,
            Err(e) => {
                warn!(error = %e, "drop target could not be resolved");
                rerender(store, orders, renderer);
                return Err(e);
            }
        };

        if let Err(e) = self.check_guards(store, request, &target_parent) {
            notices.push(Notice::info(e.to_string()));
            return Err(e);
        }

        let source = renderer.board().locate(&request.item_id);
        let index = store_index(store, renderer.board(), request, &target_parent);
        let destination = MoveDestination {
            parent_id: target_parent.clone(),
            index,
        };

        if let Err(e) = store.move_node(&request.item_id, &destination) {
            warn!(id = %request.item_id, error = %e, "move rejected by store");
            notices.push(Notice::error(e.to_string()));
            rerender(store, orders, renderer);
            return Err(MoveError::from(e));
        }
        info!(id = %request.item_id, parent = %target_parent, index, "bookmark moved");

        if request.kind == DraggedKind::Bookmark {
            self.persist_move(orders, renderer.board(), request, source.as_ref());
        }

        let title = destination_title(renderer.board(), &request.destination);
        notices.push(Notice::success(format!("Moved to \"{}\"", title)));
        rerender(store, orders, renderer);

        Ok(DropOutcome {
            parent_id: target_parent,
            index,
        })
    }

    /// Rewrites the saved order of the source and destination containers.
    fn persist_move(
        &self,
        orders: &OrderStore,
        board: &Board,
        request: &DropRequest,
        source: Option<&Container>,
    ) {
        let dest_key = request.destination.order_key();
        let dest_ids = board.container_ids(&request.destination).unwrap_or_default();
        let (source_key, source_ids) = match source {
            Some(container) => (
                container.order_key(),
                board.container_ids(container).unwrap_or_default(),
            ),
            None => (dest_key.clone(), dest_ids.clone()),
        };

        let slot = board.bookmark_slot(&request.destination, &request.item_id, request.index);
        let mut record = orders.load_record();
        record.apply_move(
            &request.item_id,
            &source_key,
            &source_ids,
            &dest_key,
            &dest_ids,
            slot,
        );
        orders.save_bookmark_order(&record.bookmark_order);
    }

    /// Persists the live column order verbatim after a column drag.
    pub fn on_column_drag_end(&self, orders: &OrderStore, board: &Board) -> Vec<String> {
        let order = board.column_ids();
        if !order.is_empty() {
            orders.save_column_order(&order);
        }
        order
    }
}
