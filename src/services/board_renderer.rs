//! Board Renderer.
//!
//! Turns normalized columns plus the saved order into the live [`Board`].
//!
//! Ordering rule, used for columns, column roots and subfolder interiors alike:
//! ids found in the saved order come first in saved sequence, ids the saved order
//! doesn't know follow in tree order, and saved ids with no match are dropped.
//!
//! Subfolder groups keep their tree-order slot among a column's entries; only the
//! bookmark slots around them are filled in merged order.
//!
//! A full render always re-fetches the tree and rebuilds every column. Transient
//! state such as expanded subfolders is not carried across full renders.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::managers::bookmark_store::{sample_tree, BookmarkStore};
use crate::managers::order_store::OrderStore;
use crate::services::tree_adapter::normalize;
use crate::types::board::{
    domain_of, Board, BoardColumn, BoardItem, BoardStatus, BookmarkCard, Column, Entry,
    SubfolderGroup, SubfolderView, EMPTY_SUBFOLDER_TEXT,
};
use crate::types::bookmark::{BookmarkNode, NodeShape};
use crate::types::errors::{RenderError, StoreError};
use crate::types::order::{subfolder_key, OrderRecord};

/// Message shown in place of the board when a render fails.
pub const RENDER_ERROR_TEXT: &str = "Failed to load bookmarks";

/// Orders `items` by `saved`: known ids first in saved sequence, the rest after in
/// their original order. Saved ids with no matching item are skipped.
pub fn merge_order<T, F>(items: Vec<T>, saved: &[String], id_of: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let index: HashMap<String, usize> = slots
        .iter()
        .enumerate()
        .filter_map(|(i, item)| item.as_ref().map(|it| (id_of(it).to_string(), i)))
        .collect();

    let mut merged = Vec::with_capacity(slots.len());
    for id in saved {
        if let Some(&i) = index.get(id) {
            if let Some(item) = slots[i].take() {
                merged.push(item);
            }
        }
    }
    merged.extend(slots.into_iter().flatten());
    merged
}

/// Explicit per-render cache. Cleared at the start of every full refresh.
#[derive(Debug, Default)]
pub struct RenderCache {
    tree: Option<BookmarkNode>,
}

impl RenderCache {
    pub fn invalidate(&mut self) {
        self.tree = None;
    }

    pub fn tree(&self) -> Option<&BookmarkNode> {
        self.tree.as_ref()
    }
}

/// What a targeted removal changed on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovalPatch {
    pub id: String,
    pub column_id: String,
    /// Fade-out the presentation layer plays before dropping the element.
    pub fade_ms: u64,
    /// The column's displayed count after the removal.
    pub count: usize,
    /// True if the removal left the column without items.
    pub emptied: bool,
}

/// Renders the board. Pure over its inputs.
pub fn render_columns(columns: &[Column], record: &OrderRecord) -> Vec<BoardColumn> {
    let ordered = merge_order(columns.to_vec(), &record.column_order, |c| c.column_id.as_str());
    ordered
        .iter()
        .map(|column| render_column(column, record))
        .collect()
}

fn render_column(column: &Column, record: &OrderRecord) -> BoardColumn {
    let bookmarks: Vec<BookmarkCard> = column
        .entries
        .iter()
        .filter_map(|e| match e {
            Entry::Bookmark(b) => Some(BookmarkCard::from_entry(b)),
            Entry::Subfolder(_) => None,
        })
        .collect();
    let mut merged = merge_order(
        bookmarks,
        record.bookmark_order_for(&column.column_id),
        |c| c.id.as_str(),
    )
    .into_iter();

    let items: Vec<BoardItem> = column
        .entries
        .iter()
        .filter_map(|entry| match entry {
            Entry::Bookmark(_) => merged.next().map(BoardItem::Bookmark),
            Entry::Subfolder(group) => Some(BoardItem::Subfolder(render_subfolder(group, record))),
        })
        .collect();

    let mut rendered = BoardColumn {
        column_id: column.column_id.clone(),
        kind: column.kind,
        title: column.title.clone(),
        count: column.bookmark_count(),
        items,
        placeholder: None,
    };
    rendered.refresh_placeholder();
    rendered
}

fn render_subfolder(group: &SubfolderGroup, record: &OrderRecord) -> SubfolderView {
    let cards: Vec<BookmarkCard> = group.children.iter().map(BookmarkCard::from_entry).collect();
    let items = merge_order(
        cards,
        record.bookmark_order_for(&subfolder_key(&group.folder_id)),
        |c| c.id.as_str(),
    );
    let placeholder = items.is_empty().then(|| EMPTY_SUBFOLDER_TEXT.to_string());
    SubfolderView {
        folder_id: group.folder_id.clone(),
        title: group.title.clone(),
        expanded: true,
        items,
        placeholder,
    }
}

/// Owner of the live board.
#[derive(Debug, Default)]
pub struct BoardRenderer {
    board: Board,
    cache: RenderCache,
}

impl BoardRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn cache(&self) -> &RenderCache {
        &self.cache
    }

    /// Full render pass: fresh tree, fresh saved order, complete rebuild.
    ///
    /// If the store API is absent the sample tree is shown instead. Any other
    /// fetch failure marks the board with an error and leaves its columns as they were.
    pub fn render(&mut self, store: &dyn BookmarkStore, orders: &OrderStore) -> Result<(), RenderError> {
        self.cache.invalidate();
        let tree = match store.get_tree() {
            Ok(tree) => tree,
            Err(StoreError::Unavailable(reason)) => {
                info!(%reason, "bookmark store unavailable, showing sample tree");
                sample_tree()
            }
            Err(e) => {
                warn!(error = %e, "failed to render board");
                self.board.status = BoardStatus::Error(RENDER_ERROR_TEXT.to_string());
                return Err(RenderError::TreeFetch(e.to_string()));
            }
        };
        if !tree.is_folder() {
            warn!(id = %tree.id, "bookmark tree root is not a folder");
            self.board.status = BoardStatus::Error(RENDER_ERROR_TEXT.to_string());
            return Err(RenderError::MissingRoot);
        }
        let record = orders.load_record();
        let columns = normalize(&tree);
        self.board = Board {
            columns: render_columns(&columns, &record),
            status: BoardStatus::Ready,
        };
        self.cache.tree = Some(tree);
        debug!(columns = self.board.columns.len(), "board rendered");
        Ok(())
    }

    /// Removes an item from the board in place: a bookmark card, a subfolder group,
    /// or a whole column. Returns `None` if the id isn't on the board.
    pub fn remove_item(&mut self, id: &str, fade_ms: u64) -> Option<RemovalPatch> {
        if let Some(pos) = self.board.columns.iter().position(|c| c.column_id == id) {
            let column = self.board.columns.remove(pos);
            return Some(RemovalPatch {
                id: id.to_string(),
                column_id: column.column_id,
                fade_ms,
                count: 0,
                emptied: true,
            });
        }

        let column_id = self.board.owning_column(id)?.to_string();
        let column = self.board.column_mut(&column_id)?;
        let mut removed_bookmarks = 0;
        column.items.retain_mut(|item| match item {
            BoardItem::Bookmark(card) if card.id == id => {
                removed_bookmarks += 1;
                false
            }
            BoardItem::Subfolder(view) if view.folder_id == id => {
                removed_bookmarks += view.items.len();
                false
            }
            BoardItem::Subfolder(view) => {
                let before = view.items.len();
                view.items.retain(|c| c.id != id);
                if view.items.len() != before {
                    removed_bookmarks += before - view.items.len();
                    if view.items.is_empty() {
                        view.placeholder = Some(EMPTY_SUBFOLDER_TEXT.to_string());
                    }
                }
                true
            }
            _ => true,
        });
        column.count = column.count.saturating_sub(removed_bookmarks);
        column.refresh_placeholder();
        Some(RemovalPatch {
            id: id.to_string(),
            column_id,
            fade_ms,
            count: column.count,
            emptied: column.items.is_empty(),
        })
    }

    /// Refreshes a card's title and URL in place. Returns false if no card matched.
    pub fn update_item(&mut self, node: &BookmarkNode) -> bool {
        let NodeShape::Bookmark { url } = node.shape() else {
            return self.update_folder_title(node);
        };
        let Some(card) = self.board.card_mut(&node.id) else {
            return false;
        };
        let domain = domain_of(url);
        card.title = if node.title.trim().is_empty() {
            domain.clone()
        } else {
            node.title.clone()
        };
        card.url = url.to_string();
        card.domain = domain;
        true
    }

    fn update_folder_title(&mut self, node: &BookmarkNode) -> bool {
        if let Some(column) = self.board.column_mut(&node.id) {
            column.title = node.title.clone();
            return true;
        }
        for column in &mut self.board.columns {
            for item in &mut column.items {
                if let BoardItem::Subfolder(view) = item {
                    if view.folder_id == node.id {
                        view.title = node.title.clone();
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Ids currently shown anywhere on the board.
    pub fn visible_ids(&self) -> HashSet<String> {
        let mut ids = HashSet::new();
        for column in &self.board.columns {
            ids.insert(column.column_id.clone());
            for item in &column.items {
                ids.insert(item.id().to_string());
                if let BoardItem::Subfolder(view) = item {
                    ids.extend(view.items.iter().map(|c| c.id.clone()));
                }
            }
        }
        ids
    }
}
