use serde::{Deserialize, Serialize};

use super::order::{subfolder_key, OrderKey};

/// Placeholder shown in a column with no items.
pub const EMPTY_COLUMN_TEXT: &str = "No bookmarks";
/// Placeholder shown in a subfolder with no bookmarks.
pub const EMPTY_SUBFOLDER_TEXT: &str = "(Empty)";
/// Title shown for a bookmark whose title is blank.
pub const UNTITLED_TEXT: &str = "(Untitled)";

// === Normalized view (tree truth) ===

/// The kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// A direct subfolder of the bookmarks bar.
    Folder,
    /// Loose bookmarks on the bookmarks bar.
    Uncategorized,
    /// One of the fixed store folders ("2", "3").
    System,
}

/// A bookmark entry as seen by the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkEntry {
    pub id: String,
    pub title: String,
    pub url: String,
}

/// A one-level-deep subfolder shown inside a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubfolderGroup {
    pub folder_id: String,
    pub title: String,
    pub children: Vec<BookmarkEntry>,
}

/// A column's direct child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Entry {
    Bookmark(BookmarkEntry),
    Subfolder(SubfolderGroup),
}

/// One top-level grouping produced by tree normalization, entries in tree order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub column_id: String,
    pub kind: ColumnKind,
    pub title: String,
    pub entries: Vec<Entry>,
}

impl Column {
    /// Number of bookmarks in the column, subfolder interiors included.
    pub fn bookmark_count(&self) -> usize {
        self.entries
            .iter()
            .map(|e| match e {
                Entry::Bookmark(_) => 1,
                Entry::Subfolder(group) => group.children.len(),
            })
            .sum()
    }
}

// === Live board ===

/// A rendered bookmark card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkCard {
    pub id: String,
    pub title: String,
    pub url: String,
    pub domain: String,
}

impl BookmarkCard {
    pub fn from_entry(entry: &BookmarkEntry) -> Self {
        let title = if entry.title.trim().is_empty() {
            UNTITLED_TEXT.to_string()
        } else {
            entry.title.clone()
        };
        Self {
            id: entry.id.clone(),
            title,
            url: entry.url.clone(),
            domain: domain_of(&entry.url),
        }
    }
}

/// A rendered, collapsible subfolder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubfolderView {
    pub folder_id: String,
    pub title: String,
    pub expanded: bool,
    pub items: Vec<BookmarkCard>,
    pub placeholder: Option<String>,
}

/// An item in a rendered column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BoardItem {
    Bookmark(BookmarkCard),
    Subfolder(SubfolderView),
}

impl BoardItem {
    pub fn id(&self) -> &str {
        match self {
            BoardItem::Bookmark(card) => &card.id,
            BoardItem::Subfolder(view) => &view.folder_id,
        }
    }
}

/// A rendered column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardColumn {
    pub column_id: String,
    pub kind: ColumnKind,
    pub title: String,
    pub count: usize,
    pub items: Vec<BoardItem>,
    pub placeholder: Option<String>,
}

impl BoardColumn {
    /// Ids of the bookmark cards directly in the column root, in display order.
    pub fn root_bookmark_ids(&self) -> Vec<String> {
        self.items
            .iter()
            .filter_map(|item| match item {
                BoardItem::Bookmark(card) => Some(card.id.clone()),
                BoardItem::Subfolder(_) => None,
            })
            .collect()
    }

    pub fn subfolder(&self, folder_id: &str) -> Option<&SubfolderView> {
        self.items.iter().find_map(|item| match item {
            BoardItem::Subfolder(view) if view.folder_id == folder_id => Some(view),
            _ => None,
        })
    }

    fn subfolder_mut(&mut self, folder_id: &str) -> Option<&mut SubfolderView> {
        self.items.iter_mut().find_map(|item| match item {
            BoardItem::Subfolder(view) if view.folder_id == folder_id => Some(view),
            _ => None,
        })
    }

    /// Resets the empty-state placeholder to match the current items.
    pub fn refresh_placeholder(&mut self) {
        self.placeholder = if self.items.is_empty() {
            Some(EMPTY_COLUMN_TEXT.to_string())
        } else {
            None
        };
    }
}

/// Whether the last render pass succeeded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum BoardStatus {
    #[default]
    Ready,
    Error(String),
}

/// The live board: columns in display order plus render status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub columns: Vec<BoardColumn>,
    pub status: BoardStatus,
}

/// A container bookmarks can be dropped into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Container {
    /// The root list of a column.
    #[serde(rename_all = "camelCase")]
    ColumnRoot { column_id: String },
    /// The interior of a subfolder group.
    #[serde(rename_all = "camelCase")]
    Subfolder { folder_id: String },
}

impl Container {
    /// The order key under which this container's ordering is saved.
    pub fn order_key(&self) -> OrderKey {
        match self {
            Container::ColumnRoot { column_id } => column_id.clone(),
            Container::Subfolder { folder_id } => subfolder_key(folder_id),
        }
    }
}

impl Board {
    pub fn column(&self, column_id: &str) -> Option<&BoardColumn> {
        self.columns.iter().find(|c| c.column_id == column_id)
    }

    pub fn column_mut(&mut self, column_id: &str) -> Option<&mut BoardColumn> {
        self.columns.iter_mut().find(|c| c.column_id == column_id)
    }

    /// Live column order.
    pub fn column_ids(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.column_id.clone()).collect()
    }

    /// Moves a column the way a drag library reorders it in place.
    pub fn move_column(&mut self, from: usize, to: usize) -> bool {
        if from >= self.columns.len() || to >= self.columns.len() {
            return false;
        }
        let column = self.columns.remove(from);
        self.columns.insert(to, column);
        true
    }

    /// Returns the container currently holding the given item id.
    pub fn locate(&self, id: &str) -> Option<Container> {
        for column in &self.columns {
            for item in &column.items {
                match item {
                    BoardItem::Bookmark(card) if card.id == id => {
                        return Some(Container::ColumnRoot {
                            column_id: column.column_id.clone(),
                        });
                    }
                    BoardItem::Subfolder(view) => {
                        if view.folder_id == id {
                            return Some(Container::ColumnRoot {
                                column_id: column.column_id.clone(),
                            });
                        }
                        if view.items.iter().any(|c| c.id == id) {
                            return Some(Container::Subfolder {
                                folder_id: view.folder_id.clone(),
                            });
                        }
                    }
                    _ => {}
                }
            }
        }
        None
    }

    /// Id of the column holding the given item, at root or inside a subfolder.
    pub fn owning_column(&self, id: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|column| {
                column.items.iter().any(|item| match item {
                    BoardItem::Bookmark(card) => card.id == id,
                    BoardItem::Subfolder(view) => {
                        view.folder_id == id || view.items.iter().any(|c| c.id == id)
                    }
                })
            })
            .map(|c| c.column_id.as_str())
    }

    /// Ordered bookmark ids in a container, or `None` if the container isn't rendered.
    pub fn container_ids(&self, container: &Container) -> Option<Vec<String>> {
        match container {
            Container::ColumnRoot { column_id } => {
                self.column(column_id).map(|c| c.root_bookmark_ids())
            }
            Container::Subfolder { folder_id } => self
                .columns
                .iter()
                .find_map(|c| c.subfolder(folder_id))
                .map(|view| view.items.iter().map(|c| c.id.clone()).collect()),
        }
    }

    /// Converts a drop position into a position among the container's bookmark ids.
    ///
    /// `index` counts every item of the destination as the drag library sees it
    /// once `moving_id` has left: cards and subfolder groups alike in a column root,
    /// cards in a subfolder. The result indexes the list `container_ids` returns,
    /// also without `moving_id`.
    pub fn bookmark_slot(&self, container: &Container, moving_id: &str, index: usize) -> usize {
        match container {
            Container::ColumnRoot { column_id } => self
                .column(column_id)
                .map(|column| {
                    column
                        .items
                        .iter()
                        .filter(|item| item.id() != moving_id)
                        .take(index)
                        .filter(|item| matches!(item, BoardItem::Bookmark(_)))
                        .count()
                })
                .unwrap_or(index),
            Container::Subfolder { .. } => index,
        }
    }

    fn subfolder_mut(&mut self, folder_id: &str) -> Option<&mut SubfolderView> {
        self.columns
            .iter_mut()
            .find_map(|c| c.subfolder_mut(folder_id))
    }

    /// Flips a subfolder's expanded state. Returns the new state.
    pub fn toggle_subfolder(&mut self, folder_id: &str) -> Option<bool> {
        let view = self.subfolder_mut(folder_id)?;
        view.expanded = !view.expanded;
        Some(view.expanded)
    }

    /// Finds a bookmark card anywhere on the board.
    pub fn card_mut(&mut self, id: &str) -> Option<&mut BookmarkCard> {
        for column in &mut self.columns {
            for item in &mut column.items {
                match item {
                    BoardItem::Bookmark(card) if card.id == id => return Some(card),
                    BoardItem::Subfolder(view) => {
                        if let Some(card) = view.items.iter_mut().find(|c| c.id == id) {
                            return Some(card);
                        }
                    }
                    _ => {}
                }
            }
        }
        None
    }

    /// Moves a bookmark card between containers the way a drag library does it
    /// optimistically, before the store confirms. `index` is the card's position
    /// among all items of the destination after the move; it is clamped.
    pub fn move_item(&mut self, id: &str, to: &Container, index: usize) -> bool {
        let Some(from) = self.locate(id) else {
            return false;
        };
        if self.container_ids(to).is_none() {
            return false;
        }
        let card = match self.take_card(id, &from) {
            Some(card) => card,
            None => return false,
        };
        match to {
            Container::ColumnRoot { column_id } => {
                if let Some(column) = self.column_mut(column_id) {
                    let at = index.min(column.items.len());
                    column.items.insert(at, BoardItem::Bookmark(card));
                    column.refresh_placeholder();
                    return true;
                }
            }
            Container::Subfolder { folder_id } => {
                if let Some(view) = self.subfolder_mut(folder_id) {
                    let at = index.min(view.items.len());
                    view.items.insert(at, card);
                    view.placeholder = None;
                    return true;
                }
            }
        }
        false
    }

    fn take_card(&mut self, id: &str, from: &Container) -> Option<BookmarkCard> {
        match from {
            Container::ColumnRoot { column_id } => {
                let column = self.column_mut(column_id)?;
                let pos = column
                    .items
                    .iter()
                    .position(|item| matches!(item, BoardItem::Bookmark(c) if c.id == id))?;
                match column.items.remove(pos) {
                    BoardItem::Bookmark(card) => Some(card),
                    BoardItem::Subfolder(_) => None,
                }
            }
            Container::Subfolder { folder_id } => {
                let view = self.subfolder_mut(folder_id)?;
                let pos = view.items.iter().position(|c| c.id == id)?;
                Some(view.items.remove(pos))
            }
        }
    }
}

/// Host part of a URL without a leading `www.`; the raw URL if it has no host.
pub fn domain_of(url: &str) -> String {
    let rest = match url.split_once("://") {
        Some((_, rest)) => rest,
        None => return url.to_string(),
    };
    let host = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let host = host.rsplit('@').next().unwrap_or(host);
    let host = host.split(':').next().unwrap_or(host);
    if host.is_empty() {
        return url.to_string();
    }
    host.strip_prefix("www.").unwrap_or(host).to_string()
}
