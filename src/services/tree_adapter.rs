//! Tree Adapter.
//!
//! Maps the raw bookmark tree onto board columns. Pure: entries come out in tree
//! order and saved ordering is not consulted here.
//!
//! Layout produced:
//! - one `Folder` column per direct subfolder of the bookmarks bar ("1");
//! - the synthetic `Uncategorized` column holding the bar's loose bookmarks;
//! - one `System` column per fixed store folder ("2", "3") that exists.
//!
//! Subfolders are one level deep. A subfolder's own subfolders are not shown;
//! only its direct bookmarks are.

use crate::types::board::{BookmarkEntry, Column, ColumnKind, Entry, SubfolderGroup};
use crate::types::bookmark::{
    BookmarkNode, NodeShape, BOOKMARKS_BAR_ID, MOBILE_BOOKMARKS_ID, OTHER_BOOKMARKS_ID,
    UNCATEGORIZED_ID,
};

/// Title of the synthetic uncategorized column.
pub const UNCATEGORIZED_TITLE: &str = "Uncategorized";

/// Normalizes the raw tree into columns, in default (tree) order.
pub fn normalize(root: &BookmarkNode) -> Vec<Column> {
    let top: &[BookmarkNode] = match root.shape() {
        NodeShape::Folder { children } => children,
        NodeShape::Bookmark { .. } => &[],
    };
    let mut columns = Vec::new();

    if let Some(bar) = top.iter().find(|n| n.id == BOOKMARKS_BAR_ID) {
        let mut loose = Vec::new();
        for child in children_of(bar) {
            match child.shape() {
                NodeShape::Bookmark { url } => loose.push(Entry::Bookmark(bookmark_entry(child, url))),
                NodeShape::Folder { children } => columns.push(Column {
                    column_id: child.id.clone(),
                    kind: ColumnKind::Folder,
                    title: child.title.clone(),
                    entries: entries_of(children),
                }),
            }
        }
        columns.push(Column {
            column_id: UNCATEGORIZED_ID.to_string(),
            kind: ColumnKind::Uncategorized,
            title: UNCATEGORIZED_TITLE.to_string(),
            entries: loose,
        });
    }

    for system_id in [OTHER_BOOKMARKS_ID, MOBILE_BOOKMARKS_ID] {
        if let Some(folder) = top.iter().find(|n| n.id == system_id) {
            columns.push(Column {
                column_id: folder.id.clone(),
                kind: ColumnKind::System,
                title: folder.title.clone(),
                entries: entries_of(children_of(folder)),
            });
        }
    }

    columns
}

fn children_of(node: &BookmarkNode) -> &[BookmarkNode] {
    match node.shape() {
        NodeShape::Folder { children } => children,
        NodeShape::Bookmark { .. } => &[],
    }
}

fn bookmark_entry(node: &BookmarkNode, url: &str) -> BookmarkEntry {
    BookmarkEntry {
        id: node.id.clone(),
        title: node.title.clone(),
        url: url.to_string(),
    }
}

fn entries_of(children: &[BookmarkNode]) -> Vec<Entry> {
    children
        .iter()
        .map(|child| match child.shape() {
            NodeShape::Bookmark { url } => Entry::Bookmark(bookmark_entry(child, url)),
            NodeShape::Folder { children } => Entry::Subfolder(SubfolderGroup {
                folder_id: child.id.clone(),
                title: child.title.clone(),
                children: children
                    .iter()
                    .filter_map(|c| match c.shape() {
                        NodeShape::Bookmark { url } => Some(bookmark_entry(c, url)),
                        NodeShape::Folder { .. } => None,
                    })
                    .collect(),
            }),
        })
        .collect()
}

/// Ancestor ids of `id`, nearest first, following `parent_id` links up to the root.
///
/// Bounded by the number of nodes so a corrupt parent chain can't loop forever.
pub fn ancestors(root: &BookmarkNode, id: &str) -> Vec<String> {
    let limit = node_count(root);
    let mut chain = Vec::new();
    let mut current = root.find(id).and_then(|n| n.parent_id.clone());
    while let Some(parent_id) = current {
        if chain.len() >= limit {
            break;
        }
        current = root.find(&parent_id).and_then(|n| n.parent_id.clone());
        chain.push(parent_id);
    }
    chain
}

fn node_count(node: &BookmarkNode) -> usize {
    1 + children_of(node).iter().map(node_count).sum::<usize>()
}
