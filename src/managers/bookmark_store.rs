//! Bookmark Store.
//!
//! Defines `BookmarkStore`, the blocking-style interface the board consumes from the
//! browser's bookmark store, and `MemoryBookmarkStore`, a complete in-process
//! implementation that enforces the same structural rules and emits change
//! notifications through a [`ChangeHub`].

use std::sync::Mutex;

use tracing::debug;
use uuid::Uuid;

use crate::managers::change_hub::{ChangeHub, Subscription};
use crate::types::bookmark::{
    BookmarkNode, ChangeEvent, ChangeInfo, ChangeKind, CreateDetails, MoveDestination, MoveInfo,
    NodeChanges, RemoveInfo, BOOKMARKS_BAR_ID, MOBILE_BOOKMARKS_ID, OTHER_BOOKMARKS_ID,
};
use crate::types::errors::StoreError;

/// Id of the invisible tree root.
pub const ROOT_ID: &str = "0";

/// Trait defining the bookmark store operations the board relies on.
pub trait BookmarkStore: Send + Sync {
    fn get_tree(&self) -> Result<BookmarkNode, StoreError>;
    fn move_node(&self, id: &str, destination: &MoveDestination) -> Result<BookmarkNode, StoreError>;
    fn update(&self, id: &str, changes: &NodeChanges) -> Result<BookmarkNode, StoreError>;
    fn create(&self, details: &CreateDetails) -> Result<BookmarkNode, StoreError>;
    fn remove(&self, id: &str) -> Result<(), StoreError>;
    fn subscribe(&self, kind: ChangeKind) -> Subscription;
    /// Detaches a subscription. Returns false if it was already detached.
    fn unsubscribe(&self, id: Uuid) -> bool;
}

/// Demonstration tree shown when no real store is reachable.
pub fn sample_tree() -> BookmarkNode {
    BookmarkNode::folder(
        ROOT_ID,
        "",
        vec![
            BookmarkNode::folder(
                BOOKMARKS_BAR_ID,
                "Bookmarks Bar",
                vec![
                    BookmarkNode::folder(
                        "10",
                        "Frontend",
                        vec![
                            BookmarkNode::bookmark("101", "MDN Web Docs", "https://developer.mozilla.org/"),
                            BookmarkNode::bookmark("102", "React", "https://react.dev/"),
                        ],
                    ),
                    BookmarkNode::folder(
                        "11",
                        "Backend",
                        vec![
                            BookmarkNode::bookmark("111", "Node.js", "https://nodejs.org/"),
                            BookmarkNode::bookmark("112", "Express", "https://expressjs.com/"),
                        ],
                    ),
                    BookmarkNode::bookmark("120", "Cursor", "https://cursor.sh/"),
                    BookmarkNode::bookmark("121", "GitHub", "https://github.com/"),
                ],
            ),
            BookmarkNode::folder(
                OTHER_BOOKMARKS_ID,
                "Other Bookmarks",
                vec![BookmarkNode::bookmark("201", "YouTube", "https://www.youtube.com/")],
            ),
            BookmarkNode::folder(MOBILE_BOOKMARKS_ID, "Mobile Bookmarks", vec![]),
        ],
    )
}

fn is_fixed(id: &str) -> bool {
    matches!(id, ROOT_ID | BOOKMARKS_BAR_ID | OTHER_BOOKMARKS_ID | MOBILE_BOOKMARKS_ID)
}

fn max_numeric_id(node: &BookmarkNode) -> u64 {
    let own = node.id.parse::<u64>().unwrap_or(0);
    node.children
        .as_deref()
        .unwrap_or(&[])
        .iter()
        .map(max_numeric_id)
        .fold(own, u64::max)
}

/// Sets every child's `parent_id` from its position in the tree.
fn link_parents(node: &mut BookmarkNode) {
    let id = node.id.clone();
    for child in node.children.iter_mut().flatten() {
        child.parent_id = Some(id.clone());
        link_parents(child);
    }
}

/// Detaches `id` from its parent. Returns the node, its parent id and former index.
fn detach(node: &mut BookmarkNode, id: &str) -> Option<(BookmarkNode, String, usize)> {
    let children = node.children.as_mut()?;
    if let Some(index) = children.iter().position(|c| c.id == id) {
        return Some((children.remove(index), node.id.clone(), index));
    }
    children.iter_mut().find_map(|c| detach(c, id))
}

/// True if `candidate` is `folder_id` or lies anywhere beneath it.
fn is_within(root: &BookmarkNode, folder_id: &str, candidate: &str) -> bool {
    root.find(folder_id)
        .map(|folder| folder.find(candidate).is_some())
        .unwrap_or(false)
}

struct StoreState {
    root: BookmarkNode,
    next_id: u64,
    available: bool,
}

/// In-process bookmark store.
pub struct MemoryBookmarkStore {
    state: Mutex<StoreState>,
    hub: ChangeHub,
}

impl MemoryBookmarkStore {
    /// Creates a store holding the given tree.
    pub fn new(mut root: BookmarkNode) -> Self {
        root.parent_id = None;
        link_parents(&mut root);
        let next_id = max_numeric_id(&root) + 1;
        Self {
            state: Mutex::new(StoreState {
                root,
                next_id,
                available: true,
            }),
            hub: ChangeHub::new(),
        }
    }

    /// Creates a store holding [`sample_tree`].
    pub fn with_sample_tree() -> Self {
        Self::new(sample_tree())
    }

    /// Simulates the host API disappearing (or coming back).
    pub fn set_available(&self, available: bool) {
        self.lock().available = available;
    }

    /// Access to the notification hub, for hosts that publish their own events.
    pub fn hub(&self) -> &ChangeHub {
        &self.hub
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn checked(&self) -> Result<std::sync::MutexGuard<'_, StoreState>, StoreError> {
        let state = self.lock();
        if !state.available {
            return Err(StoreError::Unavailable("bookmarks API not present".to_string()));
        }
        Ok(state)
    }
}

impl BookmarkStore for MemoryBookmarkStore {
    fn get_tree(&self) -> Result<BookmarkNode, StoreError> {
        Ok(self.checked()?.root.clone())
    }

    fn move_node(&self, id: &str, destination: &MoveDestination) -> Result<BookmarkNode, StoreError> {
        let (moved, info) = {
            let mut state = self.checked()?;
            if is_fixed(id) {
                return Err(StoreError::Rejected("Can't modify the root bookmark folders.".to_string()));
            }
            if state.root.find(id).is_none() {
                return Err(StoreError::NotFound(id.to_string()));
            }
            match state.root.find(&destination.parent_id) {
                Some(parent) if parent.is_folder() => {}
                _ => return Err(StoreError::InvalidParent(destination.parent_id.clone())),
            }
            if is_within(&state.root, id, &destination.parent_id) {
                return Err(StoreError::Cycle(id.to_string()));
            }

            let (mut node, old_parent_id, old_index) = detach(&mut state.root, id)
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            node.parent_id = Some(destination.parent_id.clone());
            let parent = state
                .root
                .find_mut(&destination.parent_id)
                .ok_or_else(|| StoreError::InvalidParent(destination.parent_id.clone()))?;
            let children = parent.children.get_or_insert_with(Vec::new);
            let index = destination.index.min(children.len());
            children.insert(index, node.clone());

            let info = MoveInfo {
                parent_id: destination.parent_id.clone(),
                index,
                old_parent_id,
                old_index,
            };
            (node, info)
        };
        debug!(id, parent = %info.parent_id, index = info.index, "bookmark moved");
        self.hub.publish(ChangeEvent::Moved {
            id: id.to_string(),
            info,
        });
        Ok(moved)
    }

    fn update(&self, id: &str, changes: &NodeChanges) -> Result<BookmarkNode, StoreError> {
        let updated = {
            let mut state = self.checked()?;
            if is_fixed(id) {
                return Err(StoreError::Rejected("Can't modify the root bookmark folders.".to_string()));
            }
            let node = state
                .root
                .find_mut(id)
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            if changes.url.is_some() && node.is_folder() {
                return Err(StoreError::Rejected("Can't set URL of a bookmark folder.".to_string()));
            }
            if let Some(title) = &changes.title {
                node.title = title.clone();
            }
            if let Some(url) = &changes.url {
                node.url = Some(url.clone());
            }
            node.clone()
        };
        self.hub.publish(ChangeEvent::Changed {
            id: id.to_string(),
            info: ChangeInfo {
                title: updated.title.clone(),
                url: updated.url.clone(),
            },
        });
        Ok(updated)
    }

    fn create(&self, details: &CreateDetails) -> Result<BookmarkNode, StoreError> {
        let created = {
            let mut state = self.checked()?;
            let id = state.next_id.to_string();
            state.next_id += 1;
            let parent = match state.root.find_mut(&details.parent_id) {
                Some(parent) if parent.is_folder() => parent,
                _ => return Err(StoreError::InvalidParent(details.parent_id.clone())),
            };
            let node = BookmarkNode {
                id,
                title: details.title.clone(),
                url: details.url.clone(),
                children: if details.url.is_some() { None } else { Some(Vec::new()) },
                parent_id: Some(details.parent_id.clone()),
            };
            let children = parent.children.get_or_insert_with(Vec::new);
            let index = details.index.unwrap_or(children.len()).min(children.len());
            children.insert(index, node.clone());
            node
        };
        self.hub.publish(ChangeEvent::Created(created.clone()));
        Ok(created)
    }

    fn remove(&self, id: &str) -> Result<(), StoreError> {
        let info = {
            let mut state = self.checked()?;
            if is_fixed(id) {
                return Err(StoreError::Rejected("Can't modify the root bookmark folders.".to_string()));
            }
            let (node, parent_id, index) =
                detach(&mut state.root, id).ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            RemoveInfo {
                parent_id,
                index,
                node,
            }
        };
        self.hub.publish(ChangeEvent::Removed {
            id: id.to_string(),
            info,
        });
        Ok(())
    }

    fn subscribe(&self, kind: ChangeKind) -> Subscription {
        self.hub.subscribe(kind)
    }

    fn unsubscribe(&self, id: Uuid) -> bool {
        self.hub.unsubscribe(id)
    }
}
