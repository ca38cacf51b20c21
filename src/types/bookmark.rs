use serde::{Deserialize, Serialize};

/// Id of the bookmarks bar, the parent of every folder column.
pub const BOOKMARKS_BAR_ID: &str = "1";
/// Id of the "Other Bookmarks" system folder.
pub const OTHER_BOOKMARKS_ID: &str = "2";
/// Id of the "Mobile Bookmarks" system folder.
pub const MOBILE_BOOKMARKS_ID: &str = "3";
/// Sentinel column id for loose bookmarks on the bookmarks bar. Never a real node id.
pub const UNCATEGORIZED_ID: &str = "uncategorized";

/// Returns true for the two fixed system folders that can't be renamed or deleted.
pub fn is_system_folder(id: &str) -> bool {
    id == OTHER_BOOKMARKS_ID || id == MOBILE_BOOKMARKS_ID
}

/// A node of the raw bookmark tree, in the shape the bookmark store reports it.
///
/// Exactly one of `url` / `children` is present for any non-root node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkNode {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<BookmarkNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl BookmarkNode {
    /// Creates a leaf bookmark.
    pub fn bookmark(id: &str, title: &str, url: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            url: Some(url.to_string()),
            children: None,
            parent_id: None,
        }
    }

    /// Creates a folder with the given children. Children get their `parent_id` set.
    pub fn folder(id: &str, title: &str, children: Vec<BookmarkNode>) -> Self {
        let children = children
            .into_iter()
            .map(|mut c| {
                c.parent_id = Some(id.to_string());
                c
            })
            .collect();
        Self {
            id: id.to_string(),
            title: title.to_string(),
            url: None,
            children: Some(children),
            parent_id: None,
        }
    }

    pub fn is_folder(&self) -> bool {
        self.url.is_none()
    }

    /// Decides the node's shape once so consumers don't re-inspect `url`/`children`.
    pub fn shape(&self) -> NodeShape<'_> {
        match &self.url {
            Some(url) => NodeShape::Bookmark { url },
            None => NodeShape::Folder {
                children: self.children.as_deref().unwrap_or(&[]),
            },
        }
    }

    /// Depth-first lookup by id.
    pub fn find(&self, id: &str) -> Option<&BookmarkNode> {
        if self.id == id {
            return Some(self);
        }
        self.children
            .as_deref()
            .unwrap_or(&[])
            .iter()
            .find_map(|c| c.find(id))
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut BookmarkNode> {
        if self.id == id {
            return Some(self);
        }
        self.children
            .as_mut()?
            .iter_mut()
            .find_map(|c| c.find_mut(id))
    }
}

/// Tagged view of a node: a bookmark or a folder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeShape<'a> {
    Bookmark { url: &'a str },
    Folder { children: &'a [BookmarkNode] },
}

/// Info attached to a `moved` notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveInfo {
    pub parent_id: String,
    pub index: usize,
    pub old_parent_id: String,
    pub old_index: usize,
}

/// Info attached to a `changed` notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeInfo {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Info attached to a `removed` notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveInfo {
    pub parent_id: String,
    pub index: usize,
    pub node: BookmarkNode,
}

/// Destination of a store move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveDestination {
    pub parent_id: String,
    pub index: usize,
}

/// Fields accepted by a store update. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeChanges {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Arguments of a store create. A missing `url` creates a folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDetails {
    pub parent_id: String,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub index: Option<usize>,
}

/// Kinds of change notification the bookmark store emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Created,
    Moved,
    Changed,
    Removed,
}

/// A change notification from the bookmark store.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEvent {
    Created(BookmarkNode),
    Moved { id: String, info: MoveInfo },
    Changed { id: String, info: ChangeInfo },
    Removed { id: String, info: RemoveInfo },
}

impl ChangeEvent {
    pub fn kind(&self) -> ChangeKind {
        match self {
            ChangeEvent::Created(_) => ChangeKind::Created,
            ChangeEvent::Moved { .. } => ChangeKind::Moved,
            ChangeEvent::Changed { .. } => ChangeKind::Changed,
            ChangeEvent::Removed { .. } => ChangeKind::Removed,
        }
    }
}
