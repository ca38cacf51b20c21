// Bookmark board state managers
// Managers own stateful collaborators: the bookmark store, change notifications, and order persistence.

pub mod bookmark_store;
pub mod change_hub;
pub mod order_store;
pub mod storage_area;
