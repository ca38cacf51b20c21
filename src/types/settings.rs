use serde::{Deserialize, Serialize};

/// Top-level board settings container.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BoardSettings {
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub reconcile: ReconcileSettings,
}

/// Where and how manual orderings are persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageSettings {
    pub column_order_key: String,
    pub bookmark_order_key: String,
    /// Total bytes the synchronized area accepts.
    pub sync_quota_bytes: usize,
    /// Bytes a single key of the synchronized area accepts.
    pub sync_quota_bytes_per_item: usize,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            column_order_key: "bookmark_board_column_order".to_string(),
            bookmark_order_key: "bookmark_board_bookmark_order".to_string(),
            sync_quota_bytes: 102_400,
            sync_quota_bytes_per_item: 8_192,
        }
    }
}

/// How change notifications and drops are reconciled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReconcileSettings {
    /// Run a full refresh after the targeted patch for `removed` notifications.
    pub refresh_on_remove: bool,
    /// Fade-out length of a removed card.
    pub fade_millis: u64,
    /// Reject drops of a folder into any of its descendants, not just itself.
    pub detect_descendant_cycles: bool,
}

impl Default for ReconcileSettings {
    fn default() -> Self {
        Self {
            refresh_on_remove: true,
            fade_millis: 300,
            detect_descendant_cycles: true,
        }
    }
}
