use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Key under which one container's manual ordering is stored: a column id, or
/// `subfolder-<id>` for a subfolder interior.
pub type OrderKey = String;

const SUBFOLDER_PREFIX: &str = "subfolder-";

/// Builds the order key of a subfolder interior.
pub fn subfolder_key(folder_id: &str) -> OrderKey {
    format!("{}{}", SUBFOLDER_PREFIX, folder_id)
}

/// Returns the folder id if `key` names a subfolder interior.
pub fn parse_subfolder_key(key: &str) -> Option<&str> {
    key.strip_prefix(SUBFOLDER_PREFIX)
}

/// Persisted manual ordering. Advisory: reconciled against tree truth at every render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    #[serde(default)]
    pub column_order: Vec<String>,
    #[serde(default)]
    pub bookmark_order: BTreeMap<OrderKey, Vec<String>>,
}

impl OrderRecord {
    pub fn bookmark_order_for(&self, key: &str) -> &[String] {
        self.bookmark_order
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Applies a completed move: `id` leaves `source_key` (whose current display order
    /// is `source_ids`) and lands at `index` in `dest_key` (current order `dest_ids`).
    ///
    /// The current display orders are used rather than the stored lists, which may be
    /// stale or partial.
    pub fn apply_move(
        &mut self,
        id: &str,
        source_key: &str,
        source_ids: &[String],
        dest_key: &str,
        dest_ids: &[String],
        index: usize,
    ) {
        let mut source: Vec<String> = source_ids.iter().filter(|i| *i != id).cloned().collect();
        if source_key == dest_key {
            let at = index.min(source.len());
            source.insert(at, id.to_string());
            self.bookmark_order.insert(source_key.to_string(), source);
            return;
        }

        let mut dest: Vec<String> = dest_ids.iter().filter(|i| *i != id).cloned().collect();
        let at = index.min(dest.len());
        dest.insert(at, id.to_string());

        if source.is_empty() {
            self.bookmark_order.remove(source_key);
        } else {
            self.bookmark_order.insert(source_key.to_string(), source);
        }
        self.bookmark_order.insert(dest_key.to_string(), dest);
    }

    /// Drops a removed item from every saved list, together with the saved interior
    /// of a removed subfolder. Lists left empty are dropped. Returns true if anything
    /// changed.
    pub fn forget(&mut self, id: &str) -> bool {
        let mut changed = self.bookmark_order.remove(&subfolder_key(id)).is_some();
        for ids in self.bookmark_order.values_mut() {
            let before = ids.len();
            ids.retain(|i| i != id);
            changed |= ids.len() != before;
        }
        self.bookmark_order.retain(|_, ids| !ids.is_empty());
        changed
    }
}
