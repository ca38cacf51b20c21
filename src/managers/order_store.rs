//! Order Store.
//!
//! Persists the board's manual ordering: the column order and the per-container
//! bookmark order. Writes go to the synchronized area when it is reachable and to
//! the local SQLite fallback otherwise; the choice is made by a capability probe
//! on every call. Persistence is best-effort: failures are logged and dropped.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Map;
use tracing::{debug, warn};

use crate::managers::storage_area::KeyValueArea;
use crate::types::board::{Board, BoardItem, ColumnKind};
use crate::types::bookmark::UNCATEGORIZED_ID;
use crate::types::errors::PersistenceError;
use crate::types::order::{subfolder_key, OrderKey, OrderRecord};
use crate::types::settings::StorageSettings;

/// Persists and retrieves the two ordering maps.
pub struct OrderStore {
    remote: Arc<dyn KeyValueArea>,
    local: Arc<dyn KeyValueArea>,
    column_order_key: String,
    bookmark_order_key: String,
}

impl OrderStore {
    pub fn new(
        remote: Arc<dyn KeyValueArea>,
        local: Arc<dyn KeyValueArea>,
        settings: &StorageSettings,
    ) -> Self {
        Self {
            remote,
            local,
            column_order_key: settings.column_order_key.clone(),
            bookmark_order_key: settings.bookmark_order_key.clone(),
        }
    }

    /// Picks the area for this call: the synchronized one if it answers the probe.
    fn area(&self) -> &dyn KeyValueArea {
        if self.remote.is_available() {
            self.remote.as_ref()
        } else {
            self.local.as_ref()
        }
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), PersistenceError> {
        let mut items = Map::new();
        items.insert(key.to_string(), serde_json::to_value(value)?);
        self.area().set(items)
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let area = self.area();
        let mut found = match area.get(&[key]) {
            Ok(found) => found,
            Err(e) => {
                warn!(area = area.name(), key, error = %e, "failed to read order");
                return None;
            }
        };
        let value = found.remove(key)?;
        if value.is_null() {
            return None;
        }
        match serde_json::from_value(value) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!(area = area.name(), key, error = %e, "ignoring malformed order");
                None
            }
        }
    }

    /// Saves the column order verbatim.
    pub fn save_column_order(&self, order: &[String]) {
        match self.write(&self.column_order_key, &order) {
            Ok(()) => debug!(columns = order.len(), "column order saved"),
            Err(e) => warn!(error = %e, "failed to save column order"),
        }
    }

    /// Saves the whole bookmark order map, replacing what was stored.
    pub fn save_bookmark_order(&self, order: &BTreeMap<OrderKey, Vec<String>>) {
        match self.write(&self.bookmark_order_key, order) {
            Ok(()) => debug!(keys = order.len(), "bookmark order saved"),
            Err(e) => warn!(error = %e, "failed to save bookmark order"),
        }
    }

    pub fn get_column_order(&self) -> Option<Vec<String>> {
        self.read(&self.column_order_key)
    }

    pub fn get_bookmark_order(&self) -> Option<BTreeMap<OrderKey, Vec<String>>> {
        self.read(&self.bookmark_order_key)
    }

    /// Reads both maps into a record; missing maps are empty.
    pub fn load_record(&self) -> OrderRecord {
        OrderRecord {
            column_order: self.get_column_order().unwrap_or_default(),
            bookmark_order: self.get_bookmark_order().unwrap_or_default(),
        }
    }

    /// Removes both maps from the active area.
    pub fn clear_all(&self) {
        let area = self.area();
        let keys = [self.column_order_key.as_str(), self.bookmark_order_key.as_str()];
        match area.remove(&keys) {
            Ok(()) => debug!(area = area.name(), "all order data cleared"),
            Err(e) => warn!(area = area.name(), error = %e, "failed to clear order data"),
        }
    }
}

/// Snapshots the rendered board's ordering per container. Empty containers are omitted.
pub fn collect_bookmark_order(board: &Board) -> BTreeMap<OrderKey, Vec<String>> {
    let mut orders = BTreeMap::new();
    for column in &board.columns {
        let key = match column.kind {
            ColumnKind::Uncategorized => UNCATEGORIZED_ID.to_string(),
            _ => column.column_id.clone(),
        };
        let root = column.root_bookmark_ids();
        if !root.is_empty() {
            orders.insert(key, root);
        }
        for item in &column.items {
            if let BoardItem::Subfolder(view) = item {
                let ids: Vec<String> = view.items.iter().map(|c| c.id.clone()).collect();
                if !ids.is_empty() {
                    orders.insert(subfolder_key(&view.folder_id), ids);
                }
            }
        }
    }
    orders
}
