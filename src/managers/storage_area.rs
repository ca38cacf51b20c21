//! Key-value storage areas backing the order store.
//!
//! `SyncArea` models the browser's synchronized storage (quota-limited, may be
//! unavailable outside the host). `LocalArea` is the synchronous fallback, a
//! SQLite table managed through [`Database`].

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{params, OptionalExtension};
use serde_json::{Map, Value};

use crate::database::Database;
use crate::types::errors::PersistenceError;

/// A JSON key-value storage area.
pub trait KeyValueArea: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &'static str;
    /// Capability probe: whether the area can be used right now.
    fn is_available(&self) -> bool;
    /// Returns the stored values for the keys that exist.
    fn get(&self, keys: &[&str]) -> Result<Map<String, Value>, PersistenceError>;
    fn set(&self, items: Map<String, Value>) -> Result<(), PersistenceError>;
    fn remove(&self, keys: &[&str]) -> Result<(), PersistenceError>;
}

// === SyncArea ===

struct SyncState {
    items: Map<String, Value>,
    available: bool,
}

/// In-process model of a synchronized storage area with byte quotas.
pub struct SyncArea {
    state: Mutex<SyncState>,
    quota_bytes: usize,
    quota_bytes_per_item: usize,
}

impl SyncArea {
    pub fn new(quota_bytes: usize, quota_bytes_per_item: usize) -> Self {
        Self {
            state: Mutex::new(SyncState {
                items: Map::new(),
                available: true,
            }),
            quota_bytes,
            quota_bytes_per_item,
        }
    }

    /// A sync area that reports itself unavailable, as outside the host runtime.
    pub fn unavailable() -> Self {
        let area = Self::new(0, 0);
        area.set_available(false);
        area
    }

    pub fn set_available(&self, available: bool) {
        self.lock().available = available;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SyncState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn item_bytes(key: &str, value: &Value) -> usize {
        key.len() + value.to_string().len()
    }
}

impl KeyValueArea for SyncArea {
    fn name(&self) -> &'static str {
        "sync"
    }

    fn is_available(&self) -> bool {
        self.lock().available
    }

    fn get(&self, keys: &[&str]) -> Result<Map<String, Value>, PersistenceError> {
        let state = self.lock();
        if !state.available {
            return Err(PersistenceError::Unavailable(self.name().to_string()));
        }
        Ok(keys
            .iter()
            .filter_map(|k| state.items.get(*k).map(|v| (k.to_string(), v.clone())))
            .collect())
    }

    fn set(&self, items: Map<String, Value>) -> Result<(), PersistenceError> {
        let mut state = self.lock();
        if !state.available {
            return Err(PersistenceError::Unavailable(self.name().to_string()));
        }
        for (key, value) in &items {
            let bytes = Self::item_bytes(key, value);
            if bytes > self.quota_bytes_per_item {
                return Err(PersistenceError::QuotaExceeded(format!(
                    "{} is {} bytes, limit {}",
                    key, bytes, self.quota_bytes_per_item
                )));
            }
        }
        let total: usize = state
            .items
            .iter()
            .filter(|(k, _)| !items.contains_key(*k))
            .chain(items.iter())
            .map(|(k, v)| Self::item_bytes(k, v))
            .sum();
        if total > self.quota_bytes {
            return Err(PersistenceError::QuotaExceeded(format!(
                "{} bytes total, limit {}",
                total, self.quota_bytes
            )));
        }
        state.items.extend(items);
        Ok(())
    }

    fn remove(&self, keys: &[&str]) -> Result<(), PersistenceError> {
        let mut state = self.lock();
        if !state.available {
            return Err(PersistenceError::Unavailable(self.name().to_string()));
        }
        for key in keys {
            state.items.remove(*key);
        }
        Ok(())
    }
}

// === LocalArea ===

/// Synchronous fallback area stored in the `kv_store` SQLite table.
pub struct LocalArea {
    db: Mutex<Database>,
}

impl LocalArea {
    pub fn new(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }

    /// A local area over a fresh in-memory database.
    pub fn in_memory() -> Result<Self, PersistenceError> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }
}

impl KeyValueArea for LocalArea {
    fn name(&self) -> &'static str {
        "local"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn get(&self, keys: &[&str]) -> Result<Map<String, Value>, PersistenceError> {
        let db = self.db.lock().map_err(|e| PersistenceError::Database(e.to_string()))?;
        let conn = db.connection();
        let mut out = Map::new();
        for key in keys {
            let raw: Option<String> = conn
                .query_row(
                    "SELECT value FROM kv_store WHERE key = ?1",
                    params![*key],
                    |row| row.get(0),
                )
                .optional()?;
            if let Some(raw) = raw {
                out.insert(key.to_string(), serde_json::from_str(&raw)?);
            }
        }
        Ok(out)
    }

    fn set(&self, items: Map<String, Value>) -> Result<(), PersistenceError> {
        let db = self.db.lock().map_err(|e| PersistenceError::Database(e.to_string()))?;
        let conn = db.connection();
        let now = Self::now();
        for (key, value) in items {
            conn.execute(
                "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3) \
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value.to_string(), now],
            )?;
        }
        Ok(())
    }

    fn remove(&self, keys: &[&str]) -> Result<(), PersistenceError> {
        let db = self.db.lock().map_err(|e| PersistenceError::Database(e.to_string()))?;
        let conn = db.connection();
        for key in keys {
            conn.execute("DELETE FROM kv_store WHERE key = ?1", params![*key])?;
        }
        Ok(())
    }
}
