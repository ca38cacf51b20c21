use thiserror::Error;

// === StoreError ===

/// Errors reported by the bookmark store collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store API is absent (e.g. running outside the host browser).
    #[error("Bookmark store unavailable: {0}")]
    Unavailable(String),
    /// No node with the given id exists.
    #[error("Bookmark node not found: {0}")]
    NotFound(String),
    /// The requested parent doesn't exist or isn't a folder.
    #[error("Invalid parent: {0}")]
    InvalidParent(String),
    /// The move would place a folder inside its own subtree.
    #[error("Cannot move {0} into its own subtree")]
    Cycle(String),
    /// The store refused the operation.
    #[error("{0}")]
    Rejected(String),
}

// === MoveError ===

/// Errors from reconciling a drop gesture with the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    /// A folder was dropped onto itself.
    #[error("Cannot drop folder on itself")]
    SelfDrop,
    /// A folder was dropped into one of its own descendants.
    #[error("Cannot drop folder into its own subfolder")]
    DescendantDrop,
    /// The destination container has no resolvable parent folder.
    #[error("Unknown drop target: {0}")]
    UnresolvedTarget(String),
    /// The store rejected the move.
    #[error("{0}")]
    Rejected(String),
}

impl From<StoreError> for MoveError {
    fn from(err: StoreError) -> Self {
        MoveError::Rejected(err.to_string())
    }
}

// === PersistenceError ===

/// Errors from the order persistence layer. Logged, never surfaced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    /// The storage area can't be used right now.
    #[error("Storage area unavailable: {0}")]
    Unavailable(String),
    /// A write exceeded the area's quota.
    #[error("Storage quota exceeded: {0}")]
    QuotaExceeded(String),
    /// A value could not be (de)serialized.
    #[error("Order serialization error: {0}")]
    Serialization(String),
    /// The local SQLite backend failed.
    #[error("Order database error: {0}")]
    Database(String),
}

impl From<rusqlite::Error> for PersistenceError {
    fn from(err: rusqlite::Error) -> Self {
        PersistenceError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        PersistenceError::Serialization(err.to_string())
    }
}

// === RenderError ===

/// Errors that abort a render pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// Fetching the bookmark tree failed.
    #[error("Failed to fetch bookmark tree: {0}")]
    TreeFetch(String),
    /// The fetched tree's root is not a folder.
    #[error("Bookmark tree has no root folder")]
    MissingRoot,
}

// === EditError ===

/// Errors from column and bookmark edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// The column is a system or synthetic column and can't be edited.
    #[error("Column cannot be modified: {0}")]
    ProtectedColumn(String),
    /// A blank title was supplied.
    #[error("Title cannot be empty")]
    EmptyTitle,
    /// The store rejected the edit.
    #[error("Bookmark store error: {0}")]
    Store(#[from] StoreError),
}

// === SettingsError ===

/// Errors related to board settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Failed to read or write the settings file.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// The settings file is malformed.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// The dot-notation key doesn't name a setting.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The value doesn't fit the setting's type.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}
