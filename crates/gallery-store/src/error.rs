use thiserror::Error;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite error.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to determine a platform data directory.
    #[error("Could not determine application data directory")]
    NoDataDir,

    /// Generic I/O error (e.g. creating the database directory).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The gallery slot could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Schema migration failure.
    #[error("Migration error: {0}")]
    Migration(String),

    /// An ephemeral image handle could not be turned into a durable one.
    #[error("Could not resolve image handle {uri}: {reason}")]
    HandleResolution { uri: String, reason: String },

    /// A lock guarding a backend was poisoned by a panicking holder.
    #[error("Lock poisoned: {0}")]
    Lock(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
