//! Named key-value slots.
//!
//! A slot holds one UTF-8 string under a key.  Writing a slot replaces its
//! whole value in one step: readers see either the old value or the new one,
//! never a mix.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use crate::database::Database;
use crate::error::{Result, StoreError};

/// Storage primitive the gallery is persisted into.
pub trait SlotStore: Send + Sync {
    /// Read a slot. `Ok(None)` when nothing was ever stored under `key`.
    fn get_slot(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value of a slot, creating it if needed.
    fn set_slot(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a slot. Returns whether it existed.
    fn remove_slot(&self, key: &str) -> Result<bool>;
}

impl SlotStore for Database {
    fn get_slot(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn()?
            .query_row(
                "SELECT value FROM kv_slots WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    // single UPSERT statement, so SQLite applies it atomically
    fn set_slot(&self, key: &str, value: &str) -> Result<()> {
        self.conn()?.execute(
            "INSERT INTO kv_slots (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn remove_slot(&self, key: &str) -> Result<bool> {
        let affected = self
            .conn()?
            .execute("DELETE FROM kv_slots WHERE key = ?1", params![key])?;
        Ok(affected > 0)
    }
}

/// Slots kept in process memory only.
#[derive(Debug, Default)]
pub struct MemorySlots {
    slots: Mutex<HashMap<String, String>>,
}

impl MemorySlots {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SlotStore for MemorySlots {
    fn get_slot(&self, key: &str) -> Result<Option<String>> {
        let slots = self
            .slots
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))?;
        Ok(slots.get(key).cloned())
    }

    fn set_slot(&self, key: &str, value: &str) -> Result<()> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_slot(&self, key: &str) -> Result<bool> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))?;
        Ok(slots.remove(key).is_some())
    }
}
