//! Resolution of ephemeral image handles into self-contained data URIs.
//!
//! Pickers and cameras may hand the gallery a `blob:` handle that is only
//! meaningful inside the current process.  Before such an item is persisted
//! the handle is swapped for a `data:` URI that embeds the bytes.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::debug;
use uuid::Uuid;

use gallery_shared::constants::{BLOB_SCHEME, DATA_SCHEME};
use gallery_shared::uri::is_blob_uri;

use crate::error::{Result, StoreError};

const FALLBACK_MIME: &str = "application/octet-stream";

/// Turns an image reference into one that stays valid after the session ends.
#[async_trait]
pub trait HandleResolver: Send + Sync {
    async fn resolve(&self, uri: &str) -> Result<String>;
}

struct BlobEntry {
    mime: String,
    bytes: Vec<u8>,
}

/// In-process registry of `blob:` handles.
///
/// Producers [`register`](Self::register) raw bytes and get a handle back;
/// the store resolves handles into base64 `data:` URIs at save time.
#[derive(Default)]
pub struct BlobRegistry {
    entries: Mutex<HashMap<String, BlobEntry>>,
}

impl BlobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register image bytes and return the ephemeral handle naming them.
    pub fn register(&self, bytes: Vec<u8>, mime: &str) -> Result<String> {
        let uri = format!("{BLOB_SCHEME}{}", Uuid::new_v4());
        let mime = if mime.trim().is_empty() {
            FALLBACK_MIME.to_string()
        } else {
            mime.trim().to_string()
        };

        debug!(uri = %uri, size = bytes.len(), mime = %mime, "Registered blob handle");

        self.entries
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))?
            .insert(uri.clone(), BlobEntry { mime, bytes });
        Ok(uri)
    }

    /// Forget a handle. Returns whether it was registered.
    pub fn revoke(&self, uri: &str) -> Result<bool> {
        let removed = self
            .entries
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))?
            .remove(uri)
            .is_some();
        Ok(removed)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl HandleResolver for BlobRegistry {
    async fn resolve(&self, uri: &str) -> Result<String> {
        if !is_blob_uri(uri) {
            return Ok(uri.to_string());
        }

        let entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))?;
        let entry = entries.get(uri).ok_or_else(|| StoreError::HandleResolution {
            uri: uri.to_string(),
            reason: "unknown or revoked handle".to_string(),
        })?;

        Ok(format!(
            "{DATA_SCHEME}{};base64,{}",
            entry.mime,
            STANDARD.encode(&entry.bytes)
        ))
    }
}
