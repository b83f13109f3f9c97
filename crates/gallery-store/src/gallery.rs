//! Gallery item lifecycle: list, append, delete, clear.
//!
//! The collection is one JSON array in a single slot, newest item first.
//! Every operation reads the whole array and mutations write the whole array
//! back.  Nothing here serialises concurrent writers: two overlapping
//! read-modify-write cycles can lose an update, so callers issue mutations
//! one at a time.

use std::collections::HashSet;
use std::sync::Arc;

use rand::Rng;
use tracing::{debug, error, info};

use gallery_shared::constants::{GALLERY_KEY, ITEM_ID_PREFIX, ITEM_ID_SUFFIX_LEN};
use gallery_shared::types::{now_millis, GalleryItem, NewGalleryItem};
use gallery_shared::uri::is_blob_uri;

use crate::error::Result;
use crate::resolver::HandleResolver;
use crate::slots::SlotStore;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Persistence authority for gallery items.
#[derive(Clone)]
pub struct GalleryStore {
    slots: Arc<dyn SlotStore>,
    resolver: Arc<dyn HandleResolver>,
    key: String,
}

impl GalleryStore {
    /// Create a store persisting into the default gallery slot.
    pub fn new(slots: Arc<dyn SlotStore>, resolver: Arc<dyn HandleResolver>) -> Self {
        Self {
            slots,
            resolver,
            key: GALLERY_KEY.to_string(),
        }
    }

    /// Use a different slot name.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn slots(&self) -> &Arc<dyn SlotStore> {
        &self.slots
    }

    /// Every persisted item, newest first.
    ///
    /// Never fails: a missing slot, a storage read error or a corrupt payload
    /// all read as an empty gallery.  The root cause is logged.
    pub fn list_all(&self) -> Vec<GalleryItem> {
        match self.try_list_all() {
            Ok(items) => {
                debug!(count = items.len(), "Retrieved items from storage");
                items
            }
            Err(e) => {
                error!(key = %self.key, error = %e, "Error getting gallery items");
                Vec::new()
            }
        }
    }

    fn try_list_all(&self) -> Result<Vec<GalleryItem>> {
        match self.slots.get_slot(&self.key)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    /// Persist a new item at the head of the gallery and return its id.
    ///
    /// An ephemeral `blob:` uri is resolved into a `data:` uri first; if that
    /// fails nothing is written.
    pub async fn append(&self, draft: NewGalleryItem) -> Result<String> {
        let mut draft = draft;
        if is_blob_uri(&draft.uri) {
            debug!(uri = %draft.uri, "Converting blob URI to data URI");
            draft.uri = self.resolver.resolve(&draft.uri).await.map_err(|e| {
                error!(error = %e, "Error saving gallery item");
                e
            })?;
        }

        let items = self.list_all();
        let id = {
            let taken: HashSet<&str> = items.iter().map(|i| i.id.as_str()).collect();
            generate_item_id(&mut rand::thread_rng(), now_millis(), &taken)
        };

        let mut updated = Vec::with_capacity(items.len() + 1);
        updated.push(draft.into_item(id.clone()));
        updated.extend(items);

        self.write_all(&updated).map_err(|e| {
            error!(error = %e, "Error saving gallery item");
            e
        })?;

        info!(id = %id, total = updated.len(), "Saved new item");
        Ok(id)
    }

    /// Remove the item with `id`.
    ///
    /// Returns `Ok(false)` when no such item exists; the slot is then left
    /// untouched.
    pub fn delete_by_id(&self, id: &str) -> Result<bool> {
        let items = self.list_all();
        let before = items.len();
        let updated: Vec<GalleryItem> = items.into_iter().filter(|i| i.id != id).collect();

        if updated.len() == before {
            debug!(id = %id, "No item found with ID");
            return Ok(false);
        }

        self.write_all(&updated).map_err(|e| {
            error!(id = %id, error = %e, "Error deleting gallery item");
            e
        })?;

        info!(id = %id, before, after = updated.len(), "Deleted item");
        Ok(true)
    }

    /// Drop the whole gallery. Clearing an empty gallery is not an error.
    pub fn clear_all(&self) -> Result<()> {
        self.slots.remove_slot(&self.key).map_err(|e| {
            error!(error = %e, "Error clearing gallery items");
            e
        })?;
        info!("Cleared all gallery items");
        Ok(())
    }

    fn write_all(&self, items: &[GalleryItem]) -> Result<()> {
        let json = serde_json::to_string(items)?;
        self.slots.set_slot(&self.key, &json)
    }
}

/// Build an id of the form `item-<millis>-<base36 suffix>` that is not in
/// `taken`.
pub fn generate_item_id<R: Rng + ?Sized>(rng: &mut R, millis: i64, taken: &HashSet<&str>) -> String {
    loop {
        let suffix: String = (0..ITEM_ID_SUFFIX_LEN)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect();
        let id = format!("{ITEM_ID_PREFIX}-{millis}-{suffix}");
        if !taken.contains(id.as_str()) {
            return id;
        }
    }
}
