//! Gallery view-model: the bridge between [`GalleryStore`] and the UI.
//!
//! The view-model never edits its published items directly.  After every
//! successful mutation it reloads from the store, so what the UI shows is
//! always what was actually persisted.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error, info};

use gallery_shared::constants::DEFAULT_CAPTION;
use gallery_shared::{now_millis, AuthError, GalleryItem, NewGalleryItem};
use gallery_store::GalleryStore;

use crate::error::{ClientError, Result};

pub const MSG_ADD_FAILED: &str = "Failed to add image to gallery";
pub const MSG_NOT_FOUND: &str = "Image not found or already deleted";
pub const MSG_DELETE_FAILED: &str = "Failed to delete image";
pub const MSG_EDIT_UNSUPPORTED: &str = "Caption update would be implemented with proper storage";

/// Snapshot published to the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryView {
    pub items: Vec<GalleryItem>,
    pub is_loading: bool,
    /// Transient, user-facing error message.
    pub error: Option<String>,
}

pub struct GalleryViewModel {
    user_id: String,
    store: GalleryStore,
    view: Arc<watch::Sender<GalleryView>>,
    error_dismiss_after: Option<Duration>,
    error_generation: Arc<AtomicU64>,
}

impl GalleryViewModel {
    /// A view-model scoped to `user_id`. An empty id shows every item and
    /// refuses additions.
    pub fn new(user_id: impl Into<String>, store: GalleryStore) -> Self {
        let (tx, _rx) = watch::channel(GalleryView::default());
        Self {
            user_id: user_id.into(),
            store,
            view: Arc::new(tx),
            error_dismiss_after: None,
            error_generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Clear published errors automatically after `after`.
    pub fn with_error_dismiss(mut self, after: Option<Duration>) -> Self {
        self.error_dismiss_after = after;
        self
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn snapshot(&self) -> GalleryView {
        self.view.borrow().clone()
    }

    pub fn items(&self) -> Vec<GalleryItem> {
        self.view.borrow().items.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.view.borrow().error.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<GalleryView> {
        self.view.subscribe()
    }

    /// Reload the owner's items from the store.
    pub async fn load(&self) {
        self.view.send_modify(|v| {
            v.is_loading = true;
            v.error = None;
        });

        let all = self.store.list_all();
        let items: Vec<GalleryItem> = if self.user_id.is_empty() {
            all
        } else {
            all.into_iter()
                .filter(|item| item.is_owned_by(&self.user_id))
                .collect()
        };

        debug!(count = items.len(), user_id = %self.user_id, "Loaded items for user");

        self.view.send_modify(|v| {
            v.items = items;
            v.is_loading = false;
        });
    }

    pub async fn refresh(&self) {
        self.load().await
    }

    /// Persist a new image for the current owner. Returns `false` and
    /// publishes an error on failure.
    pub async fn add(&self, uri: &str, caption: &str) -> bool {
        match self.try_add(uri, caption).await {
            Ok(id) => {
                info!(id = %id, "Image added to gallery");
                self.load().await;
                true
            }
            Err(e) => {
                error!(error = %e, "Error adding gallery item");
                self.publish_error(MSG_ADD_FAILED);
                false
            }
        }
    }

    async fn try_add(&self, uri: &str, caption: &str) -> Result<String> {
        if self.user_id.is_empty() {
            return Err(AuthError::NotSignedIn.into());
        }

        self.clear_error();

        let caption = caption.trim();
        let draft = NewGalleryItem {
            uri: uri.to_string(),
            caption: if caption.is_empty() {
                DEFAULT_CAPTION.to_string()
            } else {
                caption.to_string()
            },
            created_at: now_millis(),
            created_by: self.user_id.clone(),
        };

        Ok(self.store.append(draft).await?)
    }

    /// Delete an item. Reloads only when something was actually removed.
    pub async fn remove(&self, id: &str) -> bool {
        self.clear_error();
        debug!(id = %id, "Attempting to delete item");

        match self.store.delete_by_id(id) {
            Ok(true) => {
                self.load().await;
                true
            }
            Ok(false) => {
                self.publish_error(MSG_NOT_FOUND);
                false
            }
            Err(e) => {
                error!(id = %id, error = %e, "Error removing gallery item");
                self.publish_error(MSG_DELETE_FAILED);
                false
            }
        }
    }

    /// Caption editing has no persistence behind it. The notice is
    /// published to the view and the store is never touched.
    pub fn edit_caption(&self, id: &str, _caption: &str) -> Result<()> {
        info!(id = %id, "{}", MSG_EDIT_UNSUPPORTED);
        self.publish_error(MSG_EDIT_UNSUPPORTED);
        Err(ClientError::Unsupported("caption editing"))
    }

    pub fn clear_error(&self) {
        self.error_generation.fetch_add(1, Ordering::SeqCst);
        self.view.send_modify(|v| v.error = None);
    }

    fn publish_error(&self, message: &str) {
        let generation = self.error_generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.view.send_modify(|v| v.error = Some(message.to_string()));

        let Some(after) = self.error_dismiss_after else {
            return;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return;
        };

        let view = self.view.clone();
        let current = self.error_generation.clone();
        runtime.spawn(async move {
            tokio::time::sleep(after).await;
            // a newer error or an explicit clear owns the slot now
            if current.load(Ordering::SeqCst) == generation {
                view.send_modify(|v| v.error = None);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use gallery_store::{BlobRegistry, MemorySlots};

    use super::*;

    fn store() -> GalleryStore {
        GalleryStore::new(Arc::new(MemorySlots::new()), Arc::new(BlobRegistry::new()))
    }

    async fn seed(store: &GalleryStore, owner: &str, caption: &str) -> String {
        store
            .append(NewGalleryItem {
                uri: format!("https://x/{caption}"),
                caption: caption.to_string(),
                created_at: now_millis(),
                created_by: owner.to_string(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_load_filters_by_owner_in_order() {
        let store = store();
        seed(&store, "A", "a1").await;
        seed(&store, "B", "b1").await;
        seed(&store, "A", "a2").await;
        seed(&store, "B", "b2").await;

        let vm = GalleryViewModel::new("A", store);
        vm.load().await;

        let captions: Vec<String> = vm.items().into_iter().map(|i| i.caption).collect();
        assert_eq!(captions, vec!["a2", "a1"]);
        assert!(!vm.snapshot().is_loading);
    }

    #[tokio::test]
    async fn test_empty_user_sees_everything() {
        let store = store();
        seed(&store, "A", "a").await;
        seed(&store, "B", "b").await;

        let vm = GalleryViewModel::new("", store);
        vm.load().await;
        assert_eq!(vm.items().len(), 2);
    }

    #[tokio::test]
    async fn test_loading_flag_transitions() {
        let vm = GalleryViewModel::new("A", store());
        let mut rx = vm.subscribe();
        rx.borrow_and_update();

        vm.load().await;

        assert!(rx.has_changed().unwrap());
        let view = rx.borrow_and_update().clone();
        assert!(!view.is_loading);
        assert!(view.items.is_empty());
    }

    #[tokio::test]
    async fn test_add_requires_owner() {
        let store = store();
        let vm = GalleryViewModel::new("", store.clone());

        assert!(!vm.add("file:///a.jpg", "x").await);
        assert_eq!(vm.error().as_deref(), Some(MSG_ADD_FAILED));
        assert!(store.list_all().is_empty());
    }

    #[tokio::test]
    async fn test_add_reloads_from_store() {
        let vm = GalleryViewModel::new("u1", store());

        assert!(vm.add("file:///a.jpg", "sunset").await);
        let items = vm.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].caption, "sunset");
        assert_eq!(items[0].created_by, "u1");
        assert!(vm.error().is_none());
    }

    #[tokio::test]
    async fn test_blank_caption_gets_placeholder() {
        let vm = GalleryViewModel::new("u1", store());
        assert!(vm.add("file:///a.jpg", "   ").await);
        assert_eq!(vm.items()[0].caption, DEFAULT_CAPTION);
    }

    #[tokio::test]
    async fn test_add_failure_keeps_previous_items() {
        let vm = GalleryViewModel::new("u1", store());
        assert!(vm.add("file:///a.jpg", "keep").await);

        assert!(!vm.add("blob:gone", "lost").await);
        assert_eq!(vm.error().as_deref(), Some(MSG_ADD_FAILED));
        assert_eq!(vm.items().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_existing_and_missing() {
        let store = store();
        let id = seed(&store, "u1", "a").await;
        let vm = GalleryViewModel::new("u1", store);
        vm.load().await;

        assert!(vm.remove(&id).await);
        assert!(vm.items().is_empty());

        assert!(!vm.remove(&id).await);
        assert_eq!(vm.error().as_deref(), Some(MSG_NOT_FOUND));
    }

    #[tokio::test]
    async fn test_edit_caption_is_unsupported_and_touches_nothing() {
        let store = store();
        let id = seed(&store, "u1", "original").await;
        let vm = GalleryViewModel::new("u1", store.clone());

        let err = vm.edit_caption(&id, "changed").unwrap_err();
        assert!(matches!(err, ClientError::Unsupported(_)));
        assert_eq!(vm.error().as_deref(), Some(MSG_EDIT_UNSUPPORTED));
        assert_eq!(store.list_all()[0].caption, "original");
    }

    #[tokio::test(start_paused = true)]
    async fn test_errors_dismiss_themselves() {
        let vm = GalleryViewModel::new("u1", store()).with_error_dismiss(Some(Duration::from_secs(5)));

        assert!(!vm.remove("item-0-missing").await);
        assert_eq!(vm.error().as_deref(), Some(MSG_NOT_FOUND));

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(vm.error().is_some());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(vm.error().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_error_outlives_older_timer() {
        let vm = GalleryViewModel::new("u1", store()).with_error_dismiss(Some(Duration::from_secs(5)));

        assert!(!vm.remove("item-0-missing").await);
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(!vm.add("blob:gone", "x").await);

        // first timer fires at t=5 but the second error is newer
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(vm.error().as_deref(), Some(MSG_ADD_FAILED));

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(vm.error().is_none());
    }
}
