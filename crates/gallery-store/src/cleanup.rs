//! One-shot cleanup of legacy gallery entries.
//!
//! Older builds persisted `blob:` handles straight into the gallery.  Those
//! handles die with the session that created them, so the entries can never
//! be displayed again.  [`migrate_gallery_storage`] drops every entry whose
//! `uri` is not durable and rewrites the slot only when something was
//! dropped.  It is best-effort: failures are logged and never propagated.

use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use gallery_shared::UriKind;

use crate::error::Result;
use crate::gallery::GalleryStore;
use crate::slots::SlotStore;

/// Outcome of a cleanup pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// Entries found in the slot.
    pub before: usize,
    /// Entries kept.
    pub after: usize,
    /// Whether the slot was rewritten.
    pub rewritten: bool,
}

impl MigrationReport {
    pub fn removed(&self) -> usize {
        self.before - self.after
    }
}

/// Drop entries with unusable image references from the slot at `key`.
pub fn migrate_gallery_storage(slots: &dyn SlotStore, key: &str) -> MigrationReport {
    match try_migrate(slots, key) {
        Ok(report) => report,
        Err(e) => {
            error!(key, error = %e, "Migration error");
            MigrationReport::default()
        }
    }
}

fn try_migrate(slots: &dyn SlotStore, key: &str) -> Result<MigrationReport> {
    let Some(json) = slots.get_slot(key)? else {
        return Ok(MigrationReport::default());
    };

    // Decoded as raw values so entries are kept exactly as stored,
    // including fields this build does not know about.
    let items: Vec<Value> = serde_json::from_str(&json)?;
    let before = items.len();

    let valid: Vec<Value> = items.into_iter().filter(has_durable_uri).collect();
    let after = valid.len();

    if after == before {
        return Ok(MigrationReport {
            before,
            after,
            rewritten: false,
        });
    }

    slots.set_slot(key, &serde_json::to_string(&valid)?)?;
    info!(removed = before - after, "Migrating storage: removed invalid items");

    Ok(MigrationReport {
        before,
        after,
        rewritten: true,
    })
}

fn has_durable_uri(item: &Value) -> bool {
    item.get("uri")
        .and_then(Value::as_str)
        .map(|uri| UriKind::of(uri).is_durable())
        .unwrap_or(false)
}

/// Remove the whole slot at `key`. Failures are logged and swallowed.
pub fn clear_broken_images(slots: &dyn SlotStore, key: &str) {
    match slots.remove_slot(key) {
        Ok(_) => info!(key, "Cleared all broken images from storage"),
        Err(e) => error!(key, error = %e, "Error clearing broken images"),
    }
}

impl GalleryStore {
    /// Run the cleanup pass against this store's slot.
    pub fn migrate(&self) -> MigrationReport {
        migrate_gallery_storage(self.slots().as_ref(), self.key())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::error::StoreError;
    use crate::resolver::BlobRegistry;
    use crate::slots::MemorySlots;
    use gallery_shared::constants::GALLERY_KEY;

    /// Memory slots that count writes.
    #[derive(Default)]
    struct CountingSlots {
        inner: MemorySlots,
        writes: AtomicUsize,
    }

    impl SlotStore for CountingSlots {
        fn get_slot(&self, key: &str) -> Result<Option<String>> {
            self.inner.get_slot(key)
        }

        fn set_slot(&self, key: &str, value: &str) -> Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.set_slot(key, value)
        }

        fn remove_slot(&self, key: &str) -> Result<bool> {
            self.inner.remove_slot(key)
        }
    }

    struct BrokenSlots;

    impl SlotStore for BrokenSlots {
        fn get_slot(&self, _key: &str) -> Result<Option<String>> {
            Err(StoreError::Lock("broken".into()))
        }

        fn set_slot(&self, _key: &str, _value: &str) -> Result<()> {
            Err(StoreError::Lock("broken".into()))
        }

        fn remove_slot(&self, _key: &str) -> Result<bool> {
            Err(StoreError::Lock("broken".into()))
        }
    }

    fn entry(id: &str, uri: &str) -> Value {
        serde_json::json!({
            "id": id,
            "uri": uri,
            "caption": "c",
            "createdAt": 1,
            "createdBy": "u1",
        })
    }

    #[test]
    fn test_drops_ephemeral_and_empty_uris() {
        let slots = CountingSlots::default();
        let stored = vec![
            entry("a", "data:image/png;base64,AAAA"),
            entry("b", "blob:abc"),
            entry("c", ""),
            entry("d", "https://x/y"),
        ];
        slots
            .inner
            .set_slot(GALLERY_KEY, &serde_json::to_string(&stored).unwrap())
            .unwrap();

        let report = migrate_gallery_storage(&slots, GALLERY_KEY);

        assert_eq!(
            report,
            MigrationReport {
                before: 4,
                after: 2,
                rewritten: true
            }
        );
        assert_eq!(report.removed(), 2);
        assert_eq!(slots.writes.load(Ordering::SeqCst), 1);

        let kept: Vec<Value> =
            serde_json::from_str(&slots.get_slot(GALLERY_KEY).unwrap().unwrap()).unwrap();
        let ids: Vec<&str> = kept.iter().map(|v| v["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["a", "d"]);
    }

    #[test]
    fn test_no_write_when_everything_is_valid() {
        let slots = CountingSlots::default();
        let stored = vec![entry("a", "file:///a.jpg"), entry("b", "http://x/y")];
        slots
            .inner
            .set_slot(GALLERY_KEY, &serde_json::to_string(&stored).unwrap())
            .unwrap();

        let report = migrate_gallery_storage(&slots, GALLERY_KEY);
        assert!(!report.rewritten);
        assert_eq!(report.before, 2);
        assert_eq!(slots.writes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_missing_uri_and_unknown_scheme_are_dropped() {
        let slots = MemorySlots::new();
        slots
            .set_slot(
                GALLERY_KEY,
                r#"[{"id":"a","caption":"c"},{"id":"b","uri":"content://x"},{"id":"c","uri":"file:///ok.jpg","displayUri":"blob:z"}]"#,
            )
            .unwrap();

        let report = migrate_gallery_storage(&slots, GALLERY_KEY);
        assert_eq!(report.after, 1);

        // unknown fields on kept entries survive
        let raw = slots.get_slot(GALLERY_KEY).unwrap().unwrap();
        assert!(raw.contains("displayUri"));
    }

    #[test]
    fn test_absent_slot_is_noop() {
        let slots = CountingSlots::default();
        let report = migrate_gallery_storage(&slots, GALLERY_KEY);
        assert_eq!(report, MigrationReport::default());
        assert_eq!(slots.writes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_failures_are_swallowed() {
        let report = migrate_gallery_storage(&BrokenSlots, GALLERY_KEY);
        assert!(!report.rewritten);

        let slots = MemorySlots::new();
        slots.set_slot(GALLERY_KEY, "not json").unwrap();
        let report = migrate_gallery_storage(&slots, GALLERY_KEY);
        assert!(!report.rewritten);
        assert_eq!(slots.get_slot(GALLERY_KEY).unwrap().as_deref(), Some("not json"));

        clear_broken_images(&BrokenSlots, GALLERY_KEY);
    }

    #[test]
    fn test_clear_broken_images_removes_slot() {
        let slots = MemorySlots::new();
        slots.set_slot(GALLERY_KEY, "[]").unwrap();
        clear_broken_images(&slots, GALLERY_KEY);
        assert_eq!(slots.get_slot(GALLERY_KEY).unwrap(), None);
    }

    #[test]
    fn test_store_migrate_uses_its_slot() {
        let slots = Arc::new(MemorySlots::new());
        let store = GalleryStore::new(slots.clone(), Arc::new(BlobRegistry::new()));
        slots
            .set_slot(
                GALLERY_KEY,
                &serde_json::to_string(&vec![entry("a", "blob:1"), entry("b", "https://x")])
                    .unwrap(),
            )
            .unwrap();

        let report = store.migrate();
        assert!(report.rewritten);
        let items = store.list_all();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "b");
    }
}
