//! Application state wired together at startup.
//!
//! [`AppState`] owns the storage handles and the signed-in session.  Every
//! screen-level component (gallery, voice input) is created from it.

use std::sync::Arc;

use tracing::info;

use gallery_shared::User;
use gallery_store::{BlobRegistry, Database, GalleryStore, MigrationReport};

use crate::auth;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::session::Session;
use crate::viewmodel::GalleryViewModel;
use crate::voice::MockVoiceRecognizer;

/// Central application state.
pub struct AppState {
    pub config: ClientConfig,

    /// Shared SQLite handle backing the gallery slot.
    pub database: Arc<Database>,

    /// Ephemeral image handles produced by capture/picker flows. Resolved to
    /// `data:` URIs when an item is appended.
    pub blobs: Arc<BlobRegistry>,

    pub store: GalleryStore,

    pub session: Session,

    /// Outcome of the startup cleanup pass, if it ran.
    pub migration: Option<MigrationReport>,
}

impl AppState {
    /// Open the database, optionally run the cleanup pass, and select the
    /// identity provider.
    pub fn bootstrap(config: ClientConfig) -> Result<Self> {
        let database = match &config.db_path {
            Some(path) => Database::open_at(path)?,
            None => Database::new()?,
        };
        let database = Arc::new(database);
        let blobs = Arc::new(BlobRegistry::new());
        let store = GalleryStore::new(database.clone(), blobs.clone());

        let migration = if config.migrate_on_start {
            let report = store.migrate();
            info!(
                before = report.before,
                after = report.after,
                rewritten = report.rewritten,
                "Gallery cleanup pass finished"
            );
            Some(report)
        } else {
            None
        };

        let provider = auth::build_provider(&config)?;
        let session = Session::new(provider);

        Ok(Self {
            config,
            database,
            blobs,
            store,
            session,
            migration,
        })
    }

    /// A gallery view-model scoped to `user`, or unscoped when signed out.
    pub fn gallery_for(&self, user: Option<&User>) -> GalleryViewModel {
        let user_id = user.map(|u| u.id.clone()).unwrap_or_default();
        GalleryViewModel::new(user_id, self.store.clone())
            .with_error_dismiss(self.config.error_dismiss_after)
    }

    pub fn voice(&self) -> MockVoiceRecognizer {
        MockVoiceRecognizer::default()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use gallery_shared::constants::GALLERY_KEY;
    use gallery_store::SlotStore;

    use super::*;

    fn test_config(dir: &tempfile::TempDir) -> ClientConfig {
        ClientConfig {
            db_path: Some(dir.path().join("gallery.db")),
            mock_sign_in_delay: Duration::ZERO,
            mock_sign_out_delay: Duration::ZERO,
            ..ClientConfig::default()
        }
    }

    #[tokio::test]
    async fn test_bootstrap_runs_cleanup_pass() {
        let dir = tempfile::tempdir().unwrap();
        {
            let db = Database::open_at(&dir.path().join("gallery.db")).unwrap();
            let legacy = r#"[
                {"id":"a","uri":"blob:x","caption":"","createdAt":1,"createdBy":"u"},
                {"id":"b","uri":"https://x/b.jpg","caption":"","createdAt":2,"createdBy":"u"}
            ]"#;
            db.set_slot(GALLERY_KEY, legacy).unwrap();
        }

        let state = AppState::bootstrap(test_config(&dir)).unwrap();
        let report = state.migration.unwrap();
        assert_eq!((report.before, report.after), (2, 1));
        assert!(report.rewritten);
        assert_eq!(state.store.list_all()[0].id, "b");
    }

    #[tokio::test]
    async fn test_bootstrap_can_skip_cleanup() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig {
            migrate_on_start: false,
            ..test_config(&dir)
        };

        let state = AppState::bootstrap(config).unwrap();
        assert!(state.migration.is_none());
        assert_eq!(state.session.provider().name(), "mock");
    }

    #[tokio::test]
    async fn test_gallery_is_scoped_to_signed_in_user() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::bootstrap(test_config(&dir)).unwrap();

        assert_eq!(state.gallery_for(None).user_id(), "");

        let user = state.session.sign_in().await.unwrap();
        let vm = state.gallery_for(Some(&user));
        assert_eq!(vm.user_id(), user.id);
    }
}
