//! # gallery-store
//!
//! Local persistence for the gallery.
//!
//! The whole collection lives in one named key-value slot as a JSON array
//! and every mutation rewrites that slot wholesale.  Slots are provided by a
//! [`SlotStore`]: SQLite through [`Database`] on devices, or
//! [`MemorySlots`] for tests and throwaway sessions.  [`GalleryStore`] is the
//! lifecycle authority on top of it, and [`cleanup`] holds the one-shot pass
//! that drops legacy entries with unusable image references.

pub mod cleanup;
pub mod database;
pub mod gallery;
pub mod migrations;
pub mod resolver;
pub mod slots;

mod error;

pub use cleanup::{clear_broken_images, migrate_gallery_storage, MigrationReport};
pub use database::Database;
pub use error::StoreError;
pub use gallery::GalleryStore;
pub use gallery_shared::types::{GalleryItem, NewGalleryItem};
pub use resolver::{BlobRegistry, HandleResolver};
pub use slots::{MemorySlots, SlotStore};
