//! # gallery-shared
//!
//! Types shared by the gallery store and the client layer: the persisted
//! item model, the signed-in user, URI classification and the
//! authentication error taxonomy.

pub mod constants;
pub mod error;
pub mod types;
pub mod uri;

pub use error::AuthError;
pub use types::{now_millis, GalleryItem, NewGalleryItem, User};
pub use uri::UriKind;
