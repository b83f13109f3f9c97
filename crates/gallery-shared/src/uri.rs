//! Classification of image references by their scheme prefix.
//!
//! The gallery only ever looks at the prefix of a URI: there is no URL
//! parsing, and legacy entries are recognised purely by shape.

use serde::{Deserialize, Serialize};

use crate::constants::{BLOB_SCHEME, DATA_SCHEME};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UriKind {
    /// `data:` - embedded bytes, permanently valid.
    Data,
    /// `file:` - local file on the device.
    File,
    Http,
    Https,
    /// `blob:` - in-process handle that dies with the session.
    Blob,
    Empty,
    Other,
}

impl UriKind {
    pub fn of(uri: &str) -> Self {
        if uri.is_empty() {
            Self::Empty
        } else if uri.starts_with(BLOB_SCHEME) {
            Self::Blob
        } else if uri.starts_with(DATA_SCHEME) {
            Self::Data
        } else if uri.starts_with("file:") {
            Self::File
        } else if uri.starts_with("https://") {
            Self::Https
        } else if uri.starts_with("http://") {
            Self::Http
        } else {
            Self::Other
        }
    }

    /// Whether a reference of this kind stays valid across sessions and may
    /// therefore be kept in the persisted gallery.
    pub fn is_durable(self) -> bool {
        matches!(self, Self::Data | Self::File | Self::Http | Self::Https)
    }

    pub fn is_ephemeral(self) -> bool {
        self == Self::Blob
    }
}

pub fn is_blob_uri(uri: &str) -> bool {
    UriKind::of(uri).is_ephemeral()
}
