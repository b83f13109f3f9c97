use serde::{Deserialize, Serialize};

/// Identity of the signed-in user, as handed out by an identity provider.
///
/// Lives only for the duration of a session and is never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// A single persisted gallery entry.
///
/// The JSON layout (camelCase keys) is the on-disk format of the gallery
/// slot, so field names must not change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItem {
    /// Store-generated unique identifier.
    pub id: String,
    /// Reference to the image bytes. Never an ephemeral `blob:` handle once
    /// persisted.
    pub uri: String,
    pub caption: String,
    /// Creation time in epoch milliseconds.
    pub created_at: i64,
    /// `User::id` of the owner.
    pub created_by: String,
}

impl GalleryItem {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.created_by == user_id
    }
}

/// Everything needed to create a [`GalleryItem`] except its id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewGalleryItem {
    pub uri: String,
    pub caption: String,
    pub created_at: i64,
    pub created_by: String,
}

impl NewGalleryItem {
    pub fn into_item(self, id: String) -> GalleryItem {
        GalleryItem {
            id,
            uri: self.uri,
            caption: self.caption,
            created_at: self.created_at,
            created_by: self.created_by,
        }
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
