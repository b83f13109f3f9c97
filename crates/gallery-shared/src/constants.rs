/// Application name
pub const APP_NAME: &str = "Gallery";

/// Name of the key-value slot holding the serialized gallery
pub const GALLERY_KEY: &str = "@gallery_items";

/// Caption used when the user leaves the caption blank
pub const DEFAULT_CAPTION: &str = "New Image";

/// Prefix of every generated gallery item id
pub const ITEM_ID_PREFIX: &str = "item";

/// Length of the random base36 suffix of a gallery item id
pub const ITEM_ID_SUFFIX_LEN: usize = 9;

/// Scheme prefix of ephemeral in-process image handles
pub const BLOB_SCHEME: &str = "blob:";

/// Scheme prefix of self-contained embedded images
pub const DATA_SCHEME: &str = "data:";

/// Simulated latency of the mock identity provider's sign-in, in milliseconds
pub const MOCK_SIGN_IN_DELAY_MS: u64 = 1000;

/// Simulated latency of the mock identity provider's sign-out, in milliseconds
pub const MOCK_SIGN_OUT_DELAY_MS: u64 = 500;

/// How long a transient user-facing error stays visible, in seconds
pub const ERROR_DISMISS_SECS: u64 = 5;

/// Delay before the mock voice recognizer produces its transcript, in milliseconds
pub const MOCK_VOICE_DELAY_MS: u64 = 3000;
