//! # gallery-client
//!
//! Everything above storage: identity providers and the session they drive,
//! the gallery view-model, simulated voice captions, configuration and
//! logging setup.  The `gallery` binary is a thin driver over [`AppState`].

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod session;
pub mod state;
pub mod viewmodel;
pub mod voice;

use tracing_subscriber::{fmt, EnvFilter};

pub use auth::{AuthMode, IdentityProvider, MockIdentityProvider, RemoteIdentityProvider};
pub use config::ClientConfig;
pub use error::ClientError;
pub use events::{SessionHub, Subscription};
pub use session::{AuthState, Session};
pub use state::AppState;
pub use viewmodel::{GalleryView, GalleryViewModel};
pub use voice::{MockVoiceRecognizer, VoiceState};

/// Install the global tracing subscriber. `RUST_LOG` overrides the default
/// filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("gallery_client=debug,gallery_store=info,warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
