//! Identity provider capability.
//!
//! The rest of the client depends only on [`IdentityProvider`].  Which
//! implementation backs it is decided once, from [`ClientConfig`], by
//! [`build_provider`].

pub mod mock;
pub mod remote;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;

use gallery_shared::{AuthError, User};

use crate::config::ClientConfig;
use crate::error::Result;
use crate::events::{SessionHandler, Subscription};

pub use mock::MockIdentityProvider;
pub use remote::RemoteIdentityProvider;

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Establish a session. No retries: the first failure is returned.
    async fn sign_in(&self) -> std::result::Result<User, AuthError>;

    /// Tear down the current session.
    async fn sign_out(&self) -> std::result::Result<(), AuthError>;

    /// Be told about every session change; see [`crate::events::SessionHub`].
    fn subscribe(&self, handler: SessionHandler) -> Subscription;

    fn current_user(&self) -> Option<User>;

    /// Short label for logs.
    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Fabricated users, no network.
    Mock,
    /// OpenID-style userinfo exchange over HTTPS.
    Remote,
}

impl FromStr for AuthMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(Self::Mock),
            "remote" => Ok(Self::Remote),
            other => Err(format!("unknown auth mode '{other}', expected mock or remote")),
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mock => write!(f, "mock"),
            Self::Remote => write!(f, "remote"),
        }
    }
}

/// Build the identity provider selected by `config`.
pub fn build_provider(config: &ClientConfig) -> Result<Arc<dyn IdentityProvider>> {
    let provider: Arc<dyn IdentityProvider> = match config.auth_mode {
        AuthMode::Mock => {
            let mock = MockIdentityProvider::new(config.mock_sign_in_delay, config.mock_sign_out_delay);
            match &config.mock_user_id {
                Some(id) => Arc::new(mock.with_user_id(id.clone())),
                None => Arc::new(mock),
            }
        }
        AuthMode::Remote => Arc::new(RemoteIdentityProvider::new(
            config.userinfo_url.clone(),
            config.access_token.clone(),
        )?),
    };

    tracing::info!(provider = provider.name(), "Identity provider selected");
    Ok(provider)
}
