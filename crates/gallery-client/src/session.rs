//! Authentication state as seen by the presentation layer.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::error;

use gallery_shared::{AuthError, User};

use crate::auth::IdentityProvider;
use crate::events::Subscription;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            is_loading: true,
            error: None,
        }
    }
}

/// Wraps an [`IdentityProvider`] and publishes an [`AuthState`].
///
/// The state follows the provider's session events for as long as the
/// session lives.
pub struct Session {
    provider: Arc<dyn IdentityProvider>,
    state: Arc<watch::Sender<AuthState>>,
    _subscription: Subscription,
}

impl Session {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        let (tx, _rx) = watch::channel(AuthState::default());
        let state = Arc::new(tx);

        let sink = state.clone();
        let subscription = provider.subscribe(Box::new(move |user| {
            let user = user.cloned();
            sink.send_modify(|s| {
                s.user = user;
                s.is_loading = false;
                s.error = None;
            });
        }));

        Self {
            provider,
            state,
            _subscription: subscription,
        }
    }

    pub fn provider(&self) -> &Arc<dyn IdentityProvider> {
        &self.provider
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    pub async fn sign_in(&self) -> Result<User, AuthError> {
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });

        match self.provider.sign_in().await {
            Ok(user) => {
                let signed_in = user.clone();
                self.state.send_modify(|s| {
                    s.user = Some(signed_in);
                    s.is_loading = false;
                });
                Ok(user)
            }
            Err(e) => {
                error!(error = %e, "Sign in error");
                self.state.send_modify(|s| {
                    s.is_loading = false;
                    s.error = Some(e.to_string());
                });
                Err(e)
            }
        }
    }

    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.state.send_modify(|s| s.is_loading = true);

        match self.provider.sign_out().await {
            Ok(()) => {
                self.state.send_modify(|s| {
                    s.user = None;
                    s.is_loading = false;
                    s.error = None;
                });
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Sign out error");
                self.state.send_modify(|s| {
                    s.is_loading = false;
                    s.error = Some(e.to_string());
                });
                Err(e)
            }
        }
    }

    pub fn clear_error(&self) {
        self.state.send_modify(|s| s.error = None);
    }
}
