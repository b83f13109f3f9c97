//! Identity provider for environments without provider access.
//!
//! Sign-in always succeeds after a fixed delay and fabricates a fresh demo
//! user each time.

use std::time::Duration;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use gallery_shared::{now_millis, AuthError, User};

use crate::auth::IdentityProvider;
use crate::events::{SessionHandler, SessionHub, Subscription};

const DEMO_NAME: &str = "Demo User";
const DEMO_EMAIL: &str = "demo@example.com";
const DEMO_AVATAR: &str =
    "https://images.unsplash.com/photo-1535713875002-d1d0cf377fde?w=150&h=150&fit=crop&crop=face";

pub struct MockIdentityProvider {
    hub: SessionHub,
    sign_in_delay: Duration,
    sign_out_delay: Duration,
    fixed_id: Option<String>,
}

impl MockIdentityProvider {
    pub fn new(sign_in_delay: Duration, sign_out_delay: Duration) -> Self {
        Self {
            hub: SessionHub::new(),
            sign_in_delay,
            sign_out_delay,
            fixed_id: None,
        }
    }

    /// Sign every session in as the same demo user `id`.
    pub fn with_user_id(mut self, id: impl Into<String>) -> Self {
        self.fixed_id = Some(id.into());
        self
    }

    /// A provider that answers immediately.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    fn fabricate_user(&self) -> User {
        let id = match &self.fixed_id {
            Some(id) => id.clone(),
            None => {
                // the uuid fragment keeps ids distinct within one millisecond
                let nonce = Uuid::new_v4().simple().to_string();
                format!("mock-user-{}-{}", now_millis(), &nonce[..8])
            }
        };
        User {
            id,
            name: DEMO_NAME.to_string(),
            email: DEMO_EMAIL.to_string(),
            avatar_url: Some(DEMO_AVATAR.to_string()),
        }
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn sign_in(&self) -> Result<User, AuthError> {
        if !self.sign_in_delay.is_zero() {
            tokio::time::sleep(self.sign_in_delay).await;
        }

        let user = self.fabricate_user();
        info!(user_id = %user.id, "Mock sign-in");
        self.hub.publish(Some(user.clone()));
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        if !self.sign_out_delay.is_zero() {
            tokio::time::sleep(self.sign_out_delay).await;
        }

        info!("Mock sign-out");
        self.hub.publish(None);
        Ok(())
    }

    fn subscribe(&self, handler: SessionHandler) -> Subscription {
        self.hub.subscribe(handler)
    }

    fn current_user(&self) -> Option<User> {
        self.hub.current()
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
