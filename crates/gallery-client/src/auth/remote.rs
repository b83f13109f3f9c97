//! Identity provider backed by an OpenID Connect userinfo endpoint.
//!
//! The OAuth dance itself (consent screen, code exchange) happens outside
//! the client; this provider is handed the resulting access token and trades
//! it for the user's profile.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{error, info};

use gallery_shared::{AuthError, User};

use crate::auth::IdentityProvider;
use crate::error::{ClientError, Result};
use crate::events::{SessionHandler, SessionHub, Subscription};

const UNKNOWN_NAME: &str = "Unknown User";

/// Subset of the standard OpenID userinfo claims.
#[derive(Debug, Clone, Deserialize)]
pub struct UserInfo {
    pub sub: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

/// Map provider claims onto a [`User`], treating empty strings as absent.
pub fn map_user_info(info: UserInfo) -> std::result::Result<User, AuthError> {
    if info.sub.trim().is_empty() {
        return Err(AuthError::Provider(
            "userinfo response without subject".to_string(),
        ));
    }

    let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

    Ok(User {
        id: info.sub,
        name: non_empty(info.name).unwrap_or_else(|| UNKNOWN_NAME.to_string()),
        email: non_empty(info.email).unwrap_or_default(),
        avatar_url: non_empty(info.picture),
    })
}

pub struct RemoteIdentityProvider {
    http: reqwest::Client,
    userinfo_url: String,
    access_token: Option<String>,
    hub: SessionHub,
}

impl RemoteIdentityProvider {
    pub fn new(userinfo_url: String, access_token: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("gallery-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self::with_client(http, userinfo_url, access_token))
    }

    /// Use a preconfigured HTTP client (proxies, TLS roots, timeouts).
    pub fn with_client(
        http: reqwest::Client,
        userinfo_url: String,
        access_token: Option<String>,
    ) -> Self {
        Self {
            http,
            userinfo_url,
            access_token,
            hub: SessionHub::new(),
        }
    }

    async fn fetch_user(&self) -> std::result::Result<User, AuthError> {
        let token = self
            .access_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::Rejected("no access token configured".to_string()))?;

        let resp = self
            .http
            .get(&self.userinfo_url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::Provider(format!("Could not reach identity provider: {e}")))?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AuthError::Rejected(format!("identity provider answered {status}")));
        }
        if !status.is_success() {
            return Err(AuthError::Provider(format!("identity provider answered {status}")));
        }

        let info: UserInfo = resp
            .json()
            .await
            .map_err(|e| AuthError::Provider(format!("Invalid userinfo response: {e}")))?;

        map_user_info(info)
    }
}

#[async_trait]
impl IdentityProvider for RemoteIdentityProvider {
    async fn sign_in(&self) -> std::result::Result<User, AuthError> {
        match self.fetch_user().await {
            Ok(user) => {
                info!(user_id = %user.id, "Signed in with remote provider");
                self.hub.publish(Some(user.clone()));
                Ok(user)
            }
            Err(e) => {
                error!(error = %e, "Error signing in");
                Err(e)
            }
        }
    }

    async fn sign_out(&self) -> std::result::Result<(), AuthError> {
        self.hub.publish(None);
        info!("Signed out");
        Ok(())
    }

    fn subscribe(&self, handler: SessionHandler) -> Subscription {
        self.hub.subscribe(handler)
    }

    fn current_user(&self) -> Option<User> {
        self.hub.current()
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}
