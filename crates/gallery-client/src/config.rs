//! Client configuration loaded from environment variables.
//!
//! All settings have sensible defaults so the client can start with zero
//! configuration for local development (mock sign-in, platform data dir).

use std::path::PathBuf;
use std::time::Duration;

use gallery_shared::constants::{ERROR_DISMISS_SECS, MOCK_SIGN_IN_DELAY_MS, MOCK_SIGN_OUT_DELAY_MS};

use crate::auth::AuthMode;

/// OpenID Connect userinfo endpoint used when none is configured.
pub const DEFAULT_USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Path of the SQLite database holding the gallery.
    /// Env: `GALLERY_DB_PATH`
    /// Default: `None` (platform data directory).
    pub db_path: Option<PathBuf>,

    /// Which identity provider to use.
    /// Env: `GALLERY_AUTH_MODE` (`mock` / `remote`)
    /// Default: `mock`
    pub auth_mode: AuthMode,

    /// Userinfo endpoint of the remote identity provider.
    /// Env: `GALLERY_USERINFO_URL`
    pub userinfo_url: String,

    /// Bearer access token presented to the remote provider.
    /// Env: `GALLERY_ACCESS_TOKEN`
    /// Default: empty (remote sign-in is rejected).
    pub access_token: Option<String>,

    /// Simulated sign-in latency of the mock provider.
    /// Env: `GALLERY_MOCK_DELAY_MS`
    /// Default: `1000`
    pub mock_sign_in_delay: Duration,

    /// Simulated sign-out latency of the mock provider.
    pub mock_sign_out_delay: Duration,

    /// How long gallery errors stay published before clearing themselves.
    /// Env: `GALLERY_ERROR_DISMISS_SECS` (`0` disables auto-dismiss)
    /// Default: `5`
    pub error_dismiss_after: Option<Duration>,

    /// Run the legacy-entry cleanup pass when the store is opened.
    /// Env: `GALLERY_MIGRATE_ON_START` (true/false)
    /// Default: `true`
    pub migrate_on_start: bool,

    /// Fixed id for the mock provider's demo user, so items survive across
    /// runs of the same database.
    /// Env: `GALLERY_USER_ID`
    /// Default: `None` (a fresh id per sign-in).
    pub mock_user_id: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            auth_mode: AuthMode::Mock,
            userinfo_url: DEFAULT_USERINFO_URL.to_string(),
            access_token: None,
            mock_sign_in_delay: Duration::from_millis(MOCK_SIGN_IN_DELAY_MS),
            mock_sign_out_delay: Duration::from_millis(MOCK_SIGN_OUT_DELAY_MS),
            error_dismiss_after: Some(Duration::from_secs(ERROR_DISMISS_SECS)),
            migrate_on_start: true,
            mock_user_id: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("GALLERY_DB_PATH") {
            if !path.trim().is_empty() {
                config.db_path = Some(PathBuf::from(path));
            }
        }

        if let Some(mode) = lookup("GALLERY_AUTH_MODE") {
            match mode.parse::<AuthMode>() {
                Ok(parsed) => config.auth_mode = parsed,
                Err(e) => {
                    tracing::warn!(value = %mode, error = %e, "Invalid GALLERY_AUTH_MODE, using default");
                }
            }
        }

        if let Some(url) = lookup("GALLERY_USERINFO_URL") {
            config.userinfo_url = url;
        }

        if let Some(token) = lookup("GALLERY_ACCESS_TOKEN") {
            if !token.is_empty() {
                config.access_token = Some(token);
            }
        }

        if let Some(val) = lookup("GALLERY_MOCK_DELAY_MS") {
            match val.parse::<u64>() {
                Ok(ms) => config.mock_sign_in_delay = Duration::from_millis(ms),
                Err(_) => tracing::warn!(value = %val, "Invalid GALLERY_MOCK_DELAY_MS, using default"),
            }
        }

        if let Some(val) = lookup("GALLERY_ERROR_DISMISS_SECS") {
            match val.parse::<u64>() {
                Ok(0) => config.error_dismiss_after = None,
                Ok(secs) => config.error_dismiss_after = Some(Duration::from_secs(secs)),
                Err(_) => {
                    tracing::warn!(value = %val, "Invalid GALLERY_ERROR_DISMISS_SECS, using default")
                }
            }
        }

        if let Some(val) = lookup("GALLERY_MIGRATE_ON_START") {
            match parse_flag(&val) {
                Some(flag) => config.migrate_on_start = flag,
                None => {
                    tracing::warn!(value = %val, "Invalid GALLERY_MIGRATE_ON_START, using default")
                }
            }
        }

        if let Some(id) = lookup("GALLERY_USER_ID") {
            if !id.trim().is_empty() {
                config.mock_user_id = Some(id.trim().to_string());
            }
        }

        config
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> ClientConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.auth_mode, AuthMode::Mock);
        assert_eq!(config.mock_sign_in_delay, Duration::from_millis(1000));
        assert_eq!(config.error_dismiss_after, Some(Duration::from_secs(5)));
        assert!(config.migrate_on_start);
        assert!(config.db_path.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("GALLERY_DB_PATH", "/tmp/g.db"),
            ("GALLERY_AUTH_MODE", "remote"),
            ("GALLERY_ACCESS_TOKEN", "tok"),
            ("GALLERY_MOCK_DELAY_MS", "0"),
            ("GALLERY_ERROR_DISMISS_SECS", "0"),
            ("GALLERY_MIGRATE_ON_START", "false"),
        ]);
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/g.db")));
        assert_eq!(config.auth_mode, AuthMode::Remote);
        assert_eq!(config.access_token.as_deref(), Some("tok"));
        assert_eq!(config.mock_sign_in_delay, Duration::ZERO);
        assert_eq!(config.error_dismiss_after, None);
        assert!(!config.migrate_on_start);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("GALLERY_AUTH_MODE", "carrier-pigeon"),
            ("GALLERY_MOCK_DELAY_MS", "soon"),
            ("GALLERY_ACCESS_TOKEN", ""),
        ]);
        assert_eq!(config.auth_mode, AuthMode::Mock);
        assert_eq!(config.mock_sign_in_delay, Duration::from_millis(1000));
        assert!(config.access_token.is_none());
    }

    #[test]
    fn test_migrate_flag_parsing() {
        assert!(!config_from(&[("GALLERY_MIGRATE_ON_START", "off")]).migrate_on_start);
        assert!(!config_from(&[("GALLERY_MIGRATE_ON_START", " No ")]).migrate_on_start);
        assert!(config_from(&[("GALLERY_MIGRATE_ON_START", "yes")]).migrate_on_start);
        // unrecognised values keep the default instead of silently enabling
        assert!(config_from(&[("GALLERY_MIGRATE_ON_START", "nope")]).migrate_on_start);

        assert_eq!(parse_flag("maybe"), None);
        assert_eq!(parse_flag("0"), Some(false));
    }

    #[test]
    fn test_fixed_user_id() {
        assert_eq!(
            config_from(&[("GALLERY_USER_ID", " alice ")]).mock_user_id.as_deref(),
            Some("alice")
        );
        assert!(config_from(&[("GALLERY_USER_ID", "")]).mock_user_id.is_none());
    }
}
