// ABOUTME: Client configuration loaded from TOML with environment overrides
// Resolves endpoint templates and validates polling and display settings

use directories::ProjectDirs;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::AlertError;

/// Environment variable overriding [`AlertConfig::base_url`].
pub const ENV_BASE_URL: &str = "MARKET_ALERTS_BASE_URL";
/// Environment variable overriding [`AlertConfig::user_id`].
pub const ENV_USER_ID: &str = "MARKET_ALERTS_USER_ID";
/// Environment variable overriding [`AlertConfig::session_cookie`].
pub const ENV_SESSION: &str = "MARKET_ALERTS_SESSION";

const USER_ID_PLACEHOLDER: &str = "{user_id}";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Backend origin, e.g. `https://market.example.com`
    pub base_url: String,
    /// Polling is disabled when no user is set
    pub user_id: Option<String>,
    /// Raw `Cookie` header value for the authenticated session
    pub session_cookie: Option<String>,
    pub unread_count_path: String,
    pub new_notifications_path: String,
    pub poll_interval_ms: u64,
    pub request_timeout_ms: Option<u64>,
    pub sound_cooldown_ms: u64,
    pub max_visible: usize,
    pub sound_enabled: bool,
    pub backoff: Option<BackoffConfig>,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            user_id: None,
            session_cookie: None,
            unread_count_path: "/api/notifications/{user_id}/unread-count".to_string(),
            new_notifications_path: "/api/notifications/{user_id}/new".to_string(),
            poll_interval_ms: 5000,
            request_timeout_ms: None,
            sound_cooldown_ms: 3000,
            max_visible: 3,
            sound_enabled: true,
            backoff: None,
        }
    }
}

/// Capped exponential backoff applied after repeated poll failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffConfig {
    /// Consecutive failures tolerated before backing off
    pub threshold: u32,
    pub base_ms: u64,
    pub max_ms: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            threshold: 3,
            base_ms: 5000,
            max_ms: 60_000,
        }
    }
}

impl AlertConfig {
    /// Platform config file location, e.g. `~/.config/market-alerts/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "market", "market-alerts")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load from `path`, or from [`Self::default_path`] when `None`.
    ///
    /// A missing file yields the defaults; an explicit path that does not
    /// exist is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, AlertError> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::default_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            if explicit {
                return Err(AlertError::Config(format!(
                    "config file {} does not exist",
                    path.display()
                )));
            }
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config = Self::from_toml(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, AlertError> {
        Ok(toml::from_str(content)?)
    }

    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Override fields from a variable lookup; empty values are ignored.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(user) = get(ENV_USER_ID) {
            self.user_id = Some(user);
        }
        if let Some(cookie) = get(ENV_SESSION) {
            self.session_cookie = Some(cookie);
        }
    }

    pub fn validate(&self) -> Result<(), AlertError> {
        if self.poll_interval_ms == 0 {
            return Err(AlertError::Config("poll_interval_ms must be greater than zero".into()));
        }
        if self.max_visible == 0 {
            return Err(AlertError::Config("max_visible must be greater than zero".into()));
        }
        if self.request_timeout_ms == Some(0) {
            return Err(AlertError::Config("request_timeout_ms must be greater than zero".into()));
        }
        if let Some(backoff) = &self.backoff {
            if backoff.base_ms == 0 || backoff.max_ms < backoff.base_ms {
                return Err(AlertError::Config(
                    "backoff requires 0 < base_ms <= max_ms".into(),
                ));
            }
        }
        Url::parse(&self.base_url)
            .map_err(|e| AlertError::Config(format!("invalid base_url {:?}: {}", self.base_url, e)))?;
        Ok(())
    }

    /// Absolute URL for an endpoint template such as `/api/{user_id}/new`.
    ///
    /// The template is appended to any path already in `base_url`, so
    /// `https://host/backend` keeps its `/backend` prefix. The user id is
    /// percent-encoded as a single path segment.
    pub fn endpoint_url(&self, template: &str, user_id: &str) -> Result<Url, AlertError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| AlertError::Config(format!("invalid base_url {:?}: {}", self.base_url, e)))?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                AlertError::Config(format!("base_url {:?} cannot have a path", self.base_url))
            })?;
            segments.pop_if_empty();
            for segment in template.split('/').filter(|s| !s.is_empty()) {
                if segment == USER_ID_PLACEHOLDER {
                    segments.push(user_id);
                } else {
                    segments.push(segment);
                }
            }
        }
        Ok(url)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn sound_cooldown(&self) -> Duration {
        Duration::from_millis(self.sound_cooldown_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_observed_behaviour() {
        let config = AlertConfig::default();
        assert_eq!(config.poll_interval(), Duration::from_secs(5));
        assert_eq!(config.sound_cooldown(), Duration::from_secs(3));
        assert_eq!(config.max_visible, 3);
        assert!(config.backoff.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = AlertConfig::from_toml(
            r#"
            base_url = "https://market.example.com"
            user_id = "u-42"
            max_visible = 5

            [backoff]
            max_ms = 30000
            "#,
        )
        .unwrap();

        assert_eq!(config.user_id.as_deref(), Some("u-42"));
        assert_eq!(config.max_visible, 5);
        assert_eq!(config.poll_interval_ms, 5000);
        assert_eq!(
            config.backoff,
            Some(BackoffConfig { threshold: 3, base_ms: 5000, max_ms: 30_000 })
        );
    }

    #[test]
    fn env_overrides_skip_blank_values() {
        let vars: HashMap<&str, &str> = [
            (ENV_BASE_URL, "https://other.example.com"),
            (ENV_USER_ID, "  "),
            (ENV_SESSION, "connect.sid=abc"),
        ]
        .into_iter()
        .collect();

        let mut config = AlertConfig {
            user_id: Some("kept".into()),
            ..AlertConfig::default()
        };
        config.apply_env_from(|key| vars.get(key).map(|v| (*v).to_string()));

        assert_eq!(config.base_url, "https://other.example.com");
        assert_eq!(config.user_id.as_deref(), Some("kept"));
        assert_eq!(config.session_cookie.as_deref(), Some("connect.sid=abc"));
    }

    #[test]
    fn validation_rejects_bad_values() {
        let zero_interval = AlertConfig { poll_interval_ms: 0, ..AlertConfig::default() };
        assert!(zero_interval.validate().is_err());

        let zero_visible = AlertConfig { max_visible: 0, ..AlertConfig::default() };
        assert!(zero_visible.validate().is_err());

        let bad_url = AlertConfig { base_url: "not a url".into(), ..AlertConfig::default() };
        assert!(bad_url.validate().is_err());

        let bad_backoff = AlertConfig {
            backoff: Some(BackoffConfig { threshold: 3, base_ms: 10_000, max_ms: 1000 }),
            ..AlertConfig::default()
        };
        assert!(bad_backoff.validate().is_err());
    }

    #[test]
    fn endpoint_url_substitutes_user() {
        let config = AlertConfig {
            base_url: "https://market.example.com".into(),
            ..AlertConfig::default()
        };
        let url = config
            .endpoint_url(&config.new_notifications_path, "u-42")
            .unwrap();
        assert_eq!(url.as_str(), "https://market.example.com/api/notifications/u-42/new");
    }

    #[test]
    fn endpoint_url_keeps_base_path_prefix() {
        for base in ["https://market.example.com/backend", "https://market.example.com/backend/"] {
            let config = AlertConfig {
                base_url: base.into(),
                ..AlertConfig::default()
            };
            let url = config
                .endpoint_url(&config.unread_count_path, "u-42")
                .unwrap();
            assert_eq!(
                url.as_str(),
                "https://market.example.com/backend/api/notifications/u-42/unread-count"
            );
        }
    }

    #[test]
    fn endpoint_url_encodes_user_id() {
        let config = AlertConfig::default();
        let url = config
            .endpoint_url(&config.new_notifications_path, "a/b c?d")
            .unwrap();
        assert_eq!(url.path(), "/api/notifications/a%2Fb%20c%3Fd/new");
        assert!(url.query().is_none());
    }
}
