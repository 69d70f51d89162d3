//! Client configuration for the preferences backend.
//!
//! Hosts build a [`ClientConfig`] from their own settings, optionally
//! overlaid with `PREFSYNC_*` environment variables.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::util::{is_http_url, normalize_text_option};

pub const API_BASE_URL_ENV: &str = "PREFSYNC_API_BASE_URL";
pub const USER_ID_ENV: &str = "PREFSYNC_USER_ID";
pub const TIMEOUT_ENV: &str = "PREFSYNC_TIMEOUT_SECS";

/// Connection settings for the preferences API.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Base URL of the resume backend, e.g. `https://resume.example.com`
    pub api_base_url: String,
    /// User id sent with writes and used to scope list/search
    #[serde(default)]
    pub user_id: Option<String>,
    /// Per-request timeout; unset means the transport default
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl ClientConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            ..Self::default()
        }
    }

    /// Build a config purely from `PREFSYNC_*` environment variables.
    ///
    /// Returns `Ok(None)` when no base URL is set.
    pub fn from_env() -> Result<Option<Self>> {
        let Some(api_base_url) = env_value(API_BASE_URL_ENV) else {
            return Ok(None);
        };
        let mut config = Self::new(api_base_url);
        config.apply_env_overrides()?;
        config.validate().map(Some)
    }

    /// Overlay any `PREFSYNC_*` variables that are set.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(url) = env_value(API_BASE_URL_ENV) {
            self.api_base_url = url;
        }
        if let Some(user_id) = env_value(USER_ID_ENV) {
            self.user_id = Some(user_id);
        }
        if let Some(raw) = env_value(TIMEOUT_ENV) {
            let secs = raw.parse::<u64>().map_err(|error| {
                Error::InvalidConfiguration(format!("{TIMEOUT_ENV} must be a whole number: {error}"))
            })?;
            self.request_timeout_secs = Some(secs);
        }
        Ok(())
    }

    /// Normalize fields and reject an unusable base URL.
    pub fn validate(mut self) -> Result<Self> {
        let url = normalize_text_option(Some(self.api_base_url)).ok_or_else(|| {
            Error::InvalidConfiguration("api_base_url must not be empty".to_string())
        })?;
        if !is_http_url(&url) {
            return Err(Error::InvalidConfiguration(
                "api_base_url must include http:// or https://".to_string(),
            ));
        }
        self.api_base_url = url.trim_end_matches('/').to_string();
        self.user_id = normalize_text_option(self.user_id);
        if self.request_timeout_secs == Some(0) {
            self.request_timeout_secs = None;
        }
        Ok(self)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

fn env_value(name: &str) -> Option<String> {
    normalize_text_option(std::env::var(name).ok())
}
