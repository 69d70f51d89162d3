//! Named backend profiles stored in `<config_dir>/prefsync/cli-config.json`.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use prefsync_core::config::ClientConfig;
use prefsync_core::util::normalize_text_option;
use serde::{Deserialize, Serialize};

use crate::error::CliError;

const APP_DIR_NAME: &str = "prefsync";
const PROFILES_FILE_NAME: &str = "cli-config.json";
const FALLBACK_PROFILE: &str = "default";
pub const PROFILE_ENV: &str = "PREFSYNC_PROFILE";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliProfilesConfig {
    #[serde(default = "current_version")]
    pub version: u32,
    #[serde(default)]
    pub active_profile: Option<String>,
    #[serde(default)]
    pub profiles: BTreeMap<String, CliProfile>,
}

/// Stored client settings; environment variables still override them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliProfile {
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

const fn current_version() -> u32 {
    1
}

fn profiles_path() -> Result<PathBuf, CliError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME).join(PROFILES_FILE_NAME))
        .ok_or_else(|| CliError::Config("cannot locate the user config directory".to_string()))
}

/// Directory holding a profile's local queue when `--store-dir` is not given.
pub fn default_store_dir(profile_name: &str) -> Result<PathBuf, CliError> {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME).join(profile_name))
        .ok_or_else(|| CliError::Config("cannot locate the user data directory".to_string()))
}

fn file_error(action: &str, path: &Path, error: &dyn Display) -> CliError {
    CliError::Config(format!("failed to {action} {}: {error}", path.display()))
}

impl CliProfilesConfig {
    pub fn load() -> Result<Self, CliError> {
        Self::read(&profiles_path()?)
    }

    /// Read the profiles file at `path`; a missing file is an empty config.
    pub fn read(path: &Path) -> Result<Self, CliError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(error) => return Err(file_error("read", path, &error)),
        };
        let config = serde_json::from_str::<Self>(&raw)
            .map_err(|error| file_error("parse", path, &error))?;
        Ok(config.normalized())
    }

    /// Write to the default location and return the path written.
    pub fn save(&self) -> Result<PathBuf, CliError> {
        let path = profiles_path()?;
        self.write(&path)?;
        Ok(path)
    }

    pub fn write(&self, path: &Path) -> Result<(), CliError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|error| file_error("create", dir, &error))?;
        }
        let body = serde_json::to_string_pretty(&self.clone().normalized())?;
        std::fs::write(path, body).map_err(|error| file_error("write", path, &error))
    }

    /// First non-blank of `explicit`, `$PREFSYNC_PROFILE` and the active
    /// profile, else `default`.
    pub fn resolve_profile_name(&self, explicit: Option<&str>) -> String {
        let from_env = std::env::var(PROFILE_ENV).ok();
        let name = [explicit, from_env.as_deref(), self.active_profile.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|name| !name.is_empty())
            .unwrap_or(FALLBACK_PROFILE)
            .to_string();
        name
    }

    pub fn profile(&self, name: &str) -> Option<&CliProfile> {
        self.profiles.get(name)
    }

    pub fn profile_entry(&mut self, name: &str) -> &mut CliProfile {
        self.profiles.entry(name.to_string()).or_default()
    }

    fn normalized(mut self) -> Self {
        self.active_profile = normalize_text_option(self.active_profile);
        self.profiles.values_mut().for_each(CliProfile::normalize);
        self
    }
}

impl CliProfile {
    /// Client settings from this profile, `None` without a base URL.
    pub fn client_config(&self) -> Option<ClientConfig> {
        Some(ClientConfig {
            api_base_url: normalize_text_option(self.api_base_url.clone())?,
            user_id: normalize_text_option(self.user_id.clone()),
            request_timeout_secs: self.request_timeout_secs.filter(|secs| *secs > 0),
        })
    }

    fn normalize(&mut self) {
        self.api_base_url = normalize_text_option(self.api_base_url.take())
            .map(|url| url.trim_end_matches('/').to_string());
        self.user_id = normalize_text_option(self.user_id.take());
        self.request_timeout_secs = self.request_timeout_secs.filter(|secs| *secs > 0);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn written_profiles_are_normalized_on_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(PROFILES_FILE_NAME);
        let mut config = CliProfilesConfig {
            version: 1,
            active_profile: Some(" work ".to_string()),
            ..CliProfilesConfig::default()
        };
        *config.profile_entry("work") = CliProfile {
            api_base_url: Some(" https://resume.example.com/ ".to_string()),
            user_id: Some(" alice ".to_string()),
            request_timeout_secs: Some(0),
        };

        config.write(&path).unwrap();
        let loaded = CliProfilesConfig::read(&path).unwrap();

        assert_eq!(loaded.active_profile.as_deref(), Some("work"));
        assert_eq!(
            loaded.profile("work"),
            Some(&CliProfile {
                api_base_url: Some("https://resume.example.com".to_string()),
                user_id: Some("alice".to_string()),
                request_timeout_secs: None,
            })
        );
    }

    #[test]
    fn missing_file_reads_as_empty_config() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = CliProfilesConfig::read(&dir.path().join("absent.json")).unwrap();
        assert_eq!(loaded, CliProfilesConfig::default());
    }

    #[test]
    fn unparseable_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PROFILES_FILE_NAME);
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            CliProfilesConfig::read(&path),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn profile_name_prefers_explicit_then_active() {
        let config = CliProfilesConfig {
            active_profile: Some("work".to_string()),
            ..CliProfilesConfig::default()
        };
        assert_eq!(config.resolve_profile_name(Some(" staging ")), "staging");
        if std::env::var(PROFILE_ENV).is_err() {
            assert_eq!(config.resolve_profile_name(Some("  ")), "work");
            assert_eq!(
                CliProfilesConfig::default().resolve_profile_name(None),
                "default"
            );
        }
    }

    #[test]
    fn profile_without_url_has_no_client_config() {
        let profile = CliProfile {
            user_id: Some("alice".to_string()),
            ..CliProfile::default()
        };
        assert_eq!(profile.client_config(), None);
    }
}
