use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use prefsync_core::api::HttpPreferenceApi;
use prefsync_core::config::ClientConfig;
use prefsync_core::storage::FileStore;
use prefsync_core::sync::{OperationFailure, OperationReport, QueryResult, SaveOutcome, SaveResult};
use prefsync_core::{Metadata, PendingPreference, Preference, PreferenceSyncManager};
use serde_json::{json, Value};

use crate::config_profiles::{default_store_dir, CliProfilesConfig};
use crate::error::CliError;

pub type CliSyncManager = PreferenceSyncManager<HttpPreferenceApi, FileStore>;

/// Profile-derived settings for one CLI invocation.
#[derive(Debug, Clone)]
pub struct ProfileContext {
    pub profile_name: String,
    pub store_dir: PathBuf,
    pub client: Option<ClientConfig>,
}

impl ProfileContext {
    pub fn resolve(profile: Option<&str>, store_dir: Option<&Path>) -> Result<Self, CliError> {
        let config = CliProfilesConfig::load()?;
        Self::from_config(&config, profile, store_dir)
    }

    pub fn from_config(
        config: &CliProfilesConfig,
        profile: Option<&str>,
        store_dir: Option<&Path>,
    ) -> Result<Self, CliError> {
        let profile_name = config.resolve_profile_name(profile);
        let store_dir = match store_dir {
            Some(dir) => dir.to_path_buf(),
            None => default_store_dir(&profile_name)?,
        };
        let stored_client = config
            .profile(&profile_name)
            .and_then(|profile| profile.client_config());
        let client = resolve_client_config(stored_client)?;

        Ok(Self {
            profile_name,
            store_dir,
            client,
        })
    }

    pub fn open_store(&self) -> Result<FileStore, CliError> {
        Ok(FileStore::open(&self.store_dir)?)
    }

    pub fn require_client(&self) -> Result<&ClientConfig, CliError> {
        self.client.as_ref().ok_or(CliError::NotConfigured)
    }

    pub fn default_user_id(&self) -> Option<&str> {
        self.client
            .as_ref()
            .and_then(|client| client.user_id.as_deref())
    }
}

/// Merge a profile's stored client settings with `PREFSYNC_*` overrides.
pub fn resolve_client_config(
    from_profile: Option<ClientConfig>,
) -> Result<Option<ClientConfig>, CliError> {
    let Some(mut config) = from_profile else {
        return Ok(ClientConfig::from_env()?);
    };
    config.apply_env_overrides()?;
    Ok(Some(config.validate()?))
}

pub fn open_manager(context: &ProfileContext) -> Result<Arc<CliSyncManager>, CliError> {
    let api = HttpPreferenceApi::from_config(context.require_client()?)?;
    let store = context.open_store()?;
    tracing::debug!(
        "Using backend {} with queue at {}",
        api.base_url(),
        store.dir().display()
    );
    Ok(Arc::new(PreferenceSyncManager::new(api, store)))
}

/// Flush queued preferences before running a command, unless disabled.
pub async fn run_startup_sync(manager: &Arc<CliSyncManager>, enabled: bool) {
    if enabled {
        manager.spawn_initial_sync().wait().await;
    }
}

pub fn normalize_text(parts: &[String]) -> Result<String, CliError> {
    let joined = parts.join(" ");
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyText)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn normalize_search_query(query: &str) -> Result<String, CliError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptySearchQuery)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn normalize_preference_id(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyPreferenceId)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn parse_metadata(raw: Option<&str>) -> Result<Option<Metadata>, CliError> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(None);
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(Some(map)),
        Ok(other) => Err(CliError::InvalidMetadata(format!("got {other}"))),
        Err(error) => Err(CliError::InvalidMetadata(error.to_string())),
    }
}

pub fn failure_to_error(failure: &OperationFailure) -> CliError {
    match failure.status {
        Some(status) => CliError::OperationFailed(format!("{} (HTTP {status})", failure.error)),
        None => CliError::OperationFailed(failure.error.clone()),
    }
}

/// Render a save result the way the web client's hook returned it.
pub fn save_result_json(result: &SaveResult) -> Value {
    match result {
        Ok(outcome) => json!({ "success": true, "data": outcome.data() }),
        Err(failure) => failure_json(failure),
    }
}

/// Stderr notice for a save the backend did not take but the local queue did.
pub fn local_save_notice(report: &OperationReport<SaveResult>) -> Option<String> {
    if !report.result.as_ref().is_ok_and(SaveOutcome::is_local) {
        return None;
    }
    Some(match report.error.as_deref() {
        Some(error) => format!("Saved locally; will retry on next sync ({error})"),
        None => "Saved locally; will retry on next sync".to_string(),
    })
}

pub fn results_json(result: &QueryResult) -> Value {
    match result {
        Ok(results) => json!({ "success": true, "results": results }),
        Err(failure) => failure_json(failure),
    }
}

pub fn failure_json(failure: &OperationFailure) -> Value {
    let mut value = json!({ "success": false, "error": failure.error });
    if let Some(status) = failure.status {
        value["status"] = json!(status);
    }
    value
}

pub fn format_preference_lines(results: &[Value]) -> Vec<String> {
    results
        .iter()
        .map(|row| match Preference::from_value(row) {
            Some(preference) => {
                let short_id = preference.id.chars().take(13).collect::<String>();
                let name = preference.name.as_deref().unwrap_or("-");
                let preview = text_preview(&preference.text, 50);
                format!("{short_id:<13}  {name:<16}  {preview}")
            }
            None => row.to_string(),
        })
        .collect()
}

pub fn format_pending_lines(items: &[PendingPreference]) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    items
        .iter()
        .map(|item| {
            let preview = text_preview(&item.text, 40);
            let queued = format_relative_time(item.saved_at, now_ms);
            format!("{}  {:<12}  {preview:<40}  {queued}", item.id, item.user_id)
        })
        .collect()
}

pub fn text_preview(text: &str, max_chars: usize) -> String {
    let first_line = text.lines().next().unwrap_or("").trim();
    let collapsed = first_line.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else {
        format!("{}w ago", diff / week)
    }
}
