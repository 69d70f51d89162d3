use prefsync_core::util::{is_http_url, normalize_text_option};

use crate::cli::ConfigCommands;
use crate::commands::common::ProfileContext;
use crate::config_profiles::{CliProfile, CliProfilesConfig};
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            profile,
            api_base_url,
            user_id,
            timeout_secs,
            no_activate,
        } => {
            let mut config = CliProfilesConfig::load()?;
            let profile_name = config.resolve_profile_name(profile.as_deref().or(global_profile));
            let update = ProfileUpdate {
                api_base_url,
                user_id,
                timeout_secs,
            };
            apply_profile_update(&mut config, &profile_name, update, !no_activate)?;

            let path = config.save()?;
            println!("Profile '{profile_name}' saved to {}", path.display());
            if config
                .profile(&profile_name)
                .and_then(CliProfile::client_config)
                .is_none()
            {
                println!("Profile '{profile_name}' is missing: api_base_url");
            }
            Ok(())
        }
        ConfigCommands::Show { profile } => {
            let context = ProfileContext::resolve(profile.as_deref().or(global_profile), None)?;
            println!("{}", serde_json::to_string_pretty(&describe_profile(&context))?);
            Ok(())
        }
    }
}

#[derive(Debug, Default)]
pub struct ProfileUpdate {
    pub api_base_url: Option<String>,
    pub user_id: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Merge explicit `config init` flags into the named profile, keeping stored
/// values for anything not given.
pub fn apply_profile_update(
    config: &mut CliProfilesConfig,
    profile_name: &str,
    update: ProfileUpdate,
    activate: bool,
) -> Result<(), CliError> {
    let profile = config.profile_entry(profile_name);
    if let Some(url) = normalize_text_option(update.api_base_url) {
        profile.api_base_url = Some(normalize_api_base_url(&url)?);
    }
    if let Some(user_id) = normalize_text_option(update.user_id) {
        profile.user_id = Some(user_id);
    }
    if let Some(timeout) = update.timeout_secs {
        profile.request_timeout_secs = (timeout > 0).then_some(timeout);
    }

    if activate {
        config.active_profile = Some(profile_name.to_string());
    }
    Ok(())
}

pub fn normalize_api_base_url(url: &str) -> Result<String, CliError> {
    let trimmed = url.trim();
    if !is_http_url(trimmed) {
        return Err(CliError::Config(
            "api_base_url must include http:// or https://".to_string(),
        ));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

pub fn describe_profile(context: &ProfileContext) -> serde_json::Value {
    serde_json::json!({
        "profile": context.profile_name,
        "storeDir": context.store_dir.display().to_string(),
        "apiBaseUrl": context.client.as_ref().map(|client| client.api_base_url.clone()),
        "userId": context.default_user_id(),
        "requestTimeoutSecs": context.client.as_ref().and_then(|client| client.request_timeout_secs),
    })
}
