use prefsync_core::PreferenceDraft;

use crate::commands::common::{
    failure_to_error, local_save_notice, normalize_text, open_manager, parse_metadata,
    run_startup_sync, save_result_json, ProfileContext,
};
use crate::error::CliError;

pub struct SaveArgs {
    pub text: Vec<String>,
    pub name: Option<String>,
    pub id: Option<String>,
    pub user_id: Option<String>,
    pub metadata: Option<String>,
}

pub fn build_draft(args: SaveArgs, default_user_id: Option<&str>) -> Result<PreferenceDraft, CliError> {
    let mut draft = PreferenceDraft::new(normalize_text(&args.text)?);
    draft.id = prefsync_core::util::normalize_text_option(args.id);
    draft.name = prefsync_core::util::normalize_text_option(args.name);
    draft.user_id = prefsync_core::util::normalize_text_option(args.user_id)
        .or_else(|| default_user_id.map(ToString::to_string));
    draft.metadata = parse_metadata(args.metadata.as_deref())?;
    Ok(draft)
}

pub async fn run_save(
    args: SaveArgs,
    context: &ProfileContext,
    startup_sync: bool,
) -> Result<(), CliError> {
    let draft = build_draft(args, context.default_user_id())?;
    let manager = open_manager(context)?;
    run_startup_sync(&manager, startup_sync).await;

    let report = manager.save_preference(&draft).await;
    println!("{}", serde_json::to_string_pretty(&save_result_json(&report.result))?);
    if let Some(notice) = local_save_notice(&report) {
        eprintln!("{notice}");
    }
    match &report.result {
        Ok(_) => Ok(()),
        Err(failure) => Err(failure_to_error(failure)),
    }
}
