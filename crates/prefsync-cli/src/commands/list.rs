use crate::commands::common::{
    failure_to_error, format_preference_lines, open_manager, results_json, run_startup_sync,
    ProfileContext,
};
use crate::error::CliError;

pub async fn run_list(
    user_id: Option<String>,
    as_json: bool,
    context: &ProfileContext,
    startup_sync: bool,
) -> Result<(), CliError> {
    let user_id = user_id.or_else(|| context.default_user_id().map(ToString::to_string));
    let manager = open_manager(context)?;
    run_startup_sync(&manager, startup_sync).await;

    let report = manager.list_preferences(user_id.as_deref()).await;
    if as_json {
        println!("{}", serde_json::to_string_pretty(&results_json(&report.result))?);
    }
    let results = report.result.map_err(|failure| failure_to_error(&failure))?;
    if !as_json {
        if results.is_empty() {
            println!("No preferences found.");
        }
        for line in format_preference_lines(&results) {
            println!("{line}");
        }
    }

    Ok(())
}
