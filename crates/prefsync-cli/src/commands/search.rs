use prefsync_core::api::SearchPreferences;

use crate::commands::common::{
    failure_to_error, format_preference_lines, normalize_search_query, open_manager,
    results_json, run_startup_sync, ProfileContext,
};
use crate::error::CliError;

pub async fn run_search(
    query: &str,
    top_k: usize,
    user_id: Option<String>,
    as_json: bool,
    context: &ProfileContext,
    startup_sync: bool,
) -> Result<(), CliError> {
    let mut request = SearchPreferences::new(normalize_search_query(query)?).with_top_k(top_k);
    request.user_id = user_id.or_else(|| context.default_user_id().map(ToString::to_string));

    let manager = open_manager(context)?;
    run_startup_sync(&manager, startup_sync).await;

    let report = manager.search_preferences(&request).await;
    if as_json {
        println!("{}", serde_json::to_string_pretty(&results_json(&report.result))?);
    }
    let results = report.result.map_err(|failure| failure_to_error(&failure))?;
    if !as_json {
        for line in format_preference_lines(&results) {
            println!("{line}");
        }
    }

    Ok(())
}
