use crate::commands::common::{
    failure_to_error, normalize_preference_id, open_manager, run_startup_sync, ProfileContext,
};
use crate::error::CliError;

pub async fn run_delete(
    id: &str,
    context: &ProfileContext,
    startup_sync: bool,
) -> Result<(), CliError> {
    let normalized_id = normalize_preference_id(id)?;
    let manager = open_manager(context)?;
    run_startup_sync(&manager, startup_sync).await;

    let report = manager.delete_preference(&normalized_id).await;
    match report.result {
        Ok(_) => {
            println!("{normalized_id}");
            Ok(())
        }
        Err(failure) => Err(failure_to_error(&failure)),
    }
}
