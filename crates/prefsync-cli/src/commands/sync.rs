use crate::commands::common::{open_manager, ProfileContext};
use crate::error::CliError;

pub async fn run_sync(context: &ProfileContext) -> Result<(), CliError> {
    let manager = open_manager(context)?;
    let report = manager.flush_pending().await?;

    if report.attempted == 0 && report.unreadable == 0 {
        println!("No queued preferences.");
        return Ok(());
    }

    println!(
        "Synced {} of {} queued preferences ({} still pending)",
        report.synced, report.attempted, report.remaining
    );
    if report.unreadable > 0 {
        println!(
            "{} stored queue entries could not be read and were left in place",
            report.unreadable
        );
    }
    Ok(())
}
