use prefsync_core::storage::queue::load_queue;

use crate::commands::common::{format_pending_lines, ProfileContext};
use crate::error::CliError;

pub fn run_pending(as_json: bool, context: &ProfileContext) -> Result<(), CliError> {
    let store = context.open_store()?;
    let items = load_queue(&store)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("No queued preferences.");
        return Ok(());
    }

    for line in format_pending_lines(&items) {
        println!("{line}");
    }
    Ok(())
}
