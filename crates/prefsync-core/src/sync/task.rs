//! Host-owned handle for the startup sync pass.

use tokio::task::JoinHandle;

/// Background flush of the pending queue started by
/// [`PreferenceSyncManager::spawn_initial_sync`](super::PreferenceSyncManager::spawn_initial_sync).
///
/// Dropping the handle detaches the task; it is never cancelled.
#[derive(Debug)]
pub struct SyncTask {
    handle: JoinHandle<()>,
}

impl SyncTask {
    pub(crate) const fn new(handle: JoinHandle<()>) -> Self {
        Self { handle }
    }

    /// Wait for the pass to complete.
    pub async fn wait(self) {
        if let Err(error) = self.handle.await {
            tracing::warn!("Pending preference sync task failed: {}", error);
        }
    }
}
