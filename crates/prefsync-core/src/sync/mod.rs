//! Preference sync manager.
//!
//! Mediates between the remote preferences API and the local pending queue.
//! A save rejected with the transient-backend signature is queued locally and
//! reported as a success; the queue is flushed later, one item at a time, in
//! insertion order.
//!
//! Queue reads and writes are plain read-then-write on a single storage key.
//! A save racing a flush can lose an update; the last writer wins.

mod outcome;
mod task;

use std::sync::Arc;

use serde_json::Value;

pub use outcome::{
    DeleteResult, OperationFailure, OperationReport, QueryResult, SaveOutcome, SaveResult,
    SyncReport,
};
pub use task::SyncTask;

use crate::api::{ApiError, FailureKind, PreferenceApi, SearchPreferences, UpsertPreference};
use crate::error::{Error, Result};
use crate::models::{generate_local_id, PendingPreference, PreferenceDraft};
use crate::storage::queue::{append_to_queue, load_queue, load_raw_queue, store_queue};
use crate::storage::KeyValueStore;
use crate::util::{compact_text, unix_timestamp_millis_now};

pub struct PreferenceSyncManager<A, S> {
    api: A,
    store: S,
}

impl<A: PreferenceApi, S: KeyValueStore> PreferenceSyncManager<A, S> {
    pub const fn new(api: A, store: S) -> Self {
        Self { api, store }
    }

    pub const fn api(&self) -> &A {
        &self.api
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Items currently waiting in the local queue.
    pub fn pending(&self) -> Result<Vec<PendingPreference>> {
        load_queue(&self.store)
    }

    /// Flush the pending queue, swallowing every failure.
    ///
    /// Errors are only logged; the queue on disk is the sole output.
    pub async fn initialize_sync(&self) {
        match self.flush_pending().await {
            Ok(report) if report.attempted > 0 || report.unreadable > 0 => {
                tracing::info!(
                    attempted = report.attempted,
                    synced = report.synced,
                    remaining = report.remaining,
                    unreadable = report.unreadable,
                    "Pending preference sync finished"
                );
            }
            Ok(_) => {}
            Err(error) => tracing::warn!("Pending preference sync failed: {}", error),
        }
    }

    /// Retry every queued item once and rewrite the queue with the failures.
    ///
    /// An absent, empty or non-array queue makes no requests and leaves
    /// storage untouched. Elements that do not decode as a pending
    /// preference are not sent and stay queued exactly as stored. Any non-2xx
    /// response keeps the item queued whether or not it carries the
    /// transient signature.
    pub async fn flush_pending(&self) -> Result<SyncReport> {
        let entries = match load_raw_queue(&self.store) {
            Ok(entries) => entries,
            Err(Error::Serialization(error)) => {
                tracing::warn!("Ignoring unreadable pending preference queue: {}", error);
                return Ok(SyncReport::default());
            }
            Err(error) => return Err(error),
        };
        if entries.is_empty() {
            return Ok(SyncReport::default());
        }

        let mut report = SyncReport::default();
        let mut still_pending = Vec::new();
        for entry in entries {
            let Some(item) = PendingPreference::from_value(&entry) else {
                tracing::warn!(
                    entry = %compact_text(&entry.to_string()),
                    "Keeping undecodable pending preference as stored"
                );
                report.unreadable += 1;
                still_pending.push(entry);
                continue;
            };

            report.attempted += 1;
            match self.api.upsert(&UpsertPreference::from(&item)).await {
                Ok(response) if response.is_success() => {
                    tracing::debug!(id = %item.id, "Synced pending preference");
                    report.synced += 1;
                }
                Ok(response) => {
                    let kind = FailureKind::classify(response.status, &response.body);
                    tracing::debug!(
                        id = %item.id,
                        status = response.status,
                        ?kind,
                        body = %compact_text(&response.body),
                        "Pending preference rejected; keeping it queued"
                    );
                    still_pending.push(entry);
                }
                Err(error) => {
                    tracing::debug!(id = %item.id, "Pending preference retry failed: {}", error);
                    still_pending.push(entry);
                }
            }
        }

        store_queue(&self.store, &still_pending)?;
        report.remaining = still_pending.len();
        Ok(report)
    }

    /// Create or update a preference remotely, queueing it locally when the
    /// backend reports the transient signature.
    ///
    /// A locally queued save is a success for the caller; only the report's
    /// `error` tells it apart from a remote save.
    pub async fn save_preference(&self, draft: &PreferenceDraft) -> OperationReport<SaveResult> {
        let response = match self.api.upsert(&UpsertPreference::from(draft)).await {
            Ok(response) => response,
            Err(error) => return transport_failure(&error),
        };

        let data = parse_body(&response.body);
        if response.is_success() {
            return OperationReport::succeeded(SaveOutcome::Saved(data));
        }

        let error_text = stringify_error_body(&data, response.status);
        if !FailureKind::classify(response.status, &error_text).is_transient() {
            return OperationReport::failed(OperationFailure::new(
                error_text,
                Some(response.status),
            ));
        }

        let id = generate_local_id();
        let pending = draft.to_pending(id.clone(), unix_timestamp_millis_now());
        match append_to_queue(&self.store, &pending) {
            Ok(()) => tracing::info!(id = %id, "Backend unavailable; preference queued locally"),
            Err(error) => tracing::warn!(id = %id, "Failed to queue preference locally: {}", error),
        }
        OperationReport::new(Ok(SaveOutcome::SavedLocally { id }), Some(error_text))
    }

    /// Delete a preference remotely. Failures are never queued.
    pub async fn delete_preference(&self, id: &str) -> OperationReport<DeleteResult> {
        let response = match self.api.delete(id).await {
            Ok(response) => response,
            Err(error) => return transport_failure(&error),
        };

        let data = response.json();
        if response.is_success() {
            OperationReport::succeeded(data)
        } else {
            OperationReport::failed(OperationFailure::new(
                error_message(data.as_ref(), response.status),
                Some(response.status),
            ))
        }
    }

    /// Search preferences on the backend.
    pub async fn search_preferences(
        &self,
        request: &SearchPreferences,
    ) -> OperationReport<QueryResult> {
        let response = match self.api.search(request).await {
            Ok(response) => response,
            Err(error) => return transport_failure(&error),
        };
        results_report(&response.body, response.status)
    }

    /// List preferences, optionally scoped to one user.
    pub async fn list_preferences(&self, user_id: Option<&str>) -> OperationReport<QueryResult> {
        let response = match self.api.list(user_id).await {
            Ok(response) => response,
            Err(error) => return transport_failure(&error),
        };
        results_report(&response.body, response.status)
    }
}

impl<A, S> PreferenceSyncManager<A, S>
where
    A: PreferenceApi + 'static,
    S: KeyValueStore + 'static,
{
    /// Start [`initialize_sync`](Self::initialize_sync) on the tokio runtime.
    ///
    /// Must be called from within a runtime.
    pub fn spawn_initial_sync(self: &Arc<Self>) -> SyncTask {
        let manager = Arc::clone(self);
        SyncTask::new(tokio::spawn(async move {
            manager.initialize_sync().await;
        }))
    }
}

fn transport_failure<T>(
    error: &ApiError,
) -> OperationReport<std::result::Result<T, OperationFailure>> {
    OperationReport::failed(OperationFailure::new(error.to_string(), None))
}

/// Decode a response body as JSON, falling back to the raw text.
fn parse_body(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

/// Render a failed upsert's body as the error text, `HTTP {status}` when empty.
fn stringify_error_body(data: &Value, status: u16) -> String {
    match data {
        Value::String(text) if text.is_empty() => format!("HTTP {status}"),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// `error` field of a JSON body, else `HTTP {status}`.
fn error_message(data: Option<&Value>, status: u16) -> String {
    match data.and_then(|value| value.get("error")) {
        Some(Value::String(message)) if !message.is_empty() => message.clone(),
        Some(Value::String(_) | Value::Null) | None => format!("HTTP {status}"),
        Some(other) => other.to_string(),
    }
}

fn results_report(body: &str, status: u16) -> OperationReport<QueryResult> {
    let data = match serde_json::from_str::<Value>(body) {
        Ok(data) => data,
        Err(error) => {
            return OperationReport::failed(OperationFailure::new(
                format!("Failed to parse response JSON: {error}"),
                None,
            ));
        }
    };

    if (200..300).contains(&status) {
        let results = data
            .get("results")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        OperationReport::succeeded(results)
    } else {
        OperationReport::failed(OperationFailure::new(
            error_message(Some(&data), status),
            Some(status),
        ))
    }
}
