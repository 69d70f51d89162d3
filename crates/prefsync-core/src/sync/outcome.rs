//! Results returned by the sync manager's public operations.

use serde_json::{json, Value};

/// An operation's result together with the error status it leaves behind.
///
/// `error` is cleared at the start of every operation and set whenever the
/// remote call failed, including a save that was rescued by the local queue.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationReport<T> {
    pub result: T,
    pub error: Option<String>,
}

impl<T> OperationReport<T> {
    pub(crate) const fn new(result: T, error: Option<String>) -> Self {
        Self { result, error }
    }
}

impl<T> OperationReport<Result<T, OperationFailure>> {
    pub(crate) const fn succeeded(value: T) -> Self {
        Self::new(Ok(value), None)
    }

    pub(crate) fn failed(failure: OperationFailure) -> Self {
        let error = Some(failure.error.clone());
        Self::new(Err(failure), error)
    }

    pub const fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// A remote failure surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationFailure {
    pub error: String,
    /// HTTP status, absent for transport or decoding failures
    pub status: Option<u16>,
}

impl OperationFailure {
    pub(crate) fn new(error: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            error: error.into(),
            status,
        }
    }
}

/// Successful save, remote or local-only. Both variants count as success.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// The backend accepted the write; holds its decoded response.
    Saved(Value),
    /// The backend was unavailable and the write was queued under `id`.
    SavedLocally { id: String },
}

impl SaveOutcome {
    /// Response payload in the shape the backend client always exposed.
    pub fn data(&self) -> Value {
        match self {
            Self::Saved(data) => data.clone(),
            Self::SavedLocally { id } => json!({ "savedLocally": true, "id": id }),
        }
    }

    pub const fn is_local(&self) -> bool {
        matches!(self, Self::SavedLocally { .. })
    }
}

pub type SaveResult = Result<SaveOutcome, OperationFailure>;
pub type DeleteResult = Result<Option<Value>, OperationFailure>;
pub type QueryResult = Result<Vec<Value>, OperationFailure>;

/// Outcome of one pass over the pending queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Decoded items sent to the backend
    pub attempted: usize,
    pub synced: usize,
    /// Items left in the queue, unreadable ones included
    pub remaining: usize,
    /// Stored elements that do not decode as a pending preference
    pub unreadable: usize,
}
