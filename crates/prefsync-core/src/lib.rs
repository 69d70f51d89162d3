//! prefsync-core - Core library for prefsync
//!
//! This crate contains the preference models, the local pending-queue
//! storage, the remote preferences API client, and the sync manager that
//! falls back to local persistence when the backend is transiently down.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod sync;
pub mod util;

pub use error::{Error, Result};
pub use models::{Metadata, PendingPreference, Preference, PreferenceDraft};
pub use sync::{OperationFailure, OperationReport, PreferenceSyncManager, SaveOutcome, SyncReport};
