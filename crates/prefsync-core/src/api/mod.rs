//! Remote preferences API contract and HTTP client.
//!
//! The sync manager talks to the backend through [`PreferenceApi`] and only
//! ever looks at the status code and raw body text of a response, so the
//! trait returns [`ApiResponse`] rather than decoded payloads.

mod http;

use std::future::Future;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub use http::HttpPreferenceApi;

use crate::models::{Metadata, PendingPreference, PreferenceDraft};

/// Number of search results requested when the caller does not say.
pub const DEFAULT_TOP_K: usize = 5;

/// Marker the backend puts in error bodies when its datastore is unavailable.
const TRANSIENT_BACKEND_SIGNATURE: &str = "D1";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid API configuration: {0}")]
    InvalidConfiguration(String),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Transport error: {0}")]
    Transport(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Status and undecoded body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Decode the body as JSON, `None` when it is not valid JSON.
    pub fn json(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }
}

/// Body of `POST /api/preferences/upsert`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertPreference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub text: String,
    /// `None` leaves the field out; `Some(None)` sends `null`
    #[allow(clippy::option_option)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Option<Metadata>>,
}

impl From<&PreferenceDraft> for UpsertPreference {
    fn from(draft: &PreferenceDraft) -> Self {
        Self {
            id: draft.id.clone(),
            user_id: draft.user_id.clone(),
            name: draft.name.clone(),
            text: draft.text.clone(),
            metadata: draft.metadata.clone().map(Some),
        }
    }
}

impl From<&PendingPreference> for UpsertPreference {
    fn from(pending: &PendingPreference) -> Self {
        Self {
            id: Some(pending.id.clone()),
            user_id: Some(pending.user_id.clone()),
            name: pending.name.clone(),
            text: pending.text.clone(),
            metadata: Some(pending.metadata.clone()),
        }
    }
}

/// Body of `POST /api/preferences/search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPreferences {
    pub query: String,
    pub top_k: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl SearchPreferences {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            top_k: DEFAULT_TOP_K,
            user_id: None,
        }
    }

    #[must_use]
    pub const fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

/// Remote preferences backend.
///
/// Implementations return `Ok` for any HTTP exchange that produced a status
/// code, success or not; `Err` is reserved for transport failures.
pub trait PreferenceApi: Send + Sync {
    fn upsert(
        &self,
        request: &UpsertPreference,
    ) -> impl Future<Output = ApiResult<ApiResponse>> + Send;

    fn delete(&self, id: &str) -> impl Future<Output = ApiResult<ApiResponse>> + Send;

    fn search(
        &self,
        request: &SearchPreferences,
    ) -> impl Future<Output = ApiResult<ApiResponse>> + Send;

    fn list(&self, user_id: Option<&str>) -> impl Future<Output = ApiResult<ApiResponse>> + Send;
}

/// Classification of a non-2xx response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Backend datastore temporarily unavailable; the write may be queued.
    Transient,
    /// The addressed record does not exist.
    NotFound,
    /// Any other rejection.
    Permanent,
}

impl FailureKind {
    /// Classify a failed response from its status and error text.
    pub fn classify(status: u16, error_text: &str) -> Self {
        if is_transient_backend_failure(error_text) {
            Self::Transient
        } else if status == 404 {
            Self::NotFound
        } else {
            Self::Permanent
        }
    }

    pub const fn is_transient(self) -> bool {
        matches!(self, Self::Transient)
    }
}

/// Legacy backend signal: error text containing `D1` (case-sensitive) means
/// the datastore is unavailable and the client should keep the write locally.
pub fn is_transient_backend_failure(error_text: &str) -> bool {
    error_text.contains(TRANSIENT_BACKEND_SIGNATURE)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn transient_signature_is_case_sensitive_substring() {
        assert!(is_transient_backend_failure("D1_ERROR: no such table"));
        assert!(is_transient_backend_failure(r#"{"error":"D1 unavailable"}"#));
        assert!(!is_transient_backend_failure("d1 lowercase"));
        assert!(!is_transient_backend_failure("HTTP 500"));
    }

    #[test]
    fn classify_prefers_signature_over_status() {
        assert_eq!(FailureKind::classify(404, "D1 missing"), FailureKind::Transient);
        assert_eq!(FailureKind::classify(404, "not found"), FailureKind::NotFound);
        assert_eq!(FailureKind::classify(500, "boom"), FailureKind::Permanent);
    }

    #[test]
    fn upsert_body_omits_absent_fields() {
        let draft = PreferenceDraft::new("remote rust roles");
        let body = serde_json::to_value(UpsertPreference::from(&draft)).unwrap();
        assert_eq!(body, json!({ "text": "remote rust roles" }));
    }

    #[test]
    fn upsert_body_from_pending_carries_local_id() {
        let pending = PreferenceDraft::new("x")
            .with_name("n")
            .to_pending("local-1234567".to_string(), 9);
        let body = serde_json::to_value(UpsertPreference::from(&pending)).unwrap();
        assert_eq!(
            body,
            json!({
                "id": "local-1234567",
                "userId": "public",
                "name": "n",
                "text": "x",
                "metadata": null,
            })
        );
    }

    #[test]
    fn search_body_uses_top_k_field() {
        let body = serde_json::to_value(SearchPreferences::new("rust").with_user_id("u1")).unwrap();
        assert_eq!(body, json!({ "query": "rust", "topK": 5, "userId": "u1" }));
    }

    #[test]
    fn response_success_range() {
        assert!(ApiResponse::new(200, "").is_success());
        assert!(ApiResponse::new(204, "").is_success());
        assert!(!ApiResponse::new(199, "").is_success());
        assert!(!ApiResponse::new(300, "").is_success());
        assert_eq!(ApiResponse::new(500, "not json").json(), None);
    }
}
