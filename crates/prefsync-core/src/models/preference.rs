//! Preference models

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Arbitrary structured metadata attached to a preference.
pub type Metadata = serde_json::Map<String, Value>;

/// User id used when the caller does not supply one.
pub const PUBLIC_USER_ID: &str = "public";

pub fn default_user_id() -> String {
    PUBLIC_USER_ID.to_string()
}

/// A preference record as stored by the remote API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preference {
    /// Server-assigned identifier
    pub id: String,
    /// Owner of the preference
    #[serde(default = "default_user_id")]
    pub user_id: String,
    /// Optional label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Preference payload, e.g. a saved job-search filter
    #[serde(default)]
    pub text: String,
    /// Optional structured metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl Preference {
    /// Interpret a JSON result row from search/list as a preference.
    ///
    /// Returns `None` when the row lacks an id.
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }
}

/// A preference write queued locally because the backend could not take it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingPreference {
    /// Client-generated `local-` id
    pub id: String,
    /// `null` or missing reads as `"public"`
    #[serde(default = "default_user_id", deserialize_with = "user_id_or_public")]
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub text: String,
    #[serde(default)]
    pub metadata: Option<Metadata>,
    /// Queue time (Unix ms)
    #[serde(default, deserialize_with = "lenient_millis")]
    pub saved_at: i64,
}

impl PendingPreference {
    /// Decode one element of the stored queue, `None` when it lacks a string
    /// `id` or `text`.
    pub fn from_value(value: &Value) -> Option<Self> {
        Self::deserialize(value).ok()
    }
}

fn user_id_or_public<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_user_id))
}

#[allow(clippy::cast_possible_truncation)]
fn lenient_millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let millis = match Value::deserialize(deserializer)? {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|millis| millis as i64))
            .unwrap_or_default(),
        _ => 0,
    };
    Ok(millis)
}

/// Caller-supplied fields for a save.
///
/// Leaving `id` empty asks the server to create a record; supplying a remote
/// or local id asks it to update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreferenceDraft {
    pub id: Option<String>,
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub text: String,
    pub metadata: Option<Metadata>,
}

impl PreferenceDraft {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Build the queue entry for this draft under a freshly minted id.
    ///
    /// The draft's own `id`, if any, is replaced: the queued item is keyed by
    /// `local_id`.
    pub fn to_pending(&self, local_id: String, saved_at: i64) -> PendingPreference {
        PendingPreference {
            id: local_id,
            user_id: self.user_id.clone().unwrap_or_else(default_user_id),
            name: self.name.clone(),
            text: self.text.clone(),
            metadata: self.metadata.clone(),
            saved_at,
        }
    }
}
