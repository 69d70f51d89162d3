//! Data models for prefsync

mod local_id;
mod preference;

pub use local_id::{generate_local_id, is_local_id, LOCAL_ID_PREFIX};
pub use preference::{
    default_user_id, Metadata, PendingPreference, Preference, PreferenceDraft, PUBLIC_USER_ID,
};
