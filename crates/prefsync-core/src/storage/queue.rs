//! Pending preference queue persisted under a single storage key.
//!
//! The key holds a JSON array. Elements are decoded one at a time, so an
//! element that is not a pending preference stays in the array untouched and
//! never hides the rest of the queue.

use serde::Serialize;
use serde_json::Value;

use super::KeyValueStore;
use crate::error::Result;
use crate::models::PendingPreference;

/// Storage key holding the JSON array of queued preferences.
pub const PENDING_QUEUE_KEY: &str = "pendingJobPreferences";

/// Read the stored array as raw JSON elements. An absent or blank key is an
/// empty queue.
///
/// A stored value that is not a JSON array is an `Error::Serialization`.
pub fn load_raw_queue<S: KeyValueStore + ?Sized>(store: &S) -> Result<Vec<Value>> {
    let Some(raw) = store.get(PENDING_QUEUE_KEY)? else {
        return Ok(Vec::new());
    };
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_slice(&raw)?)
}

/// Read the queued preferences, skipping elements that do not decode.
pub fn load_queue<S: KeyValueStore + ?Sized>(store: &S) -> Result<Vec<PendingPreference>> {
    Ok(load_raw_queue(store)?
        .iter()
        .filter_map(PendingPreference::from_value)
        .collect())
}

/// Replace the queue. An empty queue removes the key instead of storing `[]`.
pub fn store_queue<S, T>(store: &S, items: &[T]) -> Result<()>
where
    S: KeyValueStore + ?Sized,
    T: Serialize,
{
    if items.is_empty() {
        return store.delete(PENDING_QUEUE_KEY);
    }
    let encoded = serde_json::to_vec(items)?;
    store.set(PENDING_QUEUE_KEY, &encoded)
}

/// Append one item at the tail of the queue (read-modify-write).
///
/// Existing elements are written back exactly as they were read.
pub fn append_to_queue<S: KeyValueStore + ?Sized>(
    store: &S,
    item: &PendingPreference,
) -> Result<()> {
    let mut entries = load_raw_queue(store)?;
    entries.push(serde_json::to_value(item)?);
    store_queue(store, &entries)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::models::PreferenceDraft;
    use crate::storage::MemoryStore;

    fn pending(id: &str) -> PendingPreference {
        PreferenceDraft::new(format!("text for {id}")).to_pending(id.to_string(), 1)
    }

    #[test]
    fn missing_key_is_empty_queue() {
        let store = MemoryStore::new();
        assert!(load_queue(&store).unwrap().is_empty());
        assert!(load_raw_queue(&store).unwrap().is_empty());
    }

    #[test]
    fn append_preserves_insertion_order() {
        let store = MemoryStore::new();
        append_to_queue(&store, &pending("local-aaaaaaa")).unwrap();
        append_to_queue(&store, &pending("local-bbbbbbb")).unwrap();

        let ids = load_queue(&store)
            .unwrap()
            .into_iter()
            .map(|item| item.id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["local-aaaaaaa", "local-bbbbbbb"]);
    }

    #[test]
    fn storing_empty_queue_deletes_key() {
        let store = MemoryStore::new();
        append_to_queue(&store, &pending("local-aaaaaaa")).unwrap();
        store_queue::<_, PendingPreference>(&store, &[]).unwrap();
        assert!(!store.contains_key(PENDING_QUEUE_KEY));
    }

    #[test]
    fn non_array_queue_is_an_error() {
        let store = MemoryStore::new();
        store.set(PENDING_QUEUE_KEY, br#"{"not":"an array"}"#).unwrap();
        assert!(load_queue(&store).is_err());
        assert!(append_to_queue(&store, &pending("local-aaaaaaa")).is_err());
    }

    #[test]
    fn foreign_elements_do_not_hide_the_rest_of_the_queue() {
        let store = MemoryStore::new();
        let stored = json!([
            { "id": "local-aaaaaaa", "userId": null, "text": "a", "savedAt": 1.5 },
            { "id": "local-bbbbbbb", "name": "no text" },
            42,
        ]);
        store
            .set(PENDING_QUEUE_KEY, &serde_json::to_vec(&stored).unwrap())
            .unwrap();

        let items = load_queue(&store).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "local-aaaaaaa");
        assert_eq!(items[0].user_id, "public");

        append_to_queue(&store, &pending("local-ccccccc")).unwrap();
        let raw = load_raw_queue(&store).unwrap();
        assert_eq!(raw.len(), 4);
        assert_eq!(&raw[..3], stored.as_array().unwrap().as_slice());
        assert_eq!(raw[3]["id"], json!("local-ccccccc"));
    }
}
