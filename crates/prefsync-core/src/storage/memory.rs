//! In-memory key-value store

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use super::KeyValueStore;
use crate::error::{Error, Result};

/// Shared in-memory store. Clones see the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    mutations: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set`/`delete` calls made so far.
    pub fn mutation_count(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    /// Whether `key` currently holds a value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().is_ok_and(|entries| entries.contains_key(key))
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Vec<u8>>>> {
        self.entries
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.lock()?.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_entries() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.set("k", b"v").unwrap();

        assert_eq!(other.get("k").unwrap().as_deref(), Some(&b"v"[..]));
        assert_eq!(other.mutation_count(), 1);
    }

    #[test]
    fn delete_counts_as_mutation_even_when_absent() {
        let store = MemoryStore::new();
        store.delete("missing").unwrap();
        assert_eq!(store.mutation_count(), 1);
        assert!(!store.contains_key("missing"));
    }
}
