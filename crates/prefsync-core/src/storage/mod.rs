//! Local durable key-value storage
//!
//! The sync manager only needs three primitives on a byte-valued store, so
//! hosts can back it with whatever persistence they have. Two implementations
//! ship here: [`FileStore`] for real use and [`MemoryStore`] for tests.

mod file;
mod memory;
pub mod queue;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::Result;

/// Byte-valued key-value store.
///
/// Every read/write is a plain read-then-write with no compare-and-swap.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, `None` when absent.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Remove `key`. Removing an absent key succeeds.
    fn delete(&self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key)
    }
}
