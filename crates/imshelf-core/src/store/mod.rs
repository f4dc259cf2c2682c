//! Key-value persistence for user state.
//!
//! Everything durable (favorites, counts, ratings, notes, progress,
//! uploads, theme) goes through the [`KvStore`] trait so hosts can swap
//! the backend without touching the reconciliation logic. Values are JSON
//! documents; the contract is last-write-wins with no guarantee across
//! keys.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// The trait that all storage backends implement.
pub trait KvStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Get the value under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Errors from the key-value store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Serialize `value` as JSON and store it under `key`.
pub fn save_json<T: Serialize>(
    store: &dyn KvStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let json = serde_json::to_string(value).map_err(|e| StoreError::Serialization(e.to_string()))?;
    store.put(key, &json)
}

/// Load and deserialize the value under `key`, returning `fallback` when
/// the key is absent or holds corrupt JSON. Never errors: a damaged entry
/// must not take the whole app down with it.
pub fn load_json_or<T: DeserializeOwned>(store: &dyn KvStore, key: &str, fallback: T) -> T {
    match store.get(key) {
        Ok(Some(json)) => match serde_json::from_str(&json) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Corrupt value under '{}': {}, using fallback", key, e);
                fallback
            }
        },
        Ok(None) => fallback,
        Err(e) => {
            tracing::warn!("Failed to read '{}': {}, using fallback", key, e);
            fallback
        }
    }
}
