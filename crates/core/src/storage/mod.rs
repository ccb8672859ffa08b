//! Flat key-value storage.
//!
//! The cart does not own its storage medium. Anything that can get, set and
//! remove string values by key can hold a cart: an in-process map for tests,
//! or a JSON file on disk standing in for browser local storage.

mod file;
mod memory;

use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors raised by a [`KeyValueStore`].
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing document could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The write would exceed the store's size limit.
    #[error("storage quota exceeded ({attempted} bytes, limit {limit})")]
    QuotaExceeded {
        /// Maximum number of bytes the store accepts.
        limit: usize,
        /// Number of bytes the rejected write would have used.
        attempted: usize,
    },
}

/// A flat string-to-string store.
///
/// Writes overwrite whatever was under the key. There are no transactions:
/// callers serialize their whole state into a single value.
pub trait KeyValueStore {
    /// Read the value under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the write is rejected or fails.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the medium cannot be updated.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}
