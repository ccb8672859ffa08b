//! Integration tests for Cart Keeper.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cartkeeper-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_scenarios` - End-to-end mutator scenarios through a session
//! - `file_persistence` - Sessions backed by a real file on disk

use cartkeeper_core::{CartRepository, CartSession, CorruptStatePolicy, FileStore, NewItem};
use tempfile::TempDir;

/// A cart file inside a temporary directory that is removed on drop.
pub struct TestStore {
    dir: TempDir,
}

impl TestStore {
    /// Create a fresh temporary directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create temp dir"),
        }
    }

    /// File store pointing at `store.json` in the temp directory.
    #[must_use]
    pub fn file_store(&self) -> FileStore {
        FileStore::new(self.dir.path().join("store.json"))
    }

    /// Open a session over the temp file.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`CartSession::open`].
    pub fn open(
        &self,
        policy: CorruptStatePolicy,
    ) -> Result<CartSession<FileStore>, cartkeeper_core::CartError> {
        CartSession::open(CartRepository::new(self.file_store()), policy)
    }
}

impl Default for TestStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a [`NewItem`], panicking on a blank id.
///
/// # Panics
///
/// Panics if `id` is blank.
#[must_use]
#[allow(clippy::expect_used)]
pub fn item(id: &str, name: &str, cents: u64) -> NewItem {
    NewItem::new(id, name, cents).expect("test ids are never blank")
}
