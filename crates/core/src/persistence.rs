//! Cart persistence adapter.
//!
//! The whole cart is stored as one JSON array of line items under a fixed
//! key. Every save is a full overwrite; there are no partial writes.
//!
//! ```json
//! [{"id": "p1", "name": "Widget", "unitPrice": 500, "quantity": 2}]
//! ```

use tracing::{debug, instrument};

use crate::cart::{Cart, LineItem};
use crate::error::CartError;
use crate::storage::KeyValueStore;

/// Key the cart blob is stored under by default.
pub const CART_STORAGE_KEY: &str = "cart";

/// Reads and writes a [`Cart`] to a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct CartRepository<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> CartRepository<S> {
    /// Create a repository using [`CART_STORAGE_KEY`].
    pub fn new(store: S) -> Self {
        Self::with_key(store, CART_STORAGE_KEY)
    }

    /// Create a repository using a custom key.
    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// The key the cart is stored under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Borrow the underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Consume the repository and return the underlying store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Load the cart from storage.
    ///
    /// An absent or blank value yields an empty cart.
    ///
    /// # Errors
    ///
    /// - [`CartError::CorruptPersistedState`] if the value is not a JSON
    ///   array of line items, or the lines break the cart invariants.
    /// - [`CartError::PersistenceReadError`] if the store cannot be read.
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn load(&self) -> Result<Cart, CartError> {
        let Some(raw) = self
            .store
            .get(&self.key)
            .map_err(CartError::PersistenceReadError)?
        else {
            debug!("No persisted cart, starting empty");
            return Ok(Cart::new());
        };

        if raw.trim().is_empty() {
            return Ok(Cart::new());
        }

        let items: Vec<LineItem> = serde_json::from_str(&raw)
            .map_err(|e| CartError::CorruptPersistedState(e.to_string()))?;
        let cart = Cart::from_items(items)?;

        debug!(lines = cart.len(), "Loaded persisted cart");
        Ok(cart)
    }

    /// Save the full cart, overwriting any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::PersistenceWriteError`] if encoding or the
    /// storage write fails. The write is not retried.
    #[instrument(skip(self, cart), fields(key = %self.key, lines = cart.len()))]
    pub fn save(&mut self, cart: &Cart) -> Result<(), CartError> {
        let blob = serde_json::to_string(cart.items())
            .map_err(|e| CartError::PersistenceWriteError(e.into()))?;
        self.store
            .set(&self.key, &blob)
            .map_err(CartError::PersistenceWriteError)?;
        debug!(bytes = blob.len(), "Saved cart");
        Ok(())
    }

    /// Remove the persisted cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::PersistenceWriteError`] if the store cannot be
    /// updated.
    pub fn clear(&mut self) -> Result<(), CartError> {
        self.store
            .remove(&self.key)
            .map_err(CartError::PersistenceWriteError)
    }
}
