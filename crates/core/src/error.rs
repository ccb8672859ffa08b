//! Cart error types.

use thiserror::Error;

use crate::storage::StorageError;
use crate::types::ProductId;

/// Errors reported by cart mutators and the persistence adapter.
///
/// Every variant is returned to the caller as-is; nothing is retried.
#[derive(Debug, Error)]
pub enum CartError {
    /// A negative (or unrepresentably large) quantity was supplied.
    #[error("invalid quantity: {quantity}")]
    InvalidQuantity {
        /// The rejected value.
        quantity: i64,
    },

    /// Adding another unit would push a line past `u32::MAX` units.
    #[error("quantity of {id} cannot exceed {max}", max = u32::MAX)]
    QuantityOverflow {
        /// Product whose line is full.
        id: ProductId,
    },

    /// The change would make the cart total exceed `u64::MAX` cents.
    #[error("cart total would exceed {max} cents", max = u64::MAX)]
    TotalOverflow,

    /// The stored blob could not be parsed into a valid cart.
    #[error("corrupt persisted cart state: {0}")]
    CorruptPersistedState(String),

    /// Writing the cart to storage failed.
    #[error("failed to persist cart: {0}")]
    PersistenceWriteError(#[source] StorageError),

    /// Reading the cart from storage failed.
    #[error("failed to read persisted cart: {0}")]
    PersistenceReadError(#[source] StorageError),
}

impl CartError {
    /// Whether this error came from the storage layer rather than the caller.
    #[must_use]
    pub const fn is_storage_error(&self) -> bool {
        matches!(
            self,
            Self::PersistenceWriteError(_) | Self::PersistenceReadError(_)
        )
    }
}
