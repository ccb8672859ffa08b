//! A cart bound to its storage.
//!
//! [`CartSession`] owns the cart for the lifetime of a user session. It
//! hydrates from storage when opened and saves after every mutation, so the
//! persisted blob always reflects the last successful change.

use tracing::{info, instrument, warn};

use crate::cart::{Cart, LineItem, NewItem};
use crate::error::CartError;
use crate::persistence::CartRepository;
use crate::storage::KeyValueStore;
use crate::types::{Price, ProductId};

/// What to do when the persisted cart cannot be parsed on open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorruptStatePolicy {
    /// Return [`CartError::CorruptPersistedState`] to the caller.
    #[default]
    Surface,
    /// Discard the stored blob and start with an empty cart.
    Reset,
}

/// An owned cart that persists itself after each mutation.
#[derive(Debug)]
pub struct CartSession<S> {
    cart: Cart,
    repo: CartRepository<S>,
}

impl<S: KeyValueStore> CartSession<S> {
    /// Open a session, hydrating the cart from `repo`.
    ///
    /// # Errors
    ///
    /// - [`CartError::CorruptPersistedState`] under
    ///   [`CorruptStatePolicy::Surface`] when the blob is unreadable.
    /// - [`CartError::PersistenceReadError`] if storage cannot be read.
    /// - [`CartError::PersistenceWriteError`] if a reset cannot clear the
    ///   stored blob.
    #[instrument(skip(repo), fields(key = repo.key()))]
    pub fn open(
        mut repo: CartRepository<S>,
        policy: CorruptStatePolicy,
    ) -> Result<Self, CartError> {
        let cart = match repo.load() {
            Ok(cart) => cart,
            Err(CartError::CorruptPersistedState(reason))
                if policy == CorruptStatePolicy::Reset =>
            {
                warn!(%reason, "Discarding corrupt persisted cart");
                repo.clear()?;
                Cart::new()
            }
            Err(e) => return Err(e),
        };

        info!(lines = cart.len(), "Cart session opened");
        Ok(Self { cart, repo })
    }

    /// Add one unit of a product, then save.
    ///
    /// # Errors
    ///
    /// - [`CartError::QuantityOverflow`] or [`CartError::TotalOverflow`] if
    ///   the cart rejects the change; nothing is changed or saved.
    /// - [`CartError::PersistenceWriteError`] if the save fails. The
    ///   in-memory cart keeps the change.
    #[instrument(skip(self, item), fields(id = %item.id))]
    pub fn add_item(&mut self, item: NewItem) -> Result<(), CartError> {
        self.cart.add_item(item)?;
        self.persist()
    }

    /// Remove a product's line, then save.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::PersistenceWriteError`] if the save fails.
    #[instrument(skip(self))]
    pub fn remove_item(&mut self, id: &ProductId) -> Result<bool, CartError> {
        let removed = self.cart.remove_item(id);
        self.persist()?;
        Ok(removed)
    }

    /// Set a product's quantity, then save.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`] for a negative quantity, or
    ///   [`CartError::TotalOverflow`] if the total would overflow; nothing is
    ///   changed or saved.
    /// - [`CartError::PersistenceWriteError`] if the save fails.
    #[instrument(skip(self))]
    pub fn set_quantity(&mut self, id: &ProductId, quantity: i64) -> Result<(), CartError> {
        self.cart.set_quantity(id, quantity)?;
        self.persist()
    }

    /// Empty the cart, then save.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::PersistenceWriteError`] if the save fails.
    #[instrument(skip(self))]
    pub fn clear(&mut self) -> Result<(), CartError> {
        self.cart.clear();
        self.persist()
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        self.cart.items()
    }

    #[must_use]
    pub fn total(&self) -> Price {
        self.cart.total()
    }

    /// Borrow the repository backing this session.
    pub const fn repository(&self) -> &CartRepository<S> {
        &self.repo
    }

    /// End the session, returning the cart and its repository.
    pub fn into_parts(self) -> (Cart, CartRepository<S>) {
        (self.cart, self.repo)
    }

    fn persist(&mut self) -> Result<(), CartError> {
        self.repo.save(&self.cart)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::persistence::CART_STORAGE_KEY;
    use crate::storage::MemoryStore;

    fn pid(s: &str) -> ProductId {
        ProductId::parse(s).unwrap()
    }

    fn stored(session: &CartSession<MemoryStore>) -> Cart {
        session.repository().load().unwrap()
    }

    fn open_empty() -> CartSession<MemoryStore> {
        CartSession::open(CartRepository::new(MemoryStore::new()), CorruptStatePolicy::Surface)
            .unwrap()
    }

    #[test]
    fn test_open_hydrates_from_storage() {
        let mut store = MemoryStore::new();
        store
            .set(
                CART_STORAGE_KEY,
                r#"[{"id":"p1","name":"Widget","unitPrice":500,"quantity":3}]"#,
            )
            .unwrap();

        let session =
            CartSession::open(CartRepository::new(store), CorruptStatePolicy::Surface).unwrap();
        assert_eq!(session.items().len(), 1);
        assert_eq!(session.total().cents(), 1500);
    }

    #[test]
    fn test_every_mutation_is_persisted() {
        let mut session = open_empty();

        session.add_item(NewItem::new("p1", "Widget", 500).unwrap()).unwrap();
        assert_eq!(&stored(&session), session.cart());

        session.add_item(NewItem::new("p2", "Gadget", 120).unwrap()).unwrap();
        session.set_quantity(&pid("p1"), 4).unwrap();
        assert_eq!(&stored(&session), session.cart());
        assert_eq!(stored(&session).total().cents(), 2120);

        assert!(session.remove_item(&pid("p2")).unwrap());
        assert_eq!(&stored(&session), session.cart());

        session.clear().unwrap();
        assert!(stored(&session).is_empty());
    }

    #[test]
    fn test_invalid_quantity_does_not_touch_storage() {
        let mut session = open_empty();
        session.add_item(NewItem::new("p1", "Widget", 500).unwrap()).unwrap();

        let err = session.set_quantity(&pid("p1"), -1).unwrap_err();
        assert!(matches!(err, CartError::InvalidQuantity { quantity: -1 }));
        assert_eq!(stored(&session).get(&pid("p1")).unwrap().quantity, 1);
    }

    #[test]
    fn test_overflowing_add_does_not_touch_storage() {
        let mut session = open_empty();
        session
            .add_item(NewItem::new("p1", "Widget", u64::MAX).unwrap())
            .unwrap();

        let err = session
            .add_item(NewItem::new("p2", "Gadget", 1).unwrap())
            .unwrap_err();
        assert!(matches!(err, CartError::TotalOverflow));
        assert_eq!(session.items().len(), 1);
        assert_eq!(&stored(&session), session.cart());
    }

    #[test]
    fn test_surface_policy_reports_corruption() {
        let mut store = MemoryStore::new();
        store.set(CART_STORAGE_KEY, "garbage").unwrap();

        let result = CartSession::open(CartRepository::new(store), CorruptStatePolicy::Surface);
        assert!(matches!(result, Err(CartError::CorruptPersistedState(_))));
    }

    #[test]
    fn test_reset_policy_discards_corruption() {
        let mut store = MemoryStore::new();
        store.set(CART_STORAGE_KEY, "garbage").unwrap();

        let session =
            CartSession::open(CartRepository::new(store), CorruptStatePolicy::Reset).unwrap();
        assert!(session.cart().is_empty());
        assert!(session.repository().store().is_empty());
    }

    #[test]
    fn test_failed_save_is_reported_and_memory_keeps_change() {
        let repo = CartRepository::new(MemoryStore::with_quota(8));
        let mut session = CartSession::open(repo, CorruptStatePolicy::Surface).unwrap();

        let err = session
            .add_item(NewItem::new("p1", "Widget", 500).unwrap())
            .unwrap_err();
        assert!(matches!(err, CartError::PersistenceWriteError(_)));
        assert_eq!(session.items().len(), 1);
        assert!(session.repository().store().is_empty());
    }

    #[test]
    fn test_default_policy_is_surface() {
        assert_eq!(CorruptStatePolicy::default(), CorruptStatePolicy::Surface);
    }
}
