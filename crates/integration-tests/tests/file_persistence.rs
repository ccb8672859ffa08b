//! Integration tests for carts persisted to a JSON file.
//!
//! The file store plays the role of browser local storage: one document
//! shared by several keys, with the cart under its own key.

#![allow(clippy::unwrap_used)]

use cartkeeper_core::{
    CART_STORAGE_KEY, CartError, CartRepository, CartSession, CorruptStatePolicy, KeyValueStore,
    ProductId,
};
use cartkeeper_integration_tests::{TestStore, item};

#[test]
fn test_cart_survives_reopen() {
    let store = TestStore::new();

    let mut session = store.open(CorruptStatePolicy::Surface).unwrap();
    session.add_item(item("p1", "Widget", 500)).unwrap();
    session.add_item(item("p1", "Widget", 500)).unwrap();
    session.add_item(item("p2", "Gadget", 199)).unwrap();
    drop(session);

    let session = store.open(CorruptStatePolicy::Surface).unwrap();
    assert_eq!(session.items().len(), 2);
    assert_eq!(session.total().cents(), 1199);
}

#[test]
fn test_persisted_layout_is_line_item_array() {
    let store = TestStore::new();
    let mut session = store.open(CorruptStatePolicy::Surface).unwrap();
    session.add_item(item("p1", "Widget", 500)).unwrap();
    drop(session);

    let raw = store.file_store().get(CART_STORAGE_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        value,
        serde_json::json!([{"id": "p1", "name": "Widget", "unitPrice": 500, "quantity": 1}])
    );
}

#[test]
fn test_other_keys_are_left_alone() {
    let store = TestStore::new();
    let mut kv = store.file_store();
    kv.set("theme", "dark").unwrap();

    let mut session = store.open(CorruptStatePolicy::Surface).unwrap();
    session.add_item(item("p1", "Widget", 500)).unwrap();
    session.clear().unwrap();

    assert_eq!(kv.get("theme").unwrap().as_deref(), Some("dark"));
}

#[test]
fn test_corrupt_cart_surface_then_reset() {
    let store = TestStore::new();
    let mut kv = store.file_store();
    kv.set(CART_STORAGE_KEY, "{\"oops\": true}").unwrap();

    assert!(matches!(
        store.open(CorruptStatePolicy::Surface),
        Err(CartError::CorruptPersistedState(_))
    ));

    let mut session = store.open(CorruptStatePolicy::Reset).unwrap();
    assert!(session.cart().is_empty());
    assert!(kv.get(CART_STORAGE_KEY).unwrap().is_none());

    session.add_item(item("p1", "Widget", 500)).unwrap();
    drop(session);
    assert_eq!(
        store
            .open(CorruptStatePolicy::Surface)
            .unwrap()
            .total()
            .cents(),
        500
    );
}

#[test]
fn test_overflowing_stored_total_is_corrupt() {
    let store = TestStore::new();
    let mut kv = store.file_store();
    let blob = serde_json::json!([
        {"id": "p1", "name": "Widget", "unitPrice": 1_u64 << 63, "quantity": 2},
        {"id": "p2", "name": "Gadget", "unitPrice": 7, "quantity": 1}
    ]);
    kv.set(CART_STORAGE_KEY, &blob.to_string()).unwrap();

    assert!(matches!(
        store.open(CorruptStatePolicy::Surface),
        Err(CartError::CorruptPersistedState(_))
    ));

    let session = store.open(CorruptStatePolicy::Reset).unwrap();
    assert!(session.cart().is_empty());
    assert!(kv.get(CART_STORAGE_KEY).unwrap().is_none());
}

#[test]
fn test_unreadable_document_is_read_error() {
    let store = TestStore::new();
    let kv = store.file_store();
    std::fs::write(kv.path(), "not a json object").unwrap();

    let result = store.open(CorruptStatePolicy::Reset);
    assert!(matches!(result, Err(CartError::PersistenceReadError(_))));
}

#[test]
fn test_separate_keys_hold_separate_carts() {
    let store = TestStore::new();

    let guest = CartRepository::with_key(store.file_store(), "guest-cart");
    let mut guest = CartSession::open(guest, CorruptStatePolicy::Surface).unwrap();
    guest.add_item(item("g1", "Guest thing", 100)).unwrap();

    let mut main = store.open(CorruptStatePolicy::Surface).unwrap();
    main.add_item(item("m1", "Main thing", 900)).unwrap();

    let guest = CartSession::open(
        CartRepository::with_key(store.file_store(), "guest-cart"),
        CorruptStatePolicy::Surface,
    )
    .unwrap();
    assert_eq!(guest.items().len(), 1);
    assert!(guest.cart().get(&ProductId::parse("g1").unwrap()).is_some());
    assert_eq!(main.total().cents(), 900);
}
