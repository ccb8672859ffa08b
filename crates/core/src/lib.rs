//! Cart Keeper Core - Cart state manager.
//!
//! This crate holds the shopping cart and everything needed to keep it
//! across restarts:
//! - [`cart`] - The in-memory store and its mutators
//! - [`persistence`] - Reads and writes the cart as one JSON blob
//! - [`storage`] - The key-value surface the blob lives in
//! - [`session`] - A cart bound to its repository, saved after every change
//!
//! # Architecture
//!
//! Everything is synchronous and single-owner. Mutators take `&mut self`,
//! so overlapping writes to the same storage key cannot happen.
//!
//! # Example
//!
//! ```rust
//! use cartkeeper_core::{CartRepository, CartSession, CorruptStatePolicy, MemoryStore, NewItem};
//!
//! let repo = CartRepository::new(MemoryStore::new());
//! let mut session = CartSession::open(repo, CorruptStatePolicy::Surface).unwrap();
//!
//! session.add_item(NewItem::new("p1", "Widget", 500).unwrap()).unwrap();
//! session.add_item(NewItem::new("p1", "Widget", 500).unwrap()).unwrap();
//!
//! assert_eq!(session.total().cents(), 1000);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod error;
pub mod persistence;
pub mod session;
pub mod storage;
pub mod types;

pub use cart::{Cart, LineItem, NewItem};
pub use error::CartError;
pub use persistence::{CART_STORAGE_KEY, CartRepository};
pub use session::{CartSession, CorruptStatePolicy};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use types::*;
