//! Core types for Cart Keeper.
//!
//! This module provides type-safe wrappers for product identity and money.

pub mod id;
pub mod price;

pub use id::{ProductId, ProductIdError};
pub use price::Price;
