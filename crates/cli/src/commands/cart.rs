//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! # Add one unit of a product (price in cents)
//! cart-cli add --id p1 --name Widget --price 500
//!
//! # Set a quantity directly (0 removes the line)
//! cart-cli set p1 5
//!
//! # Show the cart and its total
//! cart-cli show
//! ```
//!
//! Every mutating command saves the cart before returning.

use cartkeeper_core::{
    Cart, CartError, CartRepository, CartSession, CorruptStatePolicy, FileStore, NewItem,
    ProductId, ProductIdError,
};
use thiserror::Error;
use tracing::info;

use crate::config::CliConfig;

/// Errors that can occur while running a cart command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The cart rejected the operation or storage failed.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// The product id argument was blank.
    #[error("Invalid product id: {0}")]
    InvalidProductId(#[from] ProductIdError),
}

/// Open the cart session described by `config`.
///
/// # Errors
///
/// Returns an error if the persisted cart cannot be read, or is corrupt and
/// `policy` is [`CorruptStatePolicy::Surface`].
pub fn open_session(
    config: &CliConfig,
    policy: CorruptStatePolicy,
) -> Result<CartSession<FileStore>, CommandError> {
    let store = FileStore::new(&config.storage_path);
    let repo = CartRepository::with_key(store, config.storage_key.as_str());
    Ok(CartSession::open(repo, policy)?)
}

/// Add one unit of a product.
///
/// # Errors
///
/// Returns an error if the id is blank, the line or total would overflow,
/// or the cart cannot be saved.
pub fn add(
    session: &mut CartSession<FileStore>,
    id: &str,
    name: &str,
    price_cents: u64,
) -> Result<(), CommandError> {
    let item = NewItem::new(id, name, price_cents)?;
    let id = item.id.clone();
    session.add_item(item)?;

    let quantity = session.cart().get(&id).map_or(0, |line| line.quantity);
    info!(%id, quantity, total = %session.total(), "Added to cart");
    Ok(())
}

/// Remove a product's line.
///
/// # Errors
///
/// Returns an error if the id is blank or the cart cannot be saved.
pub fn remove(session: &mut CartSession<FileStore>, id: &str) -> Result<(), CommandError> {
    let id = ProductId::parse(id)?;
    if session.remove_item(&id)? {
        info!(%id, total = %session.total(), "Removed from cart");
    } else {
        info!(%id, "Product not in cart, nothing removed");
    }
    Ok(())
}

/// Set a product's quantity.
///
/// # Errors
///
/// Returns an error for a blank id, a negative quantity, or a failed save.
pub fn set(
    session: &mut CartSession<FileStore>,
    id: &str,
    quantity: i64,
) -> Result<(), CommandError> {
    let id = ProductId::parse(id)?;
    session.set_quantity(&id, quantity)?;
    info!(%id, quantity, total = %session.total(), "Quantity updated");
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the cart cannot be saved.
pub fn clear(session: &mut CartSession<FileStore>) -> Result<(), CommandError> {
    session.clear()?;
    info!("Cart cleared");
    Ok(())
}

/// Log every line of the cart followed by its total.
pub fn show(session: &CartSession<FileStore>) {
    for line in summary_lines(session.cart()) {
        info!("{line}");
    }
}

/// Log the cart total.
pub fn total(session: &CartSession<FileStore>) {
    info!("Total: {}", session.total());
}

/// Render the cart as human-readable lines.
#[must_use]
pub fn summary_lines(cart: &Cart) -> Vec<String> {
    if cart.is_empty() {
        return vec!["Cart is empty".to_string(), format!("Total: {}", cart.total())];
    }

    let mut lines: Vec<String> = cart
        .items()
        .iter()
        .map(|line| {
            let line_total = line
                .line_total()
                .map_or_else(|| "overflow".to_string(), |total| total.to_string());
            format!(
                "{} x{} {} @ {} = {line_total}",
                line.id, line.quantity, line.name, line.unit_price
            )
        })
        .collect();
    lines.push(format!("Items: {}", cart.item_count()));
    lines.push(format!("Total: {}", cart.total()));
    lines
}
