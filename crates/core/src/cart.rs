//! Cart store and mutators.
//!
//! A [`Cart`] is an ordered list of [`LineItem`]s, unique by product id.
//! Lines keep the order in which they were first added. The total is
//! computed from the lines on every read and never cached.
//!
//! Every mutator keeps the total within `u64` cents; a change that would
//! overflow a line's quantity or the total is rejected and leaves the cart
//! as it was.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CartError;
use crate::types::{Price, ProductId, ProductIdError};

/// One product entry in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Product this line refers to.
    pub id: ProductId,
    /// Display name; not used for identity.
    pub name: String,
    /// Price of a single unit.
    pub unit_price: Price,
    /// Number of units, always at least 1 while the line is in a cart.
    pub quantity: u32,
}

impl LineItem {
    /// Price of the whole line (`unit_price * quantity`), or `None` if it
    /// does not fit in a `u64`. Always `Some` for lines held by a [`Cart`].
    #[must_use]
    pub fn line_total(&self) -> Option<Price> {
        self.unit_price.checked_times(self.quantity)
    }
}

/// Payload accepted by [`Cart::add_item`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    /// Product to add.
    pub id: ProductId,
    /// Display name, used only if the product is not in the cart yet.
    pub name: String,
    /// Unit price, used only if the product is not in the cart yet.
    pub unit_price: Price,
}

impl NewItem {
    /// Build an item from raw parts, with the price in cents.
    ///
    /// # Errors
    ///
    /// Returns [`ProductIdError::Empty`] if `id` is blank.
    pub fn new(
        id: &str,
        name: impl Into<String>,
        unit_price_cents: u64,
    ) -> Result<Self, ProductIdError> {
        Ok(Self {
            id: ProductId::parse(id)?,
            name: name.into(),
            unit_price: Price::from_cents(unit_price_cents),
        })
    }
}

/// An ordered collection of line items with a derived total.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from existing lines, checking the cart invariants.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CorruptPersistedState`] if two lines share an id,
    /// a line has a quantity of zero, or the total does not fit in a `u64`.
    pub fn from_items(items: Vec<LineItem>) -> Result<Self, CartError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if item.quantity == 0 {
                return Err(CartError::CorruptPersistedState(format!(
                    "line {} has zero quantity",
                    item.id
                )));
            }
            if !seen.insert(&item.id) {
                return Err(CartError::CorruptPersistedState(format!(
                    "duplicate line for product {}",
                    item.id
                )));
            }
        }
        if checked_total(&items).is_none() {
            return Err(CartError::CorruptPersistedState(format!(
                "cart total exceeds {} cents",
                u64::MAX
            )));
        }
        Ok(Self { items })
    }

    /// Add one unit of a product.
    ///
    /// If the product is already in the cart its quantity goes up by one and
    /// the stored name and price are kept. Otherwise a new line with quantity
    /// 1 is appended.
    ///
    /// # Errors
    ///
    /// - [`CartError::QuantityOverflow`] if the line already holds
    ///   `u32::MAX` units.
    /// - [`CartError::TotalOverflow`] if the new total would not fit in a
    ///   `u64`.
    ///
    /// The cart is left unchanged on error.
    pub fn add_item(&mut self, item: NewItem) -> Result<(), CartError> {
        let total = self.total();
        let Some(line) = self.line_mut(&item.id) else {
            total
                .checked_add(item.unit_price)
                .ok_or(CartError::TotalOverflow)?;
            self.items.push(LineItem {
                id: item.id,
                name: item.name,
                unit_price: item.unit_price,
                quantity: 1,
            });
            return Ok(());
        };

        let quantity = line
            .quantity
            .checked_add(1)
            .ok_or(CartError::QuantityOverflow { id: item.id })?;
        total
            .checked_add(line.unit_price)
            .ok_or(CartError::TotalOverflow)?;
        line.quantity = quantity;
        Ok(())
    }

    /// Remove the line for `id`. Returns whether a line was removed.
    pub fn remove_item(&mut self, id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|line| &line.id != id);
        self.items.len() != before
    }

    /// Set the quantity of the line for `id`.
    ///
    /// A quantity of 0 removes the line. An absent id is ignored.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`] if `quantity` is negative or does not
    ///   fit in a `u32`.
    /// - [`CartError::TotalOverflow`] if the new total would not fit in a
    ///   `u64`.
    ///
    /// The cart is left unchanged on error.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: i64) -> Result<(), CartError> {
        let quantity =
            u32::try_from(quantity).map_err(|_| CartError::InvalidQuantity { quantity })?;
        if quantity == 0 {
            self.remove_item(id);
            return Ok(());
        }
        let total = self.total();
        let Some(line) = self.line_mut(id) else {
            return Ok(());
        };

        let rest = line
            .line_total()
            .and_then(|current| total.checked_sub(current))
            .ok_or(CartError::TotalOverflow)?;
        line.unit_price
            .checked_times(quantity)
            .and_then(|updated| rest.checked_add(updated))
            .ok_or(CartError::TotalOverflow)?;
        line.quantity = quantity;
        Ok(())
    }

    /// Sum of `unit_price * quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        // from_items and the mutators reject any state whose sum overflows.
        checked_total(&self.items).unwrap_or(Price::ZERO)
    }

    /// All lines, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// The line for `id`, if present.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|line| &line.id == id)
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn line_mut(&mut self, id: &ProductId) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|line| &line.id == id)
    }
}

fn checked_total(items: &[LineItem]) -> Option<Price> {
    items
        .iter()
        .try_fold(Price::ZERO, |acc, line| acc.checked_add(line.line_total()?))
}
