//! Cart
//!
//! The shopping cart of a single storefront session. The cart is an
//! explicitly owned value: whoever mutates it holds `&mut Cart`, and every
//! surface that needs to react to changes subscribes an observer.

use std::num::NonZeroU32;

use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    items::{LineItem, NewLineItem},
    prices::{Price, store_currency},
    pricing::{total_item_count, total_price},
    products::ProductId,
};

mod observer;
mod snapshot;

pub use observer::{CartObserver, SubscriptionKey};
pub use snapshot::CartSnapshot;

use observer::Observers;

/// Errors raised when a candidate line item is rejected.
///
/// A rejected candidate leaves the cart untouched.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// The product id was blank.
    #[error("product id cannot be empty")]
    EmptyId,

    /// The unit or reference price was negative.
    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),

    /// The price is in a different currency from the cart (product, price currency, cart currency).
    #[error("product {0} is priced in {1}, but the cart is in {2}")]
    CurrencyMismatch(ProductId, &'static str, &'static str),
}

/// Shopping cart
#[derive(Debug)]
pub struct Cart {
    items: Vec<LineItem>,
    currency: &'static Currency,
    observers: Observers,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new(store_currency())
    }
}

impl Cart {
    /// Create an empty cart in the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            items: Vec::new(),
            currency,
            observers: Observers::default(),
        }
    }

    /// Add one unit of a product.
    ///
    /// If the product is already in the cart its quantity goes up by one and
    /// everything else stays as first added; a different name or price on a
    /// later call is ignored. Otherwise a new line item with quantity one is
    /// appended.
    ///
    /// # Errors
    ///
    /// - [`CartError::EmptyId`]: the candidate's id is blank.
    /// - [`CartError::NegativePrice`]: the unit or reference price is negative.
    /// - [`CartError::CurrencyMismatch`]: a price is not in the cart currency.
    pub fn add_item(&mut self, candidate: NewLineItem) -> Result<(), CartError> {
        if let Err(err) = self.check(&candidate) {
            warn!(product = %candidate.id, error = %err, "rejected cart item");

            return Err(err);
        }

        if let Some(item) = self.find_mut(candidate.id.as_str()) {
            item.increment();

            debug!(product = %candidate.id, quantity = item.quantity().get(), "incremented cart item");
        } else {
            debug!(product = %candidate.id, "added cart item");

            self.items.push(LineItem::from_new(candidate));
        }

        self.publish();

        Ok(())
    }

    /// Set the quantity of a line item.
    ///
    /// A quantity of zero or less removes the line. Unknown ids are ignored.
    /// Quantities beyond `u32::MAX` are clamped.
    pub fn update_quantity(&mut self, id: &str, new_quantity: i64) {
        let Some(position) = self.position(id) else {
            debug!(product = id, "ignored quantity update for unknown item");
            return;
        };

        let Some(quantity) = NonZeroU32::new(u32::try_from(new_quantity.max(0)).unwrap_or(u32::MAX))
        else {
            self.items.remove(position);

            debug!(product = id, "removed cart item at zero quantity");

            self.publish();
            return;
        };

        let Some(item) = self.items.get_mut(position) else {
            return;
        };

        if item.quantity() == quantity {
            return;
        }

        item.set_quantity(quantity);

        debug!(product = id, quantity = quantity.get(), "updated cart item quantity");

        self.publish();
    }

    /// Add one to a line item's quantity. Unknown ids are ignored.
    pub fn increment(&mut self, id: &str) {
        if let Some(quantity) = self.get(id).map(|item| i64::from(item.quantity().get())) {
            self.update_quantity(id, quantity + 1);
        }
    }

    /// Take one from a line item's quantity, removing it at zero. Unknown ids
    /// are ignored.
    pub fn decrement(&mut self, id: &str) {
        if let Some(quantity) = self.get(id).map(|item| i64::from(item.quantity().get())) {
            self.update_quantity(id, quantity - 1);
        }
    }

    /// Remove a line item, returning it if it was present.
    pub fn remove_item(&mut self, id: &str) -> Option<LineItem> {
        let position = self.position(id)?;
        let removed = self.items.remove(position);

        debug!(product = id, "removed cart item");

        self.publish();

        Some(removed)
    }

    /// Remove every line item.
    pub fn clear(&mut self) {
        if self.items.is_empty() {
            return;
        }

        self.items.clear();

        debug!("cleared cart");

        self.publish();
    }

    /// Current items and derived totals.
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot::new(self.items.clone(), self.currency)
    }

    /// Register an observer, called after every change to the cart.
    ///
    /// Observers run in the order they subscribed.
    pub fn subscribe(&mut self, observer: impl CartObserver + 'static) -> SubscriptionKey {
        self.observers.insert(Box::new(observer))
    }

    /// Remove an observer. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&mut self, key: SubscriptionKey) -> bool {
        self.observers.remove(key)
    }

    /// Number of subscribed observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Look up a line item by product id.
    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id().as_str() == id)
    }

    /// Iterate over the line items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &LineItem> {
        self.items.iter()
    }

    /// Number of distinct line items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all quantities.
    pub fn total_item_count(&self) -> u64 {
        total_item_count(&self.items)
    }

    /// Sum of `unit_price * quantity` over all items.
    pub fn total_price(&self) -> Price {
        total_price(&self.items, self.currency)
    }

    /// The cart currency.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    fn check(&self, candidate: &NewLineItem) -> Result<(), CartError> {
        if candidate.id.is_empty() {
            return Err(CartError::EmptyId);
        }

        let prices = std::iter::once(&candidate.unit_price).chain(&candidate.original_unit_price);

        for price in prices {
            if price.currency() != self.currency {
                return Err(CartError::CurrencyMismatch(
                    candidate.id.clone(),
                    price.currency().iso_alpha_code,
                    self.currency.iso_alpha_code,
                ));
            }

            if price.to_minor_units() < 0 {
                return Err(CartError::NegativePrice(candidate.id.clone()));
            }
        }

        Ok(())
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id().as_str() == id)
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| item.id().as_str() == id)
    }

    fn publish(&mut self) {
        if self.observers.is_empty() {
            return;
        }

        let snapshot = self.snapshot();

        debug!(
            items = snapshot.items().len(),
            total_item_count = snapshot.total_item_count(),
            "publishing cart snapshot"
        );

        self.observers.notify(&snapshot);
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
