//! Cart Snapshot

use rusty_money::iso::Currency;

use crate::{
    items::LineItem,
    prices::Price,
    pricing::{total_item_count, total_price},
};

/// Immutable read of the cart's items and derived totals at a point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct CartSnapshot {
    /// Line items in insertion order
    items: Vec<LineItem>,

    /// Sum of all quantities
    total_item_count: u64,

    /// Sum of all line totals
    total_price: Price,
}

impl CartSnapshot {
    pub(crate) fn new(items: Vec<LineItem>, currency: &'static Currency) -> Self {
        let total_item_count = total_item_count(&items);
        let total_price = total_price(&items, currency);

        Self {
            items,
            total_item_count,
            total_price,
        }
    }

    #[cfg(test)]
    pub(crate) fn empty(currency: &'static Currency) -> Self {
        Self::new(Vec::new(), currency)
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Look up a line item by product id.
    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id().as_str() == id)
    }

    /// Sum of all quantities.
    pub fn total_item_count(&self) -> u64 {
        self.total_item_count
    }

    /// Sum of `unit_price * quantity` over all items.
    pub fn total_price(&self) -> Price {
        self.total_price
    }

    /// Whether the cart held no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
