//! Pricing
//!
//! Derived cart aggregates.

use rusty_money::{Money, iso::Currency};

use crate::{items::LineItem, prices::Price};

/// Sum of quantities across all line items.
pub fn total_item_count(items: &[LineItem]) -> u64 {
    items
        .iter()
        .map(|item| u64::from(item.quantity().get()))
        .sum()
}

/// Sum of `unit_price * quantity` across all line items.
///
/// Returns zero in `currency` for an empty slice. Items are expected to share
/// `currency`; the cart rejects anything else on insertion.
pub fn total_price(items: &[LineItem], currency: &'static Currency) -> Price {
    let minor_units = items
        .iter()
        .map(|item| item.line_total().to_minor_units())
        .fold(0_i64, i64::saturating_add);

    Money::from_minor(minor_units, currency)
}
