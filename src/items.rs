//! Items

use std::num::NonZeroU32;

use rusty_money::Money;

use crate::{
    prices::Price,
    products::{Category, ProductId},
};

/// A product about to be added to the cart.
#[derive(Clone, Debug, PartialEq)]
pub struct NewLineItem {
    /// Product id; becomes the line item's key
    pub id: ProductId,

    /// Display name
    pub name: String,

    /// Price of a single unit
    pub unit_price: Price,

    /// Reference price shown struck through; never affects totals
    pub original_unit_price: Option<Price>,

    /// Product category
    pub category: Category,
}

impl NewLineItem {
    /// Creates a new candidate with no reference price.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        unit_price: Price,
        category: Category,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit_price,
            original_unit_price: None,
            category,
        }
    }

    /// Sets the struck-through reference price.
    #[must_use]
    pub fn with_original_price(mut self, original_unit_price: Price) -> Self {
        self.original_unit_price = Some(original_unit_price);
        self
    }
}

/// One product-and-quantity pair held in the cart.
#[derive(Clone, Debug, PartialEq)]
pub struct LineItem {
    id: ProductId,
    name: String,
    unit_price: Price,
    original_unit_price: Option<Price>,
    category: Category,
    quantity: NonZeroU32,
}

impl LineItem {
    pub(crate) fn from_new(item: NewLineItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            unit_price: item.unit_price,
            original_unit_price: item.original_unit_price,
            category: item.category,
            quantity: NonZeroU32::MIN,
        }
    }

    /// Returns the product id
    pub fn id(&self) -> &ProductId {
        &self.id
    }

    /// Returns the display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the unit price
    pub fn unit_price(&self) -> &Price {
        &self.unit_price
    }

    /// Returns the struck-through reference price, if any
    pub fn original_unit_price(&self) -> Option<&Price> {
        self.original_unit_price.as_ref()
    }

    /// Returns the category
    pub fn category(&self) -> Category {
        self.category
    }

    /// Returns the quantity; always at least one
    pub fn quantity(&self) -> NonZeroU32 {
        self.quantity
    }

    /// Unit price multiplied by quantity.
    pub fn line_total(&self) -> Price {
        Money::from_minor(
            self.unit_price
                .to_minor_units()
                .saturating_mul(i64::from(self.quantity.get())),
            self.unit_price.currency(),
        )
    }

    pub(crate) fn increment(&mut self) {
        self.quantity = self.quantity.saturating_add(1);
    }

    pub(crate) fn set_quantity(&mut self, quantity: NonZeroU32) {
        self.quantity = quantity;
    }
}
