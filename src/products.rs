//! Products

use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    items::NewLineItem,
    prices::{Price, PriceError, parse_price},
};

/// Maximum length of a product name, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length of a product description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Maximum length of a product's price text, in characters.
pub const MAX_PRICE_LEN: usize = 50;

/// Errors raised when validating a new product.
#[derive(Debug, Error, PartialEq)]
pub enum ProductError {
    /// The name was blank.
    #[error("name is required")]
    NameRequired,

    /// The name exceeded [`MAX_NAME_LEN`].
    #[error("name must be at most {MAX_NAME_LEN} characters")]
    NameTooLong,

    /// The description was blank.
    #[error("description is required")]
    DescriptionRequired,

    /// The description exceeded [`MAX_DESCRIPTION_LEN`].
    #[error("description must be at most {MAX_DESCRIPTION_LEN} characters")]
    DescriptionTooLong,

    /// The price was blank.
    #[error("price is required")]
    PriceRequired,

    /// The price text exceeded [`MAX_PRICE_LEN`].
    #[error("price must be at most {MAX_PRICE_LEN} characters")]
    PriceTooLong,

    /// The price or original price text is not a valid amount.
    #[error("invalid price: {0}")]
    InvalidPrice(#[source] PriceError),

    /// The discount percentage was above 100.
    #[error("discount percentage must be between 0 and 100, got {0}")]
    DiscountOutOfRange(u8),
}

/// Product identifier, as issued by the catalog store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Wrap an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is blank.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for ProductId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Coarse product classification, used for grouping and styling only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Fresh fruit.
    #[serde(rename = "fruits")]
    Fruit,

    /// Vegetables.
    #[serde(rename = "vegetables")]
    Vegetable,

    /// Everything else the shop sells.
    #[serde(rename = "others")]
    Other,

    /// Discounted products.
    #[serde(rename = "offers")]
    Offer,
}

impl Category {
    /// All categories, in storefront menu order.
    pub const ALL: [Category; 4] = [
        Category::Fruit,
        Category::Vegetable,
        Category::Other,
        Category::Offer,
    ];

    /// Key used by the catalog store.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Fruit => "fruits",
            Category::Vegetable => "vegetables",
            Category::Other => "others",
            Category::Offer => "offers",
        }
    }

    /// Page title shown to shoppers.
    pub fn label(self) -> &'static str {
        match self {
            Category::Fruit => "Frutas Frescas",
            Category::Vegetable => "Verduras",
            Category::Other => "Otros Productos",
            Category::Offer => "Ofertas Especiales",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog product, as listed on a category page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product id
    pub id: ProductId,

    /// Display name
    pub name: String,

    /// Short description
    pub description: String,

    /// Price as display text
    pub price: String,

    /// Category the product is listed under
    pub category: Category,

    /// Pre-discount price as display text, for offers
    #[serde(default)]
    pub original_price: Option<String>,

    /// Advertised discount, in percent
    #[serde(default)]
    pub discount_percentage: Option<u8>,

    /// Insertion order within the store; higher is newer
    pub sequence: u64,
}

impl Product {
    /// Parse the listed price.
    ///
    /// # Errors
    ///
    /// Returns a [`PriceError`] if the price text is not a valid amount.
    pub fn unit_price(&self) -> Result<Price, PriceError> {
        parse_price(&self.price)
    }

    /// Parse the pre-discount price, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`PriceError`] if the original price text is not a valid amount.
    pub fn original_unit_price(&self) -> Result<Option<Price>, PriceError> {
        self.original_price.as_deref().map(parse_price).transpose()
    }

    /// How much a shopper saves against the original price, when positive.
    ///
    /// # Errors
    ///
    /// Returns a [`PriceError`] if either price text is not a valid amount.
    pub fn savings(&self) -> Result<Option<Price>, PriceError> {
        let Some(original) = self.original_unit_price()? else {
            return Ok(None);
        };

        let price = self.unit_price()?;
        let saved = original.to_minor_units() - price.to_minor_units();

        Ok((saved > 0).then(|| Price::from_minor(saved, price.currency())))
    }

    /// Build the cart candidate for this product.
    ///
    /// # Errors
    ///
    /// Returns a [`PriceError`] if either price text is not a valid amount.
    pub fn to_line_item(&self) -> Result<NewLineItem, PriceError> {
        let item = NewLineItem::new(
            self.id.clone(),
            self.name.clone(),
            self.unit_price()?,
            self.category,
        );

        Ok(match self.original_unit_price()? {
            Some(original) => item.with_original_price(original),
            None => item,
        })
    }
}

/// Fields for a product about to be created.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewProduct {
    /// Display name
    pub name: String,

    /// Short description
    pub description: String,

    /// Price as display text
    pub price: String,

    /// Category to list the product under
    pub category: Category,

    /// Pre-discount price as display text
    #[serde(default)]
    pub original_price: Option<String>,

    /// Advertised discount, in percent
    #[serde(default)]
    pub discount_percentage: Option<u8>,
}

impl NewProduct {
    /// Create a new product with no discount information.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            price: price.into(),
            category,
            original_price: None,
            discount_percentage: None,
        }
    }

    /// Attach offer details.
    #[must_use]
    pub fn with_discount(mut self, original_price: impl Into<String>, percentage: u8) -> Self {
        self.original_price = Some(original_price.into());
        self.discount_percentage = Some(percentage);
        self
    }

    /// Trim every text field, check the length limits and parse both prices.
    ///
    /// A blank `original_price` is treated as absent. Prices keep the text as
    /// written once it parses.
    ///
    /// # Errors
    ///
    /// Returns the first [`ProductError`] found, checking name, description,
    /// price, discount and original price in that order.
    pub fn validate(self) -> Result<Self, ProductError> {
        let name = required(
            &self.name,
            MAX_NAME_LEN,
            ProductError::NameRequired,
            ProductError::NameTooLong,
        )?;

        let description = required(
            &self.description,
            MAX_DESCRIPTION_LEN,
            ProductError::DescriptionRequired,
            ProductError::DescriptionTooLong,
        )?;

        let price = required(
            &self.price,
            MAX_PRICE_LEN,
            ProductError::PriceRequired,
            ProductError::PriceTooLong,
        )?;

        parse_price(&price).map_err(ProductError::InvalidPrice)?;

        if let Some(percentage) = self.discount_percentage.filter(|p| *p > 100) {
            return Err(ProductError::DiscountOutOfRange(percentage));
        }

        let original_price = self
            .original_price
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());

        if let Some(original) = &original_price {
            parse_price(original).map_err(ProductError::InvalidPrice)?;
        }

        Ok(Self {
            name,
            description,
            price,
            category: self.category,
            original_price,
            discount_percentage: self.discount_percentage,
        })
    }
}

fn required(
    value: &str,
    max: usize,
    blank: ProductError,
    too_long: ProductError,
) -> Result<String, ProductError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        Err(blank)
    } else if trimmed.chars().count() > max {
        Err(too_long)
    } else {
        Ok(trimmed.to_string())
    }
}
