//! Catalog
//!
//! The product catalog lives in the hosted backend. [`ProductCatalog`] is the
//! seam the storefront talks to; [`InMemoryCatalog`] backs tests and the demo.

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::products::{Category, NewProduct, Product, ProductError, ProductId};

/// Errors surfaced by a catalog store.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// The new product failed validation.
    #[error(transparent)]
    Invalid(#[from] ProductError),

    /// No product has the given id.
    #[error("product {0} not found")]
    NotFound(ProductId),
}

/// Product catalog store.
pub trait ProductCatalog {
    /// Products in a category, newest first.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the store cannot be read.
    fn list_products(&self, category: Category) -> Result<Vec<Product>, CatalogError>;

    /// Validate and store a new product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Invalid`] if validation fails.
    fn create_product(&mut self, product: NewProduct) -> Result<Product, CatalogError>;

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no product has the id.
    fn delete_product(&mut self, id: &ProductId) -> Result<(), CatalogError>;
}

/// Catalog kept in memory.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: FxHashMap<ProductId, Product>,
    next_sequence: u64,
}

impl InMemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a product by id.
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.get(id)
    }

    /// Number of products across all categories.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl ProductCatalog for InMemoryCatalog {
    fn list_products(&self, category: Category) -> Result<Vec<Product>, CatalogError> {
        let mut products: Vec<Product> = self
            .products
            .values()
            .filter(|product| product.category == category)
            .cloned()
            .collect();

        products.sort_by(|a, b| b.sequence.cmp(&a.sequence));

        debug!(%category, count = products.len(), "listed products");

        Ok(products)
    }

    fn create_product(&mut self, product: NewProduct) -> Result<Product, CatalogError> {
        let product = product.validate()?;

        self.next_sequence += 1;

        let created = Product {
            id: ProductId::new(Uuid::now_v7().to_string()),
            name: product.name,
            description: product.description,
            price: product.price,
            category: product.category,
            original_price: product.original_price,
            discount_percentage: product.discount_percentage,
            sequence: self.next_sequence,
        };

        info!(product = %created.id, category = %created.category, "created product");

        self.products.insert(created.id.clone(), created.clone());

        Ok(created)
    }

    fn delete_product(&mut self, id: &ProductId) -> Result<(), CatalogError> {
        if self.products.remove(id).is_none() {
            return Err(CatalogError::NotFound(id.clone()));
        }

        info!(product = %id, "deleted product");

        Ok(())
    }
}
