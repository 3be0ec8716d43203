//! Catalog Fixtures

use serde::Deserialize;

use crate::products::NewProduct;

/// Wrapper for catalog products in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Products, oldest first
    pub products: Vec<NewProduct>,
}
