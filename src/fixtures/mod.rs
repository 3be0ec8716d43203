//! Fixtures
//!
//! YAML catalog fixtures for tests and the demo binary.

use std::{fs, path::PathBuf};

use thiserror::Error;

use crate::{
    catalog::{CatalogError, InMemoryCatalog, ProductCatalog},
    fixtures::catalog::CatalogFixture,
};

pub mod catalog;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// The catalog rejected a product
    #[error("Failed to load product: {0}")]
    Catalog(#[from] CatalogError),
}

/// Fixture loader
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Fixture {
    /// Create a loader with the default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a loader with a custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Load `catalog/<name>.yml` into a fresh in-memory catalog.
    ///
    /// Products are created in file order, so the last one listed is the
    /// newest.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a product
    /// fails validation.
    pub fn load_catalog(&self, name: &str) -> Result<InMemoryCatalog, FixtureError> {
        let file_path = self.base_path.join("catalog").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;

        parse_catalog(&contents)
    }
}

/// Parse catalog YAML into a fresh in-memory catalog.
///
/// # Errors
///
/// Returns an error if the YAML is malformed or if a product fails validation,
/// including prices that do not parse.
pub fn parse_catalog(contents: &str) -> Result<InMemoryCatalog, FixtureError> {
    let fixture: CatalogFixture = serde_norway::from_str(contents)?;
    let mut catalog = InMemoryCatalog::new();

    for product in fixture.products {
        catalog.create_product(product)?;
    }

    Ok(catalog)
}
