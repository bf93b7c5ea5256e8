//! Read-only product catalog.
//!
//! The cart only ever reads from the catalog: to snapshot a product's name,
//! image and price when it is added, and to resolve a product's collection
//! when a collection-restricted coupon is checked.

use std::collections::HashSet;
use std::path::Path;

use kangaroo_core::{Price, ProductId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Catalog shipped with the crate, used when no catalog file is configured.
const BUNDLED_CATALOG: &str = include_str!("../data/catalog.json");

/// Errors that can occur when loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The catalog is not a valid JSON product list.
    #[error("Invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two products share an id.
    #[error("Duplicate product id in catalog: {0}")]
    DuplicateProduct(ProductId),
}

/// A product record as published by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub image: String,
    pub price: Price,
    /// Collection tag used by collection-restricted coupons (e.g. "Animes").
    pub collection: String,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    /// Coupon advertised on the product card, display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon: Option<String>,
}

/// An ordered, read-only collection of products.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from a product list.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateProduct`] if two products share an id.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(&product.id) {
                return Err(CatalogError::DuplicateProduct(product.id.clone()));
            }
        }
        Ok(Self { products })
    }

    /// Parse a catalog from a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or contains duplicate ids.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid catalog.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// The catalog bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error only if the bundled data is corrupt.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json_str(BUNDLED_CATALOG)
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// The collection a product belongs to, if the product exists.
    #[must_use]
    pub fn collection_of(&self, id: &ProductId) -> Option<&str> {
        self.get(id).map(|p| p.collection.as_str())
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
