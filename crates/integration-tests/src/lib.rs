//! Integration tests for the Kangaroo Wear cart engine.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p kangaroo-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_session` - Cart lifecycle through a session
//! - `shared_cart` - Share links and imports
//! - `cross_tab` - Several sessions over one store
//! - `checkout` - Order text and WhatsApp links
//! - `degraded_storage` - Sessions without working storage
//!
//! This library holds the fixtures the tests share.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use kangaroo_storefront::coupons::CouponRegistry;
use kangaroo_storefront::storage::{CartStorage, KeyValueStore};
use kangaroo_storefront::{CartSession, Catalog, PricingConfig};
use uuid::Uuid;

/// Catalog and coupons shared by every session in a test, like one store
/// loaded into several tabs.
#[derive(Debug, Clone)]
pub struct Storefront {
    pub catalog: Arc<Catalog>,
    pub coupons: Arc<CouponRegistry>,
    pub pricing: PricingConfig,
}

impl Storefront {
    /// The bundled catalog and coupons with default pricing.
    ///
    /// # Panics
    ///
    /// Panics if the bundled data is invalid.
    #[must_use]
    pub fn bundled() -> Self {
        Self {
            catalog: Arc::new(Catalog::bundled().expect("bundled catalog is valid")),
            coupons: Arc::new(CouponRegistry::bundled().expect("bundled coupons are valid")),
            pricing: PricingConfig::default(),
        }
    }

    /// Open a session over `store`.
    #[must_use]
    pub fn session(&self, store: impl KeyValueStore + 'static) -> CartSession {
        CartSession::open(
            Arc::clone(&self.catalog),
            Arc::clone(&self.coupons),
            self.pricing,
            CartStorage::new(store),
        )
    }
}

/// A fresh directory under the system temp dir, removed on drop.
#[derive(Debug)]
pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    /// # Panics
    ///
    /// Panics if the directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!("kangaroo-it-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&path).expect("create temp dir");
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for TempDir {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}
