//! Unified error handling.
//!
//! Each concern has its own error enum; [`StorefrontError`] collects them for
//! callers (like the CLI) that drive several concerns at once.

use kangaroo_core::{CouponCodeError, PriceError, QuantityError};
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::coupons::{CouponError, CouponRegistryError};
use crate::custom_item::CustomItemError;
use crate::share::{ExportError, ImportError};
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum StorefrontError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Coupon registry error: {0}")]
    CouponRegistry(#[from] CouponRegistryError),

    /// A coupon code was refused.
    #[error("{0}")]
    Coupon(#[from] CouponError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Shared cart rejected: {0}")]
    Import(#[from] ImportError),

    #[error("Cannot share cart: {0}")]
    Export(#[from] ExportError),

    #[error("Cannot check out: {0}")]
    Checkout(#[from] CheckoutError),

    #[error("{0}")]
    CustomItem(#[from] CustomItemError),

    #[error("Invalid price: {0}")]
    Price(#[from] PriceError),

    #[error("Invalid quantity: {0}")]
    Quantity(#[from] QuantityError),

    #[error("Invalid coupon code: {0}")]
    CouponCode(#[from] CouponCodeError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;
