//! Kangaroo Wear storefront cart engine.
//!
//! The cart, its pricing and coupon rules, persistence to a key-value store,
//! shared-cart links and the WhatsApp checkout handoff. [`CartSession`] ties
//! them together; the other modules can be used on their own.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod coupons;
pub mod custom_item;
pub mod error;
pub mod pricing;
pub mod session;
pub mod share;
pub mod storage;

pub use cart::{AddOutcome, Cart, LineItem, QuantityOutcome, RemoveOutcome};
pub use catalog::{Catalog, Product};
pub use config::StorefrontConfig;
pub use error::{Result, StorefrontError};
pub use pricing::{CouponEffect, PricingConfig, Totals};
pub use session::CartSession;
