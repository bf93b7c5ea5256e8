//! Kangaroo Core - Shared value types for the Kangaroo Wear cart.
//!
//! This crate provides the small, validated types used across the cart
//! components:
//! - `storefront` - Cart model, pricing, coupons and persistence
//! - `cli` - Command-line driver for a cart session
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no
//! clock. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for identifiers, prices, quantities and coupon codes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
