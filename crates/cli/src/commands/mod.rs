//! Subcommand implementations.
//!
//! Each command works on an open [`kangaroo_storefront::CartSession`] and
//! prints its result to stdout.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod coupon;
pub mod share;
