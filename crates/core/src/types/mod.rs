//! Core types for the Kangaroo Wear cart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod coupon_code;
pub mod id;
pub mod price;
pub mod quantity;

pub use coupon_code::{CouponCode, CouponCodeError};
pub use id::*;
pub use price::{Price, PriceError};
pub use quantity::{Quantity, QuantityError, QuantityInput};
