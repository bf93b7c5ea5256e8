//! Coupon application rules.

use kangaroo_core::CouponCode;
use rust_decimal::Decimal;
use thiserror::Error;

use super::{CouponDefinition, CouponRegistry};
use crate::cart::Cart;
use crate::catalog::Catalog;

/// Why a coupon code was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CouponError {
    /// No coupon with this code exists.
    #[error("Unknown coupon code: {0}")]
    NotFound(String),

    /// The coupon only applies when the cart holds a catalog item from this collection.
    #[error("Coupon only valid with an item from the {0} collection")]
    CollectionMismatch(String),
}

/// A coupon that was accepted for the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedCoupon {
    pub code: CouponCode,
    pub discount_percent: Decimal,
    pub description: String,
}

impl From<&CouponDefinition> for AppliedCoupon {
    fn from(coupon: &CouponDefinition) -> Self {
        Self {
            code: coupon.code.clone(),
            discount_percent: coupon.discount_percent,
            description: coupon.description.clone(),
        }
    }
}

/// Successful results of [`apply_coupon`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CouponOutcome {
    /// The coupon now applies.
    Applied(AppliedCoupon),
    /// An empty code was submitted while this coupon was applied; it was removed.
    Removed(CouponCode),
    /// An empty code was submitted and no coupon was applied.
    NothingToDo,
}

/// Check whether `coupon` may discount `cart` right now.
///
/// Only the collection restriction is evaluated. `valid_until` and
/// `is_new_customer_only` have no trustworthy signal on the client and are
/// deliberately left to a server-side check.
///
/// # Errors
///
/// Returns [`CouponError::CollectionMismatch`] when the coupon targets a
/// collection and no catalog line belongs to it.
pub fn check_eligibility(
    coupon: &CouponDefinition,
    cart: &Cart,
    catalog: &Catalog,
) -> Result<(), CouponError> {
    match &coupon.target_collection {
        Some(collection) if !cart.has_catalog_item_in(catalog, collection) => {
            Err(CouponError::CollectionMismatch(collection.clone()))
        }
        _ => Ok(()),
    }
}

/// Apply a raw coupon code typed by the customer.
///
/// The previously applied coupon is dropped before the new code is checked,
/// so a rejected code leaves the cart with no coupon at all. Submitting an
/// empty code removes the current coupon.
///
/// # Errors
///
/// Returns [`CouponError::NotFound`] for unknown codes and
/// [`CouponError::CollectionMismatch`] when a collection restriction is not met.
pub fn apply_coupon(
    raw_code: &str,
    cart: &mut Cart,
    catalog: &Catalog,
    registry: &CouponRegistry,
) -> Result<CouponOutcome, CouponError> {
    let normalized = raw_code.trim().to_uppercase();
    if normalized.is_empty() {
        return Ok(cart
            .take_applied_coupon()
            .map_or(CouponOutcome::NothingToDo, CouponOutcome::Removed));
    }

    cart.set_applied_coupon(None);

    let coupon = CouponCode::parse(&normalized)
        .ok()
        .and_then(|code| registry.find(&code))
        .ok_or_else(|| CouponError::NotFound(normalized.clone()))?;

    check_eligibility(coupon, cart, catalog)?;

    cart.set_applied_coupon(Some(coupon.code.clone()));
    Ok(CouponOutcome::Applied(AppliedCoupon::from(coupon)))
}
