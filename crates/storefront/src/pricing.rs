//! Cart totals.
//!
//! Totals are never stored. They are recomputed from the cart, the catalog
//! and the coupon registry on every call, so they cannot go stale.

use core::num::NonZeroU32;

use kangaroo_core::{CouponCode, Price};

use crate::cart::{Cart, LineItem};
use crate::catalog::Catalog;
use crate::coupons::{AppliedCoupon, CouponError, CouponRegistry, check_eligibility};

/// Shipping and installment rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingConfig {
    /// Subtotals at or above this ship free.
    pub free_shipping_threshold: Price,
    /// Flat fee charged below the threshold.
    pub shipping_fee: Price,
    /// Number of interest-free installments the total is split into.
    pub installments: NonZeroU32,
}

impl PricingConfig {
    pub const DEFAULT_INSTALLMENTS: NonZeroU32 = NonZeroU32::MIN.saturating_add(5);
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            free_shipping_threshold: Price::from_cents(25_000),
            shipping_fee: Price::from_cents(2_500),
            installments: Self::DEFAULT_INSTALLMENTS,
        }
    }
}

/// What the applied coupon contributes to the totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CouponEffect {
    /// No coupon is applied.
    None,
    /// The coupon is applied and eligible.
    Active(AppliedCoupon),
    /// The coupon is still applied but the cart no longer qualifies (e.g. the
    /// qualifying item was removed). It discounts nothing until the cart
    /// qualifies again.
    Suspended { code: CouponCode, reason: CouponError },
}

/// Derived money figures for a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Totals {
    pub subtotal: Price,
    pub shipping: Price,
    pub discount: Price,
    pub total: Price,
    /// `total` split into equal installments.
    pub installment_value: Price,
    pub coupon: CouponEffect,
}

impl Totals {
    /// Whether shipping is free on a non-empty cart (shown as "GRÁTIS").
    #[must_use]
    pub fn has_free_shipping(&self) -> bool {
        self.shipping.is_zero() && !self.subtotal.is_zero()
    }

    /// The coupon currently discounting the cart, if any.
    #[must_use]
    pub const fn active_coupon(&self) -> Option<&AppliedCoupon> {
        match &self.coupon {
            CouponEffect::Active(coupon) => Some(coupon),
            CouponEffect::None | CouponEffect::Suspended { .. } => None,
        }
    }
}

/// Shipping for a given subtotal: free for empty carts and at or above the threshold.
#[must_use]
pub fn shipping_for(subtotal: Price, config: &PricingConfig) -> Price {
    if subtotal.is_zero() || subtotal >= config.free_shipping_threshold {
        Price::ZERO
    } else {
        config.shipping_fee
    }
}

/// Resolve the applied coupon against the live registry and cart contents.
#[must_use]
pub fn coupon_effect(cart: &Cart, catalog: &Catalog, registry: &CouponRegistry) -> CouponEffect {
    let Some(code) = cart.applied_coupon() else {
        return CouponEffect::None;
    };
    let Some(coupon) = registry.find(code) else {
        return CouponEffect::Suspended {
            code: code.clone(),
            reason: CouponError::NotFound(code.to_string()),
        };
    };
    match check_eligibility(coupon, cart, catalog) {
        Ok(()) => CouponEffect::Active(AppliedCoupon::from(coupon)),
        Err(reason) => CouponEffect::Suspended {
            code: code.clone(),
            reason,
        },
    }
}

/// Compute subtotal, shipping, discount, total and installment value.
///
/// Coupon eligibility is re-checked here, not only when the coupon was applied.
#[must_use]
pub fn compute_totals(
    cart: &Cart,
    catalog: &Catalog,
    registry: &CouponRegistry,
    config: &PricingConfig,
) -> Totals {
    let subtotal: Price = cart.items().iter().map(LineItem::line_total).sum();
    let shipping = shipping_for(subtotal, config);
    let coupon = coupon_effect(cart, catalog, registry);
    let discount = match &coupon {
        CouponEffect::Active(applied) => subtotal.portion(applied.discount_percent).round_cents(),
        CouponEffect::None | CouponEffect::Suspended { .. } => Price::ZERO,
    };
    let total = (subtotal + shipping).saturating_sub(discount);
    let installment_value = total.split(config.installments);

    Totals {
        subtotal,
        shipping,
        discount,
        total,
        installment_value,
        coupon,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use kangaroo_core::{ProductId, Quantity};
    use rust_decimal::Decimal;

    use super::*;
    use crate::cart::CustomItemSpec;
    use crate::catalog::Product;
    use crate::coupons::apply_coupon;

    fn price(units: i64, scale: u32) -> Price {
        Price::new(Decimal::new(units, scale)).unwrap()
    }

    fn product(id: &str, collection: &str, amount: Price) -> Product {
        Product {
            id: ProductId::new(id),
            name: id.to_owned(),
            image: format!("{id}.png"),
            price: amount,
            collection: collection.to_owned(),
            colors: vec!["Preto".to_owned()],
            sizes: vec!["M".to_owned()],
            coupon: None,
        }
    }

    fn custom(amount: Price) -> CustomItemSpec {
        CustomItemSpec {
            name: "Camisa Exclusiva (Customizada)".to_owned(),
            image: String::new(),
            price: amount,
            color: "Preto".to_owned(),
            size: "M".to_owned(),
            description: String::new(),
        }
    }

    fn totals(cart: &Cart, catalog: &Catalog) -> Totals {
        compute_totals(
            cart,
            catalog,
            &CouponRegistry::bundled().unwrap(),
            &PricingConfig::default(),
        )
    }

    #[test]
    fn test_shipping_threshold() {
        let config = PricingConfig::default();
        assert_eq!(shipping_for(price(24_999, 2), &config), price(25, 0));
        assert_eq!(shipping_for(price(250, 0), &config), Price::ZERO);
        assert_eq!(shipping_for(Price::ZERO, &config), Price::ZERO);
    }

    #[test]
    fn test_empty_cart_totals() {
        let totals = totals(&Cart::new(), &Catalog::default());
        assert_eq!(totals.total, Price::ZERO);
        assert_eq!(totals.installment_value, Price::ZERO);
        assert!(!totals.has_free_shipping());
        assert_eq!(totals.coupon, CouponEffect::None);
    }

    #[test]
    fn test_discount_example() {
        let catalog = Catalog::new(vec![product("x", "Basicas", price(100, 0))]).unwrap();
        let mut cart = Cart::new();
        cart.add_catalog_item(&catalog, &ProductId::new("x"), "Preto", "M", Quantity::new(3).unwrap());
        apply_coupon("KANGAR10", &mut cart, &catalog, &CouponRegistry::bundled().unwrap()).unwrap();

        let totals = totals(&cart, &catalog);
        assert_eq!(totals.subtotal, price(300, 0));
        assert_eq!(totals.discount, price(30, 0));
        assert_eq!(totals.shipping, Price::ZERO);
        assert_eq!(totals.total, price(270, 0));
        assert_eq!(totals.installment_value, price(45, 0));
        assert!(totals.has_free_shipping());
    }

    #[test]
    fn test_below_threshold_pays_shipping() {
        let catalog = Catalog::new(vec![product("x", "Basicas", price(24_999, 2))]).unwrap();
        let mut cart = Cart::new();
        cart.add_catalog_item(&catalog, &ProductId::new("x"), "Preto", "M", Quantity::ONE);

        let totals = totals(&cart, &catalog);
        assert_eq!(totals.shipping, price(25, 0));
        assert_eq!(totals.total, price(27_499, 2));
    }

    #[test]
    fn test_threshold_uses_pre_discount_subtotal() {
        let catalog = Catalog::new(vec![product("x", "Basicas", price(260, 0))]).unwrap();
        let mut cart = Cart::new();
        cart.add_catalog_item(&catalog, &ProductId::new("x"), "Preto", "M", Quantity::ONE);
        apply_coupon("KANGAR10", &mut cart, &catalog, &CouponRegistry::bundled().unwrap()).unwrap();

        let totals = totals(&cart, &catalog);
        assert_eq!(totals.shipping, Price::ZERO);
        assert_eq!(totals.total, price(234, 0));
    }

    #[test]
    fn test_coupon_suspended_when_qualifying_item_removed() {
        let catalog = Catalog::bundled().unwrap();
        let registry = CouponRegistry::bundled().unwrap();
        let naruto = ProductId::new("camisa-naruto");
        let mut cart = Cart::new();
        let crate::cart::AddOutcome::Added(line) =
            cart.add_catalog_item(&catalog, &naruto, "Preto", "M", Quantity::ONE)
        else {
            panic!("expected a new line");
        };
        cart.add_custom_item(custom(price(205, 0)));
        apply_coupon("NARUTO12", &mut cart, &catalog, &registry).unwrap();
        assert!(totals(&cart, &catalog).active_coupon().is_some());

        cart.remove_item(&line);
        let suspended = totals(&cart, &catalog);
        assert_eq!(suspended.discount, Price::ZERO);
        assert!(matches!(
            suspended.coupon,
            CouponEffect::Suspended { reason: CouponError::CollectionMismatch(_), .. }
        ));
        // Still applied; it resumes once the cart qualifies again.
        assert!(cart.applied_coupon().is_some());

        cart.add_catalog_item(&catalog, &naruto, "Preto", "M", Quantity::ONE);
        assert!(totals(&cart, &catalog).discount > Price::ZERO);
    }

    #[test]
    fn test_coupon_missing_from_registry_is_suspended() {
        let catalog = Catalog::bundled().unwrap();
        let mut cart = Cart::new();
        cart.add_custom_item(custom(price(100, 0)));
        cart.set_applied_coupon(Some(CouponCode::parse("RETIRADO").unwrap()));

        let totals = totals(&cart, &catalog);
        assert_eq!(totals.discount, Price::ZERO);
        assert!(matches!(totals.coupon, CouponEffect::Suspended { .. }));
    }

    #[test]
    fn test_discount_rounds_to_cents() {
        let catalog = Catalog::new(vec![product("x", "Basicas", price(9_999, 2))]).unwrap();
        let mut cart = Cart::new();
        cart.add_catalog_item(&catalog, &ProductId::new("x"), "Preto", "M", Quantity::ONE);
        apply_coupon("PRIMEIRA", &mut cart, &catalog, &CouponRegistry::bundled().unwrap()).unwrap();

        // 99.99 * 0.20 = 19.998; 99.99 + 25.00 - 20.00
        let totals = totals(&cart, &catalog);
        assert_eq!(totals.discount, price(2_000, 2));
        assert_eq!(totals.total, price(10_499, 2));
    }
}
