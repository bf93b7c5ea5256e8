//! Coupon commands.

use kangaroo_storefront::coupons::CouponOutcome;
use kangaroo_storefront::{CartSession, Result};

use super::cart;

/// Apply a coupon code and show the updated totals.
///
/// # Errors
///
/// Returns an error when the code is unknown or the cart does not qualify.
/// The previously applied coupon is removed either way.
#[allow(clippy::print_stdout)]
pub fn apply(session: &mut CartSession, code: &str) -> Result<()> {
    match session.apply_coupon(code)? {
        CouponOutcome::Applied(coupon) => {
            println!("Cupom {} aplicado: {}", coupon.code, coupon.description);
        }
        CouponOutcome::Removed(code) => println!("Cupom {code} removido"),
        CouponOutcome::NothingToDo => println!("Nenhum cupom aplicado"),
    }
    cart::show(session);
    Ok(())
}

/// Remove the applied coupon, if any.
#[allow(clippy::print_stdout)]
pub fn remove(session: &mut CartSession) {
    // An empty code never fails.
    if let Ok(CouponOutcome::Removed(code)) = session.apply_coupon("") {
        println!("Cupom {code} removido");
    } else {
        println!("Nenhum cupom aplicado");
    }
}

/// List published coupons.
#[allow(clippy::print_stdout)]
pub fn list(session: &CartSession) {
    for coupon in session.coupons().coupons() {
        println!(
            "{} - {}% - {}",
            coupon.code,
            coupon.percent_label(),
            coupon.description
        );
        if let Some(collection) = &coupon.target_collection {
            println!("    apenas com itens da coleção {collection}");
        }
    }
}
