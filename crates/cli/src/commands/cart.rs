//! Cart commands.

use kangaroo_core::{LineItemId, ProductId, Quantity};
use kangaroo_storefront::cart::{AddOutcome, QuantityOutcome, RemoveOutcome};
use kangaroo_storefront::custom_item::CustomShirtOrder;
use kangaroo_storefront::{CartSession, CouponEffect, Result, StorefrontError};

/// Print every line followed by the totals.
#[allow(clippy::print_stdout)]
pub fn show(session: &CartSession) {
    let cart = session.cart();
    if cart.is_empty() {
        println!("Seu carrinho está vazio.");
        return;
    }

    for item in cart.items() {
        println!(
            "[{}] {} | Tam: {} | Cor: {} | Qtd: {} | {}",
            item.identifier,
            item.name,
            item.size,
            item.color,
            item.quantity,
            item.line_total()
        );
        if let Some(details) = &item.custom_details {
            println!("    {details}");
        }
    }

    let totals = session.totals();
    println!();
    println!("Subtotal: {}", totals.subtotal);
    if totals.has_free_shipping() {
        println!("Frete: GRÁTIS");
    } else {
        println!("Frete: {}", totals.shipping);
    }
    match &totals.coupon {
        CouponEffect::None => {}
        CouponEffect::Active(coupon) => {
            println!("Cupom {}: -{}", coupon.code, totals.discount);
        }
        CouponEffect::Suspended { code, reason } => {
            println!("Cupom {code} sem efeito: {reason}");
        }
    }
    println!("Total: {}", totals.total);
    println!(
        "ou {}x de {} sem juros",
        session.pricing().installments,
        totals.installment_value
    );
}

/// Add a catalog product.
///
/// # Errors
///
/// Returns an error for a zero quantity or an unknown product.
#[allow(clippy::print_stdout)]
pub fn add(
    session: &mut CartSession,
    product: &str,
    color: &str,
    size: &str,
    qty: u32,
) -> Result<()> {
    let quantity = Quantity::new(qty)?;
    match session.add_item(&ProductId::new(product), color, size, quantity) {
        AddOutcome::Added(identifier) => println!("Adicionado: {identifier}"),
        AddOutcome::Merged {
            identifier,
            quantity,
        } => println!("{identifier} agora com {quantity} unidade(s)"),
        AddOutcome::ProductNotFound(id) => {
            return Err(StorefrontError::NotFound(format!("product {id}")));
        }
    }
    show(session);
    Ok(())
}

/// Price and add a custom shirt.
///
/// # Errors
///
/// Returns an error for an unknown option or a blank description.
#[allow(clippy::print_stdout)]
pub fn custom(
    session: &mut CartSession,
    description: String,
    material: &str,
    size: &str,
    color: &str,
    has_reference: bool,
) -> Result<()> {
    let order = CustomShirtOrder {
        description,
        has_reference,
        material: material.parse()?,
        size: size.parse()?,
        color: color.parse()?,
    };
    println!("Valor da camisa: {}", order.price());
    let identifier = session.add_custom_order(order)?;
    println!("Adicionado: {identifier}");
    show(session);
    Ok(())
}

/// Remove a line.
///
/// # Errors
///
/// Returns an error when no line has this identifier.
pub fn remove(session: &mut CartSession, identifier: &str) -> Result<()> {
    match session.remove_item(&LineItemId::new(identifier)) {
        RemoveOutcome::Removed => {
            show(session);
            Ok(())
        }
        RemoveOutcome::NotInCart => Err(StorefrontError::NotFound(format!("line {identifier}"))),
    }
}

/// Set a line's quantity from raw text.
///
/// # Errors
///
/// Returns an error when the text is not a whole number or no line has this
/// identifier.
pub fn set_quantity(session: &mut CartSession, identifier: &str, raw: &str) -> Result<()> {
    match session.set_quantity_input(&LineItemId::new(identifier), raw)? {
        QuantityOutcome::Updated(_) | QuantityOutcome::Removed => {
            show(session);
            Ok(())
        }
        QuantityOutcome::NotInCart => Err(StorefrontError::NotFound(format!("line {identifier}"))),
    }
}

/// Empty the cart.
#[allow(clippy::print_stdout)]
pub fn clear(session: &mut CartSession) {
    session.clear();
    println!("Carrinho esvaziado.");
}
