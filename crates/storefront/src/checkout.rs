//! WhatsApp checkout handoff.
//!
//! Checkout produces a plain-text order summary and a `wa.me` deep link that
//! opens it pre-filled. Nothing is sent from here.

use core::fmt::Write as _;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::Cart;
use crate::pricing::Totals;

const RULE: &str = "--------------------------------";

/// Why an order cannot be sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("Nothing to order: the cart total is zero")]
    NothingToOrder,
}

/// Refuse orders whose total is zero, which covers the empty cart.
///
/// # Errors
///
/// Returns [`CheckoutError::NothingToOrder`] when `totals.total` is zero.
pub fn ensure_orderable(totals: &Totals) -> Result<(), CheckoutError> {
    if totals.total.is_zero() {
        return Err(CheckoutError::NothingToOrder);
    }
    Ok(())
}

/// Customer, payer and delivery fields collected by the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderContact {
    pub customer_name: String,
    /// CPF or CNPJ.
    pub customer_document: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    pub street: String,
    pub number: String,
    pub district: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub payer_name: String,
    pub payer_document: String,
}

impl OrderContact {
    /// Whether the payer is the customer, ignoring case and whitespace.
    #[must_use]
    pub fn payer_is_customer(&self) -> bool {
        normalize(&self.customer_name) == normalize(&self.payer_name)
            && normalize(&self.customer_document) == normalize(&self.payer_document)
    }
}

fn normalize(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Render the order text sent to the store.
///
/// The output depends only on the arguments.
#[must_use]
pub fn order_message(cart: &Cart, totals: &Totals, contact: &OrderContact) -> String {
    let mut msg = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(msg, "Olá, Kangaroo!");
    let _ = writeln!(msg);
    let _ = writeln!(msg, "Sou: {}", contact.customer_name);
    let _ = writeln!(msg, "CPF/CNPJ: {}", contact.customer_document);
    if let Some(birth_date) = contact.birth_date.as_deref().filter(|d| !d.trim().is_empty()) {
        let _ = writeln!(msg, "Nascimento: {birth_date}");
    }
    let _ = writeln!(msg, "{RULE}");

    if !contact.payer_is_customer() {
        let _ = writeln!(msg, "O(a) pagador(a) é:");
        let _ = writeln!(msg, "Nome: {}", contact.payer_name);
        let _ = writeln!(msg, "CPF: {}", contact.payer_document);
        let _ = writeln!(msg, "{RULE}");
    }

    let _ = writeln!(msg, "Em meu Kangaroo Cart, tem:");
    for item in cart.items() {
        let _ = writeln!(
            msg,
            "* {} | Qtd: {} | Tam: {} | Cor: {}",
            item.name, item.quantity, item.size, item.color
        );
        if let Some(details) = item.custom_details.as_deref().filter(|_| item.is_custom()) {
            let _ = writeln!(msg, "   -> (Detalhes: {details})");
        }
    }

    let _ = writeln!(msg, "{RULE}");
    match totals.active_coupon() {
        Some(coupon) => {
            let _ = writeln!(msg, "Cupom: {}", coupon.code);
            let _ = writeln!(msg, "Desconto: {}", totals.discount);
        }
        None => {
            let _ = writeln!(msg, "Cupom: Nenhum");
        }
    }
    if totals.shipping.is_zero() {
        let _ = writeln!(msg, "Frete: GRÁTIS");
    } else {
        let _ = writeln!(msg, "Frete: {}", totals.shipping);
    }
    let _ = writeln!(msg, "Valor do pedido: {}", totals.total);
    let _ = writeln!(msg, "{RULE}");

    let _ = writeln!(msg, "Dados de entrega");
    let _ = writeln!(msg, "Rua: {}", contact.street);
    let _ = writeln!(msg, "Nº: {}", contact.number);
    let _ = writeln!(msg, "Bairro: {}", contact.district);
    let _ = writeln!(msg, "Cidade: {}", contact.city);
    let _ = writeln!(msg, "Estado: {}", contact.state);
    let _ = writeln!(msg, "CEP: {}", contact.postal_code);

    msg
}

/// `https://wa.me/<number>?text=<message>` with the message percent-encoded.
#[must_use]
pub fn whatsapp_link(number: &str, message: &str) -> String {
    format!("https://wa.me/{number}?text={}", urlencoding::encode(message))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use kangaroo_core::{ProductId, Quantity};

    use super::*;
    use crate::catalog::Catalog;
    use crate::coupons::{CouponRegistry, apply_coupon};
    use crate::custom_item::{CustomShirtOrder, Material, ShirtColor, ShirtSize};
    use crate::pricing::{PricingConfig, compute_totals};

    fn contact() -> OrderContact {
        OrderContact {
            customer_name: "Ana Souza".to_owned(),
            customer_document: "123.456.789-00".to_owned(),
            birth_date: None,
            street: "Av. Djalma Batista".to_owned(),
            number: "1200".to_owned(),
            district: "Chapada".to_owned(),
            city: "Manaus".to_owned(),
            state: "AM".to_owned(),
            postal_code: "69050-010".to_owned(),
            payer_name: " ana  souza".to_owned(),
            payer_document: "123.456.789-00 ".to_owned(),
        }
    }

    fn cart_and_totals(coupon: Option<&str>) -> (Cart, Totals) {
        let catalog = Catalog::bundled().unwrap();
        let registry = CouponRegistry::bundled().unwrap();
        let mut cart = Cart::new();
        cart.add_catalog_item(
            &catalog,
            &ProductId::new("camisa-naruto"),
            "Preto",
            "G",
            Quantity::new(2).unwrap(),
        );
        if let Some(code) = coupon {
            apply_coupon(code, &mut cart, &catalog, &registry).unwrap();
        }
        let totals = compute_totals(&cart, &catalog, &registry, &PricingConfig::default());
        (cart, totals)
    }

    #[test]
    fn test_zero_total_is_not_orderable() {
        let catalog = Catalog::bundled().unwrap();
        let registry = CouponRegistry::bundled().unwrap();
        let empty = compute_totals(&Cart::new(), &catalog, &registry, &PricingConfig::default());
        assert_eq!(ensure_orderable(&empty), Err(CheckoutError::NothingToOrder));

        let (_, totals) = cart_and_totals(None);
        assert_eq!(ensure_orderable(&totals), Ok(()));
    }

    #[test]
    fn test_message_without_coupon() {
        let (cart, totals) = cart_and_totals(None);
        let msg = order_message(&cart, &totals, &contact());

        assert!(msg.starts_with("Olá, Kangaroo!\n\nSou: Ana Souza\n"));
        assert!(msg.contains("* Camisa Naruto Uzumaki | Qtd: 2 | Tam: G | Cor: Preto\n"));
        assert!(msg.contains("Cupom: Nenhum\n"));
        // 2 x 89.90 = 179.80, below the free-shipping threshold.
        assert!(msg.contains("Frete: R$ 25,00\n"));
        assert!(msg.contains("Valor do pedido: R$ 204,80\n"));
        assert!(msg.ends_with("CEP: 69050-010\n"));
        assert!(!msg.contains("pagador"));
        assert!(!msg.contains("Desconto"));
    }

    #[test]
    fn test_message_with_coupon_and_payer() {
        let (cart, totals) = cart_and_totals(Some("kangar10"));
        let mut contact = contact();
        contact.payer_name = "Carlos Souza".to_owned();

        let msg = order_message(&cart, &totals, &contact);
        assert!(msg.contains("O(a) pagador(a) é:\nNome: Carlos Souza\n"));
        assert!(msg.contains("Cupom: KANGAR10\nDesconto: R$ 17,98\n"));
    }

    #[test]
    fn test_free_shipping_and_custom_details() {
        let catalog = Catalog::bundled().unwrap();
        let registry = CouponRegistry::bundled().unwrap();
        let mut cart = Cart::new();
        let spec = CustomShirtOrder {
            description: "Canguru astronauta".to_owned(),
            has_reference: false,
            material: Material::Premium,
            size: ShirtSize::Xxg,
            color: ShirtColor::Branco,
        }
        .into_item_spec()
        .unwrap();
        cart.add_custom_item(spec);
        let totals = compute_totals(&cart, &catalog, &registry, &PricingConfig::default());

        let msg = order_message(&cart, &totals, &contact());
        assert!(msg.contains("   -> (Detalhes: Material: premium, Desc: \"Canguru astronauta\")\n"));
        assert!(msg.contains("Frete: GRÁTIS\n"));
        assert!(msg.contains("Valor do pedido: R$ 265,00\n"));
    }

    #[test]
    fn test_message_is_deterministic() {
        let (cart, totals) = cart_and_totals(Some("KANGAR10"));
        assert_eq!(
            order_message(&cart, &totals, &contact()),
            order_message(&cart, &totals, &contact())
        );
    }

    #[test]
    fn test_whatsapp_link() {
        let link = whatsapp_link("5592985979514", "Olá, Kangaroo!\nCupom: Nenhum");
        assert_eq!(
            link,
            "https://wa.me/5592985979514?text=Ol%C3%A1%2C%20Kangaroo%21%0ACupom%3A%20Nenhum"
        );
    }
}
