//! WhatsApp checkout.

use kangaroo_storefront::checkout::OrderContact;
use kangaroo_storefront::{CartSession, Result};

/// Print the order message followed by the link that sends it.
///
/// # Errors
///
/// Returns an error when the cart total is zero; nothing is printed.
#[allow(clippy::print_stdout)]
pub fn run(session: &CartSession, whatsapp_number: &str, contact: &OrderContact) -> Result<()> {
    let message = session.order_message(contact)?;
    let link = session.whatsapp_link(whatsapp_number, contact)?;
    println!("{message}");
    println!("{link}");
    Ok(())
}
