//! Shared-cart links.

use kangaroo_storefront::share;
use kangaroo_storefront::{CartSession, Result, StorefrontError};
use url::Url;

use super::cart;

/// Print a link to `store_url` carrying the cart.
///
/// # Errors
///
/// Returns an error when the cart is empty or cannot be serialized.
#[allow(clippy::print_stdout)]
pub fn export(session: &CartSession, store_url: &Url) -> Result<()> {
    let url = session.share_url(store_url)?;
    println!("{url}");
    Ok(())
}

/// Import a shared cart from a link or a raw blob, replacing the current cart.
///
/// # Errors
///
/// Returns an error when a link has no `cart` parameter or the shared cart is
/// malformed. The current cart is kept in both cases.
#[allow(clippy::print_stdout)]
pub fn import(session: &mut CartSession, link_or_blob: &str) -> Result<()> {
    let blob = match Url::parse(link_or_blob) {
        Ok(url) => {
            let (blob, _) = share::take_shared_cart(&url).ok_or_else(|| {
                StorefrontError::NotFound(format!("`{}` parameter in link", share::CART_PARAM))
            })?;
            blob
        }
        Err(_) => link_or_blob.to_owned(),
    };
    let lines = session.import_shared(&blob)?;
    println!("{lines} item(ns) importado(s)");
    cart::show(session);
    Ok(())
}
