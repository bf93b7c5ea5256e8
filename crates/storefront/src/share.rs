//! Shared-cart links.
//!
//! A cart is shared as the `cart` query parameter of a store URL, holding
//! base64 (standard alphabet) of the JSON item list. The coupon is never
//! included.

use base64::{Engine, engine::general_purpose::STANDARD};
use thiserror::Error;
use url::Url;

use crate::cart::LineItem;

/// Query parameter carrying a shared cart.
pub const CART_PARAM: &str = "cart";

/// Why a shared cart was rejected. The local cart is left untouched in every case.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Shared cart is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Shared cart is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Shared cart is not a list of items")]
    NotASequence,
}

/// Why a cart could not be shared.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Cannot share an empty cart")]
    EmptyCart,

    #[error("Failed to encode cart: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Encode items for a share link.
///
/// # Errors
///
/// Returns [`ExportError::EmptyCart`] when there are no items, or an error if
/// they cannot be serialized.
pub fn encode_items(items: &[LineItem]) -> Result<String, ExportError> {
    if items.is_empty() {
        return Err(ExportError::EmptyCart);
    }
    let json = serde_json::to_string(items)?;
    Ok(STANDARD.encode(json))
}

/// Decode a shared-cart blob into line items.
///
/// Whitespace around the blob is ignored, and spaces inside it are read as
/// `+` (query-string decoding turns an unescaped `+` into a space).
///
/// Decoded bytes that are not UTF-8 are read as Latin-1, one character per
/// byte, which is how browsers' `btoa` encodes accented text.
///
/// # Errors
///
/// Returns an [`ImportError`] for bad base64, bad JSON, a value that is not
/// an array, or an array whose entries are not valid items.
pub fn decode_items(blob: &str) -> Result<Vec<LineItem>, ImportError> {
    let cleaned: String = blob
        .trim()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('+'),
            c if c.is_whitespace() => None,
            c => Some(c),
        })
        .collect();
    let bytes = STANDARD.decode(cleaned)?;
    let json = String::from_utf8(bytes)
        .unwrap_or_else(|e| e.into_bytes().into_iter().map(char::from).collect());
    let value: serde_json::Value = serde_json::from_str(&json)?;
    if !value.is_array() {
        return Err(ImportError::NotASequence);
    }
    Ok(serde_json::from_value(value)?)
}

/// `base` with the `cart` parameter set to the encoded items. Any previous
/// `cart` parameter is replaced; other parameters are kept.
///
/// # Errors
///
/// Returns an [`ExportError`] for an empty item list or items that cannot be
/// serialized.
pub fn share_url(base: &Url, items: &[LineItem]) -> Result<Url, ExportError> {
    let blob = encode_items(items)?;
    let mut url = strip_cart_param(base);
    url.query_pairs_mut().append_pair(CART_PARAM, &blob);
    Ok(url)
}

/// Split a shared cart off a page URL.
///
/// Returns the blob and the URL to show instead (the same URL without the
/// `cart` parameter), or `None` when the URL carries no shared cart.
#[must_use]
pub fn take_shared_cart(url: &Url) -> Option<(String, Url)> {
    let blob = url
        .query_pairs()
        .find(|(key, _)| key == CART_PARAM)
        .map(|(_, value)| value.into_owned())?;
    Some((blob, strip_cart_param(url)))
}

fn strip_cart_param(url: &Url) -> Url {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != CART_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    let mut stripped = url.clone();
    if kept.is_empty() {
        stripped.set_query(None);
    } else {
        stripped.query_pairs_mut().clear().extend_pairs(kept);
    }
    stripped
}
