//! Cart line items.

use core::fmt;

use kangaroo_core::{LineItemId, Price, ProductId, Quantity};
use serde::{Deserialize, Serialize};

/// Stored product reference marking a line built by the custom-shirt configurator.
pub const CUSTOM_PRODUCT_REF: &str = "custom-exclusive";

/// What a line item was built from.
///
/// Serialized as a plain string: the catalog product id, or
/// [`CUSTOM_PRODUCT_REF`] for custom items.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProductRef {
    Catalog(ProductId),
    Custom,
}

impl From<String> for ProductRef {
    fn from(value: String) -> Self {
        if value == CUSTOM_PRODUCT_REF {
            Self::Custom
        } else {
            Self::Catalog(ProductId::from(value))
        }
    }
}

impl From<ProductRef> for String {
    fn from(value: ProductRef) -> Self {
        match value {
            ProductRef::Catalog(id) => id.into_inner(),
            ProductRef::Custom => CUSTOM_PRODUCT_REF.to_owned(),
        }
    }
}

impl fmt::Display for ProductRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Catalog(id) => write!(f, "{id}"),
            Self::Custom => f.write_str(CUSTOM_PRODUCT_REF),
        }
    }
}

/// One line of the cart.
///
/// The JSON shape is the one stored under the cart key and carried in shared
/// cart links:
///
/// ```json
/// {"identifier": "camisa-naruto|Preto|M", "id": "camisa-naruto", "name": "...",
///  "image": "...", "price": "89.90", "color": "Preto", "size": "M", "quantity": 2}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub identifier: LineItemId,
    #[serde(rename = "id")]
    pub product_ref: ProductRef,
    pub name: String,
    pub image: String,
    /// Unit price snapshotted when the line was created.
    #[serde(rename = "price")]
    pub unit_price: Price,
    pub color: String,
    pub size: String,
    pub quantity: Quantity,
    /// Configurator answers for manual fulfilment; custom items only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_details: Option<String>,
}

impl LineItem {
    /// `unit_price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }

    #[must_use]
    pub const fn is_custom(&self) -> bool {
        matches!(self.product_ref, ProductRef::Custom)
    }

    /// The catalog product behind this line, if it came from the catalog.
    #[must_use]
    pub const fn catalog_product(&self) -> Option<&ProductId> {
        match &self.product_ref {
            ProductRef::Catalog(id) => Some(id),
            ProductRef::Custom => None,
        }
    }
}

/// A priced custom item, ready to be appended to the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomItemSpec {
    pub name: String,
    pub image: String,
    pub price: Price,
    pub color: String,
    pub size: String,
    /// Free-text fulfilment details.
    pub description: String,
}
