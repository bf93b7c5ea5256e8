//! The cart model.
//!
//! [`Cart`] owns the ordered line items and the applied coupon code. It holds
//! two invariants: at most one line per identifier, and every quantity is at
//! least one. Persistence is not its concern; [`crate::CartSession`] saves
//! after each mutation.

mod line_item;

use kangaroo_core::{CouponCode, LineItemId, ProductId, Quantity, QuantityInput};
use uuid::Uuid;

use crate::catalog::Catalog;

pub use line_item::{CUSTOM_PRODUCT_REF, CustomItemSpec, LineItem, ProductRef};

/// Result of adding a catalog product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line was appended.
    Added(LineItemId),
    /// An existing line with the same product, color and size grew.
    Merged {
        identifier: LineItemId,
        quantity: Quantity,
    },
    /// The product is not in the catalog; nothing changed.
    ProductNotFound(ProductId),
}

/// Result of removing a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    NotInCart,
}

/// Result of changing a line's quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityOutcome {
    Updated(Quantity),
    /// The requested quantity was zero or negative, so the line was removed.
    Removed,
    NotInCart,
}

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<LineItem>,
    applied_coupon: Option<CouponCode>,
}

impl Cart {
    /// An empty cart with no coupon.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a cart from stored parts.
    ///
    /// Lines sharing an identifier are folded into the first one.
    #[must_use]
    pub fn from_parts(items: Vec<LineItem>, applied_coupon: Option<CouponCode>) -> Self {
        let mut cart = Self {
            items: Vec::with_capacity(items.len()),
            applied_coupon,
        };
        cart.extend_merging(items);
        cart
    }

    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    #[must_use]
    pub const fn applied_coupon(&self) -> Option<&CouponCode> {
        self.applied_coupon.as_ref()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines (the header badge count).
    #[must_use]
    pub fn unit_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    #[must_use]
    pub fn get(&self, identifier: &LineItemId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.identifier == identifier)
    }

    /// Add `quantity` units of a catalog product in the given color and size.
    ///
    /// The product's name, image and price are copied into the line now and
    /// never re-read from the catalog, so later price changes do not affect
    /// lines already in the cart.
    pub fn add_catalog_item(
        &mut self,
        catalog: &Catalog,
        product_id: &ProductId,
        color: &str,
        size: &str,
        quantity: Quantity,
    ) -> AddOutcome {
        let Some(product) = catalog.get(product_id) else {
            return AddOutcome::ProductNotFound(product_id.clone());
        };

        let identifier = LineItemId::for_catalog(product_id, color, size);
        if let Some(existing) = self.find_mut(&identifier) {
            existing.quantity = existing.quantity.saturating_add(quantity);
            return AddOutcome::Merged {
                identifier,
                quantity: existing.quantity,
            };
        }

        self.items.push(LineItem {
            identifier: identifier.clone(),
            product_ref: ProductRef::Catalog(product_id.clone()),
            name: product.name.clone(),
            image: product.image.clone(),
            unit_price: product.price,
            color: color.to_owned(),
            size: size.to_owned(),
            quantity,
            custom_details: None,
        });
        AddOutcome::Added(identifier)
    }

    /// Append a custom item. Custom items never merge and always have quantity one.
    pub fn add_custom_item(&mut self, spec: CustomItemSpec) -> LineItemId {
        let identifier = LineItemId::new(format!("custom-{}", Uuid::new_v4()));
        self.items.push(LineItem {
            identifier: identifier.clone(),
            product_ref: ProductRef::Custom,
            name: spec.name,
            image: spec.image,
            unit_price: spec.price,
            color: spec.color,
            size: spec.size,
            quantity: Quantity::ONE,
            custom_details: Some(spec.description),
        });
        identifier
    }

    pub fn remove_item(&mut self, identifier: &LineItemId) -> RemoveOutcome {
        let before = self.items.len();
        self.items.retain(|item| &item.identifier != identifier);
        if self.items.len() == before {
            RemoveOutcome::NotInCart
        } else {
            RemoveOutcome::Removed
        }
    }

    /// Apply a quantity change. [`QuantityInput::Remove`] deletes the line.
    pub fn set_quantity(&mut self, identifier: &LineItemId, input: QuantityInput) -> QuantityOutcome {
        match input {
            QuantityInput::Remove => match self.remove_item(identifier) {
                RemoveOutcome::Removed => QuantityOutcome::Removed,
                RemoveOutcome::NotInCart => QuantityOutcome::NotInCart,
            },
            QuantityInput::Set(quantity) => match self.find_mut(identifier) {
                Some(item) => {
                    item.quantity = quantity;
                    QuantityOutcome::Updated(quantity)
                }
                None => QuantityOutcome::NotInCart,
            },
        }
    }

    /// Empty the cart and drop the coupon.
    pub fn clear(&mut self) {
        self.items.clear();
        self.applied_coupon = None;
    }

    /// Replace every line wholesale. Items are taken as-is, without checking
    /// them against the catalog; duplicate identifiers are folded together.
    pub fn replace_all(&mut self, items: Vec<LineItem>) {
        self.items.clear();
        self.extend_merging(items);
    }

    /// Whether some catalog line belongs to `collection`.
    ///
    /// Custom lines never count, and neither do lines whose product has left
    /// the catalog.
    #[must_use]
    pub fn has_catalog_item_in(&self, catalog: &Catalog, collection: &str) -> bool {
        self.items
            .iter()
            .filter_map(LineItem::catalog_product)
            .any(|id| catalog.collection_of(id) == Some(collection))
    }

    pub(crate) fn set_applied_coupon(&mut self, code: Option<CouponCode>) {
        self.applied_coupon = code;
    }

    pub(crate) fn take_applied_coupon(&mut self) -> Option<CouponCode> {
        self.applied_coupon.take()
    }

    fn find_mut(&mut self, identifier: &LineItemId) -> Option<&mut LineItem> {
        self.items
            .iter_mut()
            .find(|item| &item.identifier == identifier)
    }

    fn extend_merging(&mut self, items: Vec<LineItem>) {
        for item in items {
            if let Some(existing) = self.find_mut(&item.identifier) {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
            } else {
                self.items.push(item);
            }
        }
    }
}
