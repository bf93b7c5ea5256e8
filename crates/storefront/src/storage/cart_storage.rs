//! Maps a [`Cart`] onto the two storage keys.

use core::fmt;

use kangaroo_core::CouponCode;

use super::{KeyValueStore, StorageError, keys};
use crate::cart::{Cart, LineItem};

/// Whether writes currently reach durable storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    /// The last write succeeded.
    Durable,
    /// No store is configured or the last write failed. The cart lives only
    /// in memory until a write succeeds again.
    Degraded,
}

/// Persistence adapter for the cart.
///
/// Never fails outward: errors are logged and reflected in [`StorageMode`].
pub struct CartStorage {
    store: Option<Box<dyn KeyValueStore>>,
    mode: StorageMode,
}

impl fmt::Debug for CartStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStorage")
            .field("has_store", &self.store.is_some())
            .field("mode", &self.mode)
            .finish()
    }
}

impl CartStorage {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Some(Box::new(store)),
            mode: StorageMode::Durable,
        }
    }

    /// No backing store; the cart is session-only.
    #[must_use]
    pub const fn memory_only() -> Self {
        Self {
            store: None,
            mode: StorageMode::Degraded,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> StorageMode {
        self.mode
    }

    /// Write the items, then the coupon key (or remove it when no coupon is applied).
    pub fn save(&mut self, cart: &Cart) -> StorageMode {
        let Some(store) = &self.store else {
            return self.mode;
        };
        match write_cart(store.as_ref(), cart) {
            Ok(()) => {
                if self.mode == StorageMode::Degraded {
                    tracing::info!("Cart storage recovered");
                }
                self.mode = StorageMode::Durable;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to persist cart; keeping it in memory only");
                self.mode = StorageMode::Degraded;
            }
        }
        self.mode
    }

    /// Read the stored cart.
    ///
    /// Returns `None` when there is no store or it cannot be read, so the
    /// caller can keep whatever it has in memory. Missing keys load as an
    /// empty cart. Lines that do not parse are dropped with a warning; a
    /// value that is not a JSON list loads as no items.
    pub fn load(&mut self) -> Option<Cart> {
        let store = self.store.as_ref()?;
        match read_cart(store.as_ref()) {
            Ok(cart) => Some(cart),
            Err(e) => {
                tracing::warn!(error = %e, "Cart storage unreadable; using in-memory cart");
                self.mode = StorageMode::Degraded;
                None
            }
        }
    }
}

fn write_cart(store: &dyn KeyValueStore, cart: &Cart) -> Result<(), StorageError> {
    let items = serde_json::to_string(cart.items())?;
    store.set(keys::CART, &items)?;
    match cart.applied_coupon() {
        Some(code) => store.set(keys::COUPON, code.as_str()),
        None => store.remove(keys::COUPON),
    }
}

fn read_cart(store: &dyn KeyValueStore) -> Result<Cart, StorageError> {
    let items = store
        .get(keys::CART)?
        .map(|raw| parse_items(&raw))
        .unwrap_or_default();
    let coupon = store
        .get(keys::COUPON)?
        .and_then(|raw| CouponCode::parse(&raw).ok());
    Ok(Cart::from_parts(items, coupon))
}

fn parse_items(raw: &str) -> Vec<LineItem> {
    let entries = match serde_json::from_str::<Vec<serde_json::Value>>(raw) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(error = %e, "Stored cart is corrupt; starting empty");
            return Vec::new();
        }
    };
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<LineItem>(entry) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(index, error = %e, "Dropping unreadable cart line");
                None
            }
        })
        .collect()
}
