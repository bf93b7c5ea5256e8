//! Durable key-value storage for the cart.
//!
//! The cart lives under two keys (see [`keys`]). Stores are pluggable through
//! [`KeyValueStore`]: [`MemoryStore`] for tests and shared in-process state,
//! [`FileStore`] for a directory on disk, [`UnavailableStore`] for when
//! storage is disabled. [`CartStorage`] is the adapter that maps a [`Cart`]
//! onto those keys.
//!
//! [`Cart`]: crate::cart::Cart

mod cart_storage;
mod file;
mod memory;

use thiserror::Error;

pub use cart_storage::{CartStorage, StorageMode};
pub use file::FileStore;
pub use memory::{MemoryStore, UnavailableStore};

/// Storage keys.
pub mod keys {
    /// JSON array of line items.
    pub const CART: &str = "kangarooCart";

    /// Plain coupon code; absent means no coupon.
    pub const COUPON: &str = "appliedCouponCode";

    /// Whether a change to `key` affects the stored cart.
    #[must_use]
    pub fn is_cart_key(key: &str) -> bool {
        key == CART || key == COUPON
    }
}

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Storage is disabled or cannot be reached.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Reading or writing a key failed.
    #[error("Storage I/O error on key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The key cannot be mapped onto the backend.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// Stored cart data could not be encoded or decoded.
    #[error("Stored cart data is invalid: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A string key-value store with browser `localStorage` semantics.
pub trait KeyValueStore: Send + Sync {
    /// Read a key; `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a key, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a key. Deleting an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
