//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing a catalog product id with a cart line identifier.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use kangaroo_core::define_id;
/// define_id!(SkuId);
/// define_id!(BinId);
///
/// let sku = SkuId::new("camisa-naruto");
/// let bin = BinId::new("camisa-naruto");
///
/// // These are different types, so this won't compile:
/// // let _: SkuId = bin;
/// assert_eq!(sku.as_str(), bin.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Catalog product identifier (e.g. "camisa-naruto").
define_id!(ProductId);

// Cart line identifier. Catalog lines use `product|color|size`; custom
// lines use `custom-<uuid>`.
define_id!(LineItemId);

impl LineItemId {
    /// Separator between the parts of a catalog line identifier.
    pub const SEPARATOR: char = '|';

    /// Deterministic identifier for a catalog product in a given color and size.
    ///
    /// Re-adding the same combination yields the same identifier, which is how
    /// the cart merges quantities instead of duplicating lines.
    #[must_use]
    pub fn for_catalog(product: &ProductId, color: &str, size: &str) -> Self {
        let sep = Self::SEPARATOR;
        Self(format!("{product}{sep}{color}{sep}{size}"))
    }
}
