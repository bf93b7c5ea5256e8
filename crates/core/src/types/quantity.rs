//! Line item quantity.

use core::fmt;
use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// Quantities start at one.
    #[error("quantity must be at least 1")]
    Zero,
    /// The input is not an integer.
    #[error("quantity must be a whole number (got {0:?})")]
    NotANumber(String),
}

/// How a raw quantity field should be applied to a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityInput {
    /// Set the line item to this quantity.
    Set(Quantity),
    /// The input was zero or negative; the line item goes away.
    Remove,
}

/// A count of units on a line item, always at least one.
///
/// ## Examples
///
/// ```
/// use kangaroo_core::{Quantity, QuantityInput};
///
/// assert_eq!(Quantity::parse_input(" 3 ").unwrap(), QuantityInput::Set(Quantity::new(3).unwrap()));
/// assert_eq!(Quantity::parse_input("0").unwrap(), QuantityInput::Remove);
/// assert_eq!(Quantity::parse_input("-5").unwrap(), QuantityInput::Remove);
/// assert!(Quantity::parse_input("abc").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Create a quantity.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::Zero`] for zero.
    pub const fn new(value: u32) -> Result<Self, QuantityError> {
        match NonZeroU32::new(value) {
            Some(n) => Ok(Self(n)),
            None => Err(QuantityError::Zero),
        }
    }

    /// Interpret a signed quantity: anything at or below zero means removal.
    ///
    /// Values above `u32::MAX` are clamped.
    #[must_use]
    pub fn from_signed(value: i64) -> QuantityInput {
        let clamped = u32::try_from(value.max(0)).unwrap_or(u32::MAX);
        NonZeroU32::new(clamped).map_or(QuantityInput::Remove, |n| QuantityInput::Set(Self(n)))
    }

    /// Interpret raw text from a quantity field.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::NotANumber`] if the trimmed input is not an integer.
    pub fn parse_input(raw: &str) -> Result<QuantityInput, QuantityError> {
        let trimmed = raw.trim();
        trimmed
            .parse::<i64>()
            .map(Self::from_signed)
            .map_err(|_| QuantityError::NotANumber(trimmed.to_owned()))
    }

    /// The count as a plain integer.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Add `other`, clamping at `u32::MAX`.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0.get()))
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for Quantity {
    type Error = QuantityError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
