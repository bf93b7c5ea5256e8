//! Type-safe price representation using decimal arithmetic.
//!
//! All cart money flows through [`Price`]: unit prices, line totals, shipping,
//! discounts and installments. Amounts are exact decimals in reais, so
//! repeated add/remove/recompute cycles never drift.

use core::fmt;
use core::iter::Sum;
use core::num::NonZeroU32;
use core::ops::{Add, AddAssign};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::Quantity;

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
}

/// A non-negative amount of money in the store currency (BRL).
///
/// Deserializes from either a JSON string (`"89.90"`) or a JSON number
/// (`89.9`), so carts written by float-based clients still load. Always
/// serializes as a decimal string.
///
/// ## Examples
///
/// ```
/// use kangaroo_core::{Price, Quantity};
/// use rust_decimal::Decimal;
///
/// let unit = Price::from_cents(8990);
/// let line = unit.times(Quantity::new(2).unwrap());
/// assert_eq!(line.amount(), Decimal::new(17980, 2));
/// assert_eq!(line.to_string(), "R$ 179,80");
///
/// assert!(Price::new(Decimal::new(-1, 0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Zero reais.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount < Decimal::ZERO {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of centavos.
    #[must_use]
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Whether this price is exactly zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Price of `quantity` units at this unit price.
    #[must_use]
    pub fn times(self, quantity: Quantity) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity.get())))
    }

    /// The share of this price given by `fraction` (e.g. `0.10` for 10%).
    ///
    /// Negative fractions yield zero.
    #[must_use]
    pub fn portion(self, fraction: Decimal) -> Self {
        Self(self.0.saturating_mul(fraction).max(Decimal::ZERO))
    }

    /// Subtract `other`, flooring the result at zero.
    #[must_use]
    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0).max(Decimal::ZERO))
    }

    /// Divide into `parts` equal installments, rounded to centavos.
    #[must_use]
    pub fn split(self, parts: NonZeroU32) -> Self {
        Self(self.0 / Decimal::from(parts.get())).round_cents()
    }

    /// Round to two decimal places, midpoint away from zero.
    #[must_use]
    pub fn round_cents(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

/// Formats as the store displays money: `R$ 1234,50`.
impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.round_cents().0;
        let text = format!("{rounded:.2}").replace('.', ",");
        write!(f, "R$ {text}")
    }
}
