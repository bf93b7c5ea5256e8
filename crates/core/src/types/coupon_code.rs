//! Coupon code type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`CouponCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CouponCodeError {
    /// The input is empty after trimming.
    #[error("coupon code cannot be empty")]
    Empty,
    /// The input is too long.
    #[error("coupon code must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// A normalized coupon code.
///
/// Codes are matched case-insensitively, so parsing trims surrounding
/// whitespace and uppercases the rest.
///
/// ## Examples
///
/// ```
/// use kangaroo_core::CouponCode;
///
/// let code = CouponCode::parse("  naruto12 ").unwrap();
/// assert_eq!(code.as_str(), "NARUTO12");
///
/// assert!(CouponCode::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct CouponCode(String);

impl CouponCode {
    /// Maximum length of a coupon code.
    pub const MAX_LENGTH: usize = 64;

    /// Parse and normalize a `CouponCode`.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty or longer than
    /// [`Self::MAX_LENGTH`] characters.
    pub fn parse(s: &str) -> Result<Self, CouponCodeError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CouponCodeError::Empty);
        }
        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(CouponCodeError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CouponCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CouponCode {
    type Err = CouponCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CouponCode {
    type Error = CouponCodeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<CouponCode> for String {
    fn from(code: CouponCode) -> Self {
        code.0
    }
}

impl AsRef<str> for CouponCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
