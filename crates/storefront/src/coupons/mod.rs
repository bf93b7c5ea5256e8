//! Coupon registry and validation.
//!
//! The registry is a small, static list of coupon definitions. Carts refer to
//! coupons by code only and look them up here at use time, so a coupon
//! withdrawn from the registry stops applying everywhere.

mod validator;

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;
use kangaroo_core::CouponCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use validator::{
    AppliedCoupon, CouponError, CouponOutcome, apply_coupon, check_eligibility,
};

/// Registry shipped with the crate, used when no coupon file is configured.
const BUNDLED_COUPONS: &str = include_str!("../../data/coupons.json");

/// Errors that can occur when loading a coupon registry.
#[derive(Debug, Error)]
pub enum CouponRegistryError {
    /// The registry file could not be read.
    #[error("Failed to read coupons {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The registry is not a valid JSON coupon list.
    #[error("Invalid coupon JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A discount is outside the open interval (0, 1).
    #[error("Coupon {code} has discount {discount} outside (0, 1)")]
    InvalidDiscount { code: CouponCode, discount: Decimal },

    /// Two coupons share a code.
    #[error("Duplicate coupon code: {0}")]
    DuplicateCode(CouponCode),
}

/// A coupon as published by the store.
///
/// `valid_until` and `is_new_customer_only` are carried for display and
/// future server-side checks; nothing in this crate evaluates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponDefinition {
    pub code: CouponCode,
    #[serde(default)]
    pub description: String,
    /// Fraction of the subtotal taken off, e.g. `0.10`.
    pub discount_percent: Decimal,
    pub valid_until: NaiveDate,
    #[serde(default)]
    pub is_per_customer: bool,
    /// Collection that must be present among catalog items for the coupon to apply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_collection: Option<String>,
    #[serde(default)]
    pub is_new_customer_only: bool,
}

impl CouponDefinition {
    /// The discount as a whole percentage, for display (`0.12` -> `12`).
    #[must_use]
    pub fn percent_label(&self) -> Decimal {
        (self.discount_percent * Decimal::ONE_HUNDRED).round()
    }
}

/// A read-only set of coupon definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CouponRegistry {
    coupons: Vec<CouponDefinition>,
}

impl CouponRegistry {
    /// Build a registry, validating discounts and code uniqueness.
    ///
    /// # Errors
    ///
    /// Returns an error if any discount is outside (0, 1) or a code repeats.
    pub fn new(coupons: Vec<CouponDefinition>) -> Result<Self, CouponRegistryError> {
        let mut seen = HashSet::with_capacity(coupons.len());
        for coupon in &coupons {
            if coupon.discount_percent <= Decimal::ZERO || coupon.discount_percent >= Decimal::ONE
            {
                return Err(CouponRegistryError::InvalidDiscount {
                    code: coupon.code.clone(),
                    discount: coupon.discount_percent,
                });
            }
            if !seen.insert(&coupon.code) {
                return Err(CouponRegistryError::DuplicateCode(coupon.code.clone()));
            }
        }
        Ok(Self { coupons })
    }

    /// Parse a registry from a JSON array of coupons.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or fails validation.
    pub fn from_json_str(json: &str) -> Result<Self, CouponRegistryError> {
        let coupons: Vec<CouponDefinition> = serde_json::from_str(json)?;
        Self::new(coupons)
    }

    /// Load a registry from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid registry.
    pub fn from_path(path: &Path) -> Result<Self, CouponRegistryError> {
        let json = std::fs::read_to_string(path).map_err(|source| CouponRegistryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// The registry bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error only if the bundled data is corrupt.
    pub fn bundled() -> Result<Self, CouponRegistryError> {
        Self::from_json_str(BUNDLED_COUPONS)
    }

    /// Look up a coupon. Codes are normalized, so the match is case-insensitive.
    #[must_use]
    pub fn find(&self, code: &CouponCode) -> Option<&CouponDefinition> {
        self.coupons.iter().find(|c| &c.code == code)
    }

    /// All coupons in registry order.
    #[must_use]
    pub fn coupons(&self) -> &[CouponDefinition] {
        &self.coupons
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_registry() {
        let registry = CouponRegistry::bundled().unwrap();
        let naruto = registry
            .find(&CouponCode::parse("naruto12").unwrap())
            .unwrap();
        assert_eq!(naruto.target_collection.as_deref(), Some("Animes"));
        assert_eq!(naruto.percent_label(), Decimal::from(12));
    }

    #[test]
    fn test_invalid_discount_rejected() {
        let json = r#"[{"code": "X", "discount_percent": 1.5, "valid_until": "2030-01-01"}]"#;
        assert!(matches!(
            CouponRegistry::from_json_str(json),
            Err(CouponRegistryError::InvalidDiscount { .. })
        ));
        let json = r#"[{"code": "X", "discount_percent": 0, "valid_until": "2030-01-01"}]"#;
        assert!(CouponRegistry::from_json_str(json).is_err());
    }

    #[test]
    fn test_duplicate_codes_rejected_case_insensitively() {
        let json = r#"[
            {"code": "abc", "discount_percent": 0.1, "valid_until": "2030-01-01"},
            {"code": "ABC", "discount_percent": 0.2, "valid_until": "2030-01-01"}
        ]"#;
        assert!(matches!(
            CouponRegistry::from_json_str(json),
            Err(CouponRegistryError::DuplicateCode(_))
        ));
    }

    #[test]
    fn test_unknown_code() {
        let registry = CouponRegistry::bundled().unwrap();
        assert!(registry.find(&CouponCode::parse("NOPE").unwrap()).is_none());
    }
}
