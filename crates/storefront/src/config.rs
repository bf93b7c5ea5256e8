//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `KANGAROO_WHATSAPP_NUMBER` - Store WhatsApp number, digits only (default: 5592985979514)
//! - `KANGAROO_STORAGE_DIR` - Directory holding the persisted cart (default: .kangaroo)
//! - `KANGAROO_CATALOG_PATH` - Product catalog JSON (default: bundled catalog)
//! - `KANGAROO_COUPONS_PATH` - Coupon registry JSON (default: bundled coupons)
//! - `KANGAROO_FREE_SHIPPING_THRESHOLD` - Subtotal that ships free (default: 250.00)
//! - `KANGAROO_SHIPPING_FEE` - Flat shipping fee (default: 25.00)
//! - `KANGAROO_INSTALLMENTS` - Interest-free installments (default: 6)
//! - `KANGAROO_STORE_URL` - Cart page used as base for share links
//!   (default: <https://kangaroowear.com.br/carrinho.html>)

use core::str::FromStr;
use std::path::PathBuf;

use kangaroo_core::Price;
use rust_decimal::Decimal;
use thiserror::Error;
use url::Url;

use crate::catalog::{Catalog, CatalogError};
use crate::coupons::{CouponRegistry, CouponRegistryError};
use crate::pricing::PricingConfig;

const DEFAULT_WHATSAPP_NUMBER: &str = "5592985979514";
const DEFAULT_STORAGE_DIR: &str = ".kangaroo";
const DEFAULT_STORE_URL: &str = "https://kangaroowear.com.br/carrinho.html";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// WhatsApp number receiving orders, international format without `+`
    pub whatsapp_number: String,
    /// Directory of the file-backed cart store
    pub storage_dir: PathBuf,
    /// Catalog file; the bundled catalog when unset
    pub catalog_path: Option<PathBuf>,
    /// Coupon file; the bundled registry when unset
    pub coupons_path: Option<PathBuf>,
    /// Shipping and installment rules
    pub pricing: PricingConfig,
    /// Page that receives shared carts
    pub store_url: Url,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let whatsapp_number = get_env_or_default(
            &lookup,
            "KANGAROO_WHATSAPP_NUMBER",
            DEFAULT_WHATSAPP_NUMBER,
        );
        if whatsapp_number.is_empty() || !whatsapp_number.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::InvalidEnvVar(
                "KANGAROO_WHATSAPP_NUMBER".to_string(),
                "must contain only digits".to_string(),
            ));
        }

        let storage_dir = PathBuf::from(get_env_or_default(
            &lookup,
            "KANGAROO_STORAGE_DIR",
            DEFAULT_STORAGE_DIR,
        ));
        let catalog_path = get_optional_env(&lookup, "KANGAROO_CATALOG_PATH").map(PathBuf::from);
        let coupons_path = get_optional_env(&lookup, "KANGAROO_COUPONS_PATH").map(PathBuf::from);

        let defaults = PricingConfig::default();
        let pricing = PricingConfig {
            free_shipping_threshold: get_price_or_default(
                &lookup,
                "KANGAROO_FREE_SHIPPING_THRESHOLD",
                defaults.free_shipping_threshold,
            )?,
            shipping_fee: get_price_or_default(
                &lookup,
                "KANGAROO_SHIPPING_FEE",
                defaults.shipping_fee,
            )?,
            installments: get_parsed_or_default(
                &lookup,
                "KANGAROO_INSTALLMENTS",
                defaults.installments,
            )?,
        };

        let store_url = get_parsed_or_default(
            &lookup,
            "KANGAROO_STORE_URL",
            Url::parse(DEFAULT_STORE_URL).map_err(|e| {
                ConfigError::InvalidEnvVar("KANGAROO_STORE_URL".to_string(), e.to_string())
            })?,
        )?;

        Ok(Self {
            whatsapp_number,
            storage_dir,
            catalog_path,
            coupons_path,
            pricing,
            store_url,
        })
    }

    /// Load the configured catalog, or the bundled one.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the catalog cannot be read or is invalid.
    pub fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        self.catalog_path
            .as_deref()
            .map_or_else(Catalog::bundled, Catalog::from_path)
    }

    /// Load the configured coupon registry, or the bundled one.
    ///
    /// # Errors
    ///
    /// Returns `CouponRegistryError` if the registry cannot be read or is invalid.
    pub fn load_coupons(&self) -> Result<CouponRegistry, CouponRegistryError> {
        self.coupons_path
            .as_deref()
            .map_or_else(CouponRegistry::bundled, CouponRegistry::from_path)
    }
}

/// Get an optional environment variable. Blank values count as unset.
fn get_optional_env(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> String {
    get_optional_env(lookup, key).unwrap_or_else(|| default.to_string())
}

/// Parse an optional variable, falling back to `default` when unset.
fn get_parsed_or_default<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(lookup, key).map_or(Ok(default), |value| {
        value
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Parse an optional money variable such as `250.00`.
fn get_price_or_default(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Price,
) -> Result<Price, ConfigError> {
    let Some(value) = get_optional_env(lookup, key) else {
        return Ok(default);
    };
    let amount = Decimal::from_str(&value)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    Price::new(amount).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.whatsapp_number, "5592985979514");
        assert_eq!(config.storage_dir, PathBuf::from(".kangaroo"));
        assert!(config.catalog_path.is_none());
        assert_eq!(config.pricing, PricingConfig::default());
        assert_eq!(
            config.store_url.as_str(),
            "https://kangaroowear.com.br/carrinho.html"
        );
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("KANGAROO_FREE_SHIPPING_THRESHOLD", "199.90"),
            ("KANGAROO_SHIPPING_FEE", "19.9"),
            ("KANGAROO_INSTALLMENTS", "3"),
            ("KANGAROO_STORAGE_DIR", "/tmp/cart"),
        ])
        .unwrap();
        assert_eq!(config.pricing.free_shipping_threshold, Price::from_cents(19_990));
        assert_eq!(config.pricing.shipping_fee, Price::from_cents(1_990));
        assert_eq!(config.pricing.installments.get(), 3);
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/cart"));
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = config_from(&[("KANGAROO_CATALOG_PATH", "  ")]).unwrap();
        assert!(config.catalog_path.is_none());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            config_from(&[("KANGAROO_INSTALLMENTS", "0")]),
            Err(ConfigError::InvalidEnvVar(key, _)) if key == "KANGAROO_INSTALLMENTS"
        ));
        assert!(config_from(&[("KANGAROO_SHIPPING_FEE", "-5")]).is_err());
        assert!(config_from(&[("KANGAROO_SHIPPING_FEE", "grátis")]).is_err());
        assert!(config_from(&[("KANGAROO_WHATSAPP_NUMBER", "+55 92 9859")]).is_err());
        assert!(config_from(&[("KANGAROO_STORE_URL", "not a url")]).is_err());
    }

    #[test]
    fn test_loads_bundled_data_by_default() {
        let config = config_from(&[]).unwrap();
        assert!(!config.load_catalog().unwrap().is_empty());
        assert!(!config.load_coupons().unwrap().coupons().is_empty());
    }
}
