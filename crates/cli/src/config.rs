//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `KAOS_PRICE_PER_POSITION` - Fee per applied print position in rupiah (default: 25000)
//! - `KAOS_BULK_ORDER_THRESHOLD` - Units at which an order is bulk (default: 10)
//! - `KAOS_BASE_URL` - Public storefront URL for payment links (default: <http://localhost:3000>)
//!
//! ## Required for `payment` commands
//! - `DUITKU_MERCHANT_CODE` - Merchant code
//! - `DUITKU_API_KEY` - Merchant API key
//! - `DUITKU_BASE_URL` - Gateway base URL

use kaos_euy_core::Price;
use kaos_euy_core::checkout::DEFAULT_BULK_ORDER_THRESHOLD;
use kaos_euy_core::customization::{PRICE_PER_POSITION, PricingRule};
use kaos_euy_core::payment::PaymentConfig;
use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Pricing and classification settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CliConfig {
    pub pricing: PricingRule,
    pub bulk_order_threshold: u32,
}

impl CliConfig {
    /// Load configuration from the process environment (and `.env`).
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let price_per_position = parse_or_default(
            &lookup,
            "KAOS_PRICE_PER_POSITION",
            PRICE_PER_POSITION,
        )?;
        if price_per_position < 0 {
            return Err(ConfigError::InvalidEnvVar(
                "KAOS_PRICE_PER_POSITION".to_string(),
                "must not be negative".to_string(),
            ));
        }
        let bulk_order_threshold = parse_or_default(
            &lookup,
            "KAOS_BULK_ORDER_THRESHOLD",
            DEFAULT_BULK_ORDER_THRESHOLD,
        )?;

        Ok(Self {
            pricing: PricingRule::new(Price::idr(price_per_position)),
            bulk_order_threshold,
        })
    }
}

/// Load payment gateway settings from the process environment (and `.env`).
///
/// # Errors
///
/// Returns an error if a required variable is missing or blank.
pub fn payment_from_env() -> Result<PaymentConfig, ConfigError> {
    dotenvy::dotenv().ok();
    payment_from_lookup(|key| std::env::var(key).ok())
}

fn payment_from_lookup(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<PaymentConfig, ConfigError> {
    Ok(PaymentConfig {
        merchant_code: get_required(&lookup, "DUITKU_MERCHANT_CODE")?,
        api_key: SecretString::from(get_required(&lookup, "DUITKU_API_KEY")?),
        gateway_url: get_required(&lookup, "DUITKU_BASE_URL")?,
        app_base_url: lookup("KAOS_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
    })
}

/// Get a required, non-blank variable.
fn get_required(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<String, ConfigError> {
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Parse an optional variable, falling back to `default` when unset.
fn parse_or_default<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        _ => Ok(default),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CliConfig::from_lookup(env(&[])).unwrap();
        assert_eq!(config.pricing, PricingRule::default());
        assert_eq!(config.bulk_order_threshold, 10);
    }

    #[test]
    fn test_overrides() {
        let config = CliConfig::from_lookup(env(&[
            ("KAOS_PRICE_PER_POSITION", " 30000 "),
            ("KAOS_BULK_ORDER_THRESHOLD", "24"),
        ]))
        .unwrap();
        assert_eq!(config.pricing.price_per_position(), Price::idr(30_000));
        assert_eq!(config.bulk_order_threshold, 24);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            CliConfig::from_lookup(env(&[("KAOS_BULK_ORDER_THRESHOLD", "lots")])),
            Err(ConfigError::InvalidEnvVar(key, _)) if key == "KAOS_BULK_ORDER_THRESHOLD"
        ));
        assert!(CliConfig::from_lookup(env(&[("KAOS_PRICE_PER_POSITION", "-1")])).is_err());
    }

    #[test]
    fn test_payment_config() {
        let config = payment_from_lookup(env(&[
            ("DUITKU_MERCHANT_CODE", "D0001"),
            ("DUITKU_API_KEY", "k3y"),
            ("DUITKU_BASE_URL", "https://sandbox.duitku.test/webapi/api"),
        ]))
        .unwrap();
        assert_eq!(config.merchant_code, "D0001");
        assert_eq!(config.api_key.expose_secret(), "k3y");
        assert_eq!(config.app_base_url, "http://localhost:3000");
    }

    #[test]
    fn test_payment_config_requires_credentials() {
        assert_eq!(
            payment_from_lookup(env(&[
                ("DUITKU_MERCHANT_CODE", "D0001"),
                ("DUITKU_API_KEY", "  "),
            ]))
            .unwrap_err(),
            ConfigError::MissingEnvVar("DUITKU_API_KEY".to_string())
        );
    }
}
