//! # Store Configuration
//!
//! Runtime settings for the store and the dashboard views built on it.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`BRANCHBOARD_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only once the store is built, so it lives outside
//! the store lock.

use std::env;
use std::str::FromStr;

use branchboard_core::{Money, DEFAULT_AMOUNT_TOLERANCE};
use serde::{Deserialize, Serialize};

/// Largest supported number of currency decimal places.
pub const MAX_CURRENCY_DECIMALS: u8 = 4;

/// Store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    /// Largest accepted difference between a submitted sale amount and the
    /// recomputed one, in minor units.
    pub amount_tolerance: Money,

    /// Currency code (ISO 4217)
    pub currency_code: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Number of decimal places for currency
    pub currency_decimals: u8,

    /// Entries shown in the dashboard's Recent Activity card
    pub recent_activity_limit: usize,
}

impl Default for StoreConfig {
    /// ## Default Values
    /// - Tolerance: 0 (exact match after rounding)
    /// - Currency: BDT (৳), no minor digits
    /// - Recent activity: 5 entries
    fn default() -> Self {
        StoreConfig {
            amount_tolerance: DEFAULT_AMOUNT_TOLERANCE,
            currency_code: "BDT".to_string(),
            currency_symbol: "৳".to_string(),
            currency_decimals: 0,
            recent_activity_limit: 5,
        }
    }
}

impl StoreConfig {
    /// Loads configuration from environment variables over the defaults.
    ///
    /// ## Environment Variables
    /// - `BRANCHBOARD_AMOUNT_TOLERANCE`: minor units, >= 0
    /// - `BRANCHBOARD_CURRENCY_CODE`
    /// - `BRANCHBOARD_CURRENCY_SYMBOL`
    /// - `BRANCHBOARD_CURRENCY_DECIMALS`: 0 to 4
    /// - `BRANCHBOARD_RECENT_ACTIVITY_LIMIT`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`StoreConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = StoreConfig::default();

        let tolerance: i64 = parse_or(
            &lookup,
            "BRANCHBOARD_AMOUNT_TOLERANCE",
            defaults.amount_tolerance.minor(),
        )?;
        if tolerance < 0 {
            return Err(ConfigError::InvalidValue(
                "BRANCHBOARD_AMOUNT_TOLERANCE".to_string(),
            ));
        }

        let currency_decimals: u8 = parse_or(
            &lookup,
            "BRANCHBOARD_CURRENCY_DECIMALS",
            defaults.currency_decimals,
        )?;
        if currency_decimals > MAX_CURRENCY_DECIMALS {
            return Err(ConfigError::InvalidValue(
                "BRANCHBOARD_CURRENCY_DECIMALS".to_string(),
            ));
        }

        Ok(StoreConfig {
            amount_tolerance: Money::from_minor(tolerance),
            currency_code: lookup("BRANCHBOARD_CURRENCY_CODE").unwrap_or(defaults.currency_code),
            currency_symbol: lookup("BRANCHBOARD_CURRENCY_SYMBOL")
                .unwrap_or(defaults.currency_symbol),
            currency_decimals,
            recent_activity_limit: parse_or(
                &lookup,
                "BRANCHBOARD_RECENT_ACTIVITY_LIMIT",
                defaults.recent_activity_limit,
            )?,
        })
    }

    /// Formats an amount for display.
    ///
    /// ## Example
    /// ```rust
    /// use branchboard_core::Money;
    /// use branchboard_store::StoreConfig;
    ///
    /// let config = StoreConfig::default();
    /// assert_eq!(config.format_currency(Money::from_minor(84_550)), "৳84550");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let minor = amount.minor();
        let sign = if minor < 0 { "-" } else { "" };
        let magnitude = minor.unsigned_abs();

        if self.currency_decimals == 0 {
            return format!("{sign}{}{magnitude}", self.currency_symbol);
        }

        let divisor = 10_u64.pow(u32::from(self.currency_decimals));
        format!(
            "{sign}{}{}.{:0width$}",
            self.currency_symbol,
            magnitude / divisor,
            magnitude % divisor,
            width = usize::from(self.currency_decimals)
        )
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = StoreConfig::from_lookup(vars(&[])).unwrap();
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.amount_tolerance, Money::zero());
        assert_eq!(config.recent_activity_limit, 5);
    }

    #[test]
    fn test_overrides() {
        let config = StoreConfig::from_lookup(vars(&[
            ("BRANCHBOARD_AMOUNT_TOLERANCE", "2"),
            ("BRANCHBOARD_CURRENCY_CODE", "USD"),
            ("BRANCHBOARD_CURRENCY_SYMBOL", "$"),
            ("BRANCHBOARD_CURRENCY_DECIMALS", "2"),
            ("BRANCHBOARD_RECENT_ACTIVITY_LIMIT", " 10 "),
        ]))
        .unwrap();

        assert_eq!(config.amount_tolerance, Money::from_minor(2));
        assert_eq!(config.currency_code, "USD");
        assert_eq!(config.currency_decimals, 2);
        assert_eq!(config.recent_activity_limit, 10);
    }

    #[test]
    fn test_invalid_values_name_the_variable() {
        let err = StoreConfig::from_lookup(vars(&[("BRANCHBOARD_AMOUNT_TOLERANCE", "abc")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue("BRANCHBOARD_AMOUNT_TOLERANCE".to_string())
        );

        let err = StoreConfig::from_lookup(vars(&[("BRANCHBOARD_AMOUNT_TOLERANCE", "-1")]))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for BRANCHBOARD_AMOUNT_TOLERANCE");

        assert!(
            StoreConfig::from_lookup(vars(&[("BRANCHBOARD_CURRENCY_DECIMALS", "5")])).is_err()
        );
        assert!(
            StoreConfig::from_lookup(vars(&[("BRANCHBOARD_RECENT_ACTIVITY_LIMIT", "-3")]))
                .is_err()
        );
    }

    #[test]
    fn test_format_currency_whole_units() {
        let config = StoreConfig::default();
        assert_eq!(config.format_currency(Money::from_minor(89_000)), "৳89000");
        assert_eq!(config.format_currency(Money::zero()), "৳0");
        assert_eq!(config.format_currency(Money::from_minor(-12)), "-৳12");
    }

    #[test]
    fn test_format_currency_with_decimals() {
        let config = StoreConfig {
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
            ..StoreConfig::default()
        };
        assert_eq!(config.format_currency(Money::from_minor(1234)), "$12.34");
        assert_eq!(config.format_currency(Money::from_minor(1)), "$0.01");
        assert_eq!(config.format_currency(Money::from_minor(-1234)), "-$12.34");
    }
}
