//! Allocation Config
//!
//! ```yaml
//! currency: GBP
//! maximum_price: "1.00 GBP"
//! default_minimum_spend: "5.00 GBP"
//! vendor_minimums:
//!   Merchant2: "10.00 GBP"
//! vendor_fees:
//!   Merchant1: "0.99 GBP"
//! vendor_blacklist: [Merchant9]
//! strategy: milp
//! big_m: derived
//! exclude_unavailable: false
//! ```
//!
//! Every field is optional. Money amounts must be in the configured currency.

use std::{fs, path::Path};

use rustc_hash::{FxHashMap, FxHashSet};
use rusty_money::{
    Findable,
    iso::{self, Currency},
};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    prices::{PriceError, parse_price},
    solvers::milp::BigM,
};

/// Config Errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading the config file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid money amount
    #[error(transparent)]
    Price(#[from] PriceError),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Amount given in a different currency from the config's
    #[error("Currency mismatch: expected {expected}, found {found}")]
    CurrencyMismatch {
        /// The config's currency
        expected: &'static str,

        /// The currency the amount was written in
        found: &'static str,
    },
}

/// Which optimizer an [`Allocator`](crate::allocator::Allocator) runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Exact, threshold-aware MILP
    #[default]
    Milp,

    /// Cheapest-offer-first, ignores minimum spends
    Greedy,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum BigMKeyword {
    Derived,
    Reference,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum BigMField {
    Keyword(BigMKeyword),
    Fixed(u64),
}

impl From<BigMField> for BigM {
    fn from(field: BigMField) -> Self {
        match field {
            BigMField::Keyword(BigMKeyword::Derived) => BigM::Derived,
            BigMField::Keyword(BigMKeyword::Reference) => BigM::reference(),
            BigMField::Fixed(big_m) => BigM::Fixed(big_m),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    currency: Option<String>,
    maximum_price: Option<String>,
    default_minimum_spend: Option<String>,
    vendor_minimums: FxHashMap<String, String>,
    vendor_fees: FxHashMap<String, String>,
    vendor_blacklist: Vec<String>,
    strategy: Strategy,
    big_m: Option<BigMField>,
    exclude_unavailable: bool,
}

/// Settings for preparing and solving allocation problems.
#[derive(Debug, Clone)]
pub struct AllocationConfig {
    /// Currency every amount is expressed in
    pub currency: &'static Currency,

    /// Goods whose every offer costs more than this are excluded as too expensive
    pub maximum_price: Option<i64>,

    /// Minimum spend for vendors without their own entry in `vendor_minimums`
    pub default_minimum_spend: Option<i64>,

    /// Per-vendor minimum spends
    pub vendor_minimums: FxHashMap<String, i64>,

    /// Per-vendor fixed fees
    pub vendor_fees: FxHashMap<String, i64>,

    /// Vendors whose offers are ignored
    pub vendor_blacklist: FxHashSet<String>,

    /// Optimizer to run
    pub strategy: Strategy,

    /// Big-M policy for the MILP optimizer
    pub big_m: BigM,

    /// Report goods with no offers as excluded instead of failing the solve
    pub exclude_unavailable: bool,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            currency: iso::GBP,
            maximum_price: None,
            default_minimum_spend: None,
            vendor_minimums: FxHashMap::default(),
            vendor_fees: FxHashMap::default(),
            vendor_blacklist: FxHashSet::default(),
            strategy: Strategy::default(),
            big_m: BigM::default(),
            exclude_unavailable: false,
        }
    }
}

impl AllocationConfig {
    /// Load a config from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or is invalid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Parse a config from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the YAML or any amount in it is invalid.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_norway::from_str(contents)?;

        let currency = match file.currency {
            Some(code) => {
                Currency::find(&code).ok_or_else(|| ConfigError::UnknownCurrency(code.clone()))?
            }
            None => iso::GBP,
        };

        let amount = |value: &str| parse_amount(value, currency);

        Ok(Self {
            currency,
            maximum_price: file.maximum_price.as_deref().map(amount).transpose()?,
            default_minimum_spend: file
                .default_minimum_spend
                .as_deref()
                .map(amount)
                .transpose()?,
            vendor_minimums: file
                .vendor_minimums
                .into_iter()
                .map(|(vendor, value)| Ok((vendor, amount(&value)?)))
                .collect::<Result<_, ConfigError>>()?,
            vendor_fees: file
                .vendor_fees
                .into_iter()
                .map(|(vendor, value)| Ok((vendor, amount(&value)?)))
                .collect::<Result<_, ConfigError>>()?,
            vendor_blacklist: file.vendor_blacklist.into_iter().collect(),
            strategy: file.strategy,
            big_m: file.big_m.map(BigM::from).unwrap_or_default(),
            exclude_unavailable: file.exclude_unavailable,
        })
    }

    /// Minimum spend that applies to `vendor`, if any.
    pub fn minimum_for(&self, vendor: &str) -> Option<i64> {
        self.vendor_minimums
            .get(vendor)
            .copied()
            .or(self.default_minimum_spend)
            .filter(|minimum| *minimum > 0)
    }

    /// Whether offers from `vendor` are ignored.
    pub fn is_blacklisted(&self, vendor: &str) -> bool {
        self.vendor_blacklist.contains(vendor)
    }
}

fn parse_amount(value: &str, currency: &'static Currency) -> Result<i64, ConfigError> {
    let (minor_units, found) = parse_price(value)?;

    if found != currency {
        return Err(ConfigError::CurrencyMismatch {
            expected: currency.iso_alpha_code,
            found: found.iso_alpha_code,
        });
    }

    Ok(minor_units)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn empty_config_uses_defaults() -> TestResult {
        let config = AllocationConfig::from_yaml("{}")?;

        assert_eq!(config.currency, iso::GBP);
        assert_eq!(config.strategy, Strategy::Milp);
        assert_eq!(config.big_m, BigM::Derived);
        assert!(config.maximum_price.is_none());
        assert!(!config.exclude_unavailable);

        Ok(())
    }

    #[test]
    fn parses_every_field() -> TestResult {
        let config = AllocationConfig::from_yaml(
            r#"
currency: USD
maximum_price: "1.00 USD"
default_minimum_spend: "5.00 USD"
vendor_minimums:
  Merchant2: "10.00 USD"
vendor_fees:
  Merchant1: "0.99 USD"
vendor_blacklist: [Merchant9]
strategy: greedy
big_m: 5000
exclude_unavailable: true
"#,
        )?;

        assert_eq!(config.currency, iso::USD);
        assert_eq!(config.maximum_price, Some(100));
        assert_eq!(config.minimum_for("Merchant1"), Some(500));
        assert_eq!(config.minimum_for("Merchant2"), Some(1000));
        assert_eq!(config.vendor_fees.get("Merchant1"), Some(&99));
        assert!(config.is_blacklisted("Merchant9"));
        assert_eq!(config.strategy, Strategy::Greedy);
        assert_eq!(config.big_m, BigM::Fixed(5000));
        assert!(config.exclude_unavailable);

        Ok(())
    }

    #[test]
    fn big_m_keywords() -> TestResult {
        assert_eq!(
            AllocationConfig::from_yaml("big_m: derived")?.big_m,
            BigM::Derived
        );
        assert_eq!(
            AllocationConfig::from_yaml("big_m: reference")?.big_m,
            BigM::reference()
        );

        Ok(())
    }

    #[test]
    fn amounts_must_match_the_config_currency() {
        let result = AllocationConfig::from_yaml("maximum_price: \"1.00 USD\"");

        assert!(
            matches!(
                result,
                Err(ConfigError::CurrencyMismatch {
                    expected: "GBP",
                    found: "USD"
                })
            ),
            "expected a currency mismatch, got {result:?}"
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = AllocationConfig::from_yaml("maximum_prise: \"1.00 GBP\"");

        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn zero_minimum_means_no_minimum() -> TestResult {
        let config = AllocationConfig::from_yaml(
            r#"
default_minimum_spend: "2.00 GBP"
vendor_minimums:
  Merchant1: "0 GBP"
"#,
        )?;

        assert_eq!(config.minimum_for("Merchant1"), None);
        assert_eq!(config.minimum_for("Merchant2"), Some(200));

        Ok(())
    }

    #[test]
    fn loads_config_fixture_files() -> TestResult {
        let config = AllocationConfig::from_file("./fixtures/config/default.yml")?;

        assert_eq!(config.strategy, Strategy::Milp);

        Ok(())
    }
}
