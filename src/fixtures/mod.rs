//! Fixtures
//!
//! Problem sets live in `fixtures/problems/<name>.yml`:
//!
//! ```yaml
//! currency: GBP
//! sought:
//!   apple: 1
//!   banana: 2
//! vendors:
//!   Merchant1:
//!     minimum: "2.00 GBP"
//!     fee: "0.50 GBP"
//! offers:
//!   - { good: apple, vendor: Merchant1, quantity: 100, price: "1.12 GBP" }
//! ```

use std::{fs, path::PathBuf};

use rustc_hash::FxHashMap;
use rusty_money::{Findable, iso::Currency};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    offers::PurchaseOption,
    prices::{PriceError, parse_price},
    problem::VendorProblem,
};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price
    #[error(transparent)]
    Price(#[from] PriceError),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between the fixture and one of its amounts
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProblemFile {
    currency: String,

    #[serde(default)]
    sought: FxHashMap<String, u32>,

    #[serde(default)]
    vendors: FxHashMap<String, VendorFixture>,

    #[serde(default)]
    offers: Vec<OfferFixture>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct VendorFixture {
    minimum: Option<String>,
    fee: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct OfferFixture {
    good: String,
    vendor: String,
    quantity: u32,
    price: String,
}

/// A vendor problem loaded from YAML.
#[derive(Debug, Clone)]
pub struct ProblemFixture {
    currency: &'static Currency,
    sought: Vec<(String, u32)>,
    options: Vec<PurchaseOption<String>>,
    minimums: FxHashMap<String, i64>,
    fees: FxHashMap<String, i64>,
}

impl ProblemFixture {
    /// Load `fixtures/problems/<name>.yml` relative to the working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if its amounts are invalid.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::from_set_in("./fixtures", name)
    }

    /// Load `<base_path>/problems/<name>.yml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if its amounts are invalid.
    pub fn from_set_in(base_path: impl Into<PathBuf>, name: &str) -> Result<Self, FixtureError> {
        let file_path = base_path
            .into()
            .join("problems")
            .join(format!("{name}.yml"));

        let contents = fs::read_to_string(&file_path)?;

        Self::from_yaml(&contents)
    }

    /// Parse a problem set from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or any amount is not in the fixture's currency.
    pub fn from_yaml(contents: &str) -> Result<Self, FixtureError> {
        let file: ProblemFile = serde_norway::from_str(contents)?;

        let currency = Currency::find(&file.currency)
            .ok_or_else(|| FixtureError::UnknownCurrency(file.currency.clone()))?;

        let amount = |value: &str| -> Result<i64, FixtureError> {
            let (minor_units, found) = parse_price(value)?;

            if found != currency {
                return Err(FixtureError::CurrencyMismatch(
                    currency.iso_alpha_code.to_string(),
                    found.iso_alpha_code.to_string(),
                ));
            }

            Ok(minor_units)
        };

        let mut minimums = FxHashMap::default();
        let mut fees = FxHashMap::default();

        for (vendor, fixture) in file.vendors {
            if let Some(minimum) = fixture.minimum.as_deref() {
                minimums.insert(vendor.clone(), amount(minimum)?);
            }

            if let Some(fee) = fixture.fee.as_deref() {
                fees.insert(vendor, amount(fee)?);
            }
        }

        let options = file
            .offers
            .into_iter()
            .map(|offer| {
                Ok(PurchaseOption::new(
                    offer.good,
                    offer.vendor,
                    offer.quantity,
                    amount(&offer.price)?,
                ))
            })
            .collect::<Result<Vec<_>, FixtureError>>()?;

        let mut sought: Vec<(String, u32)> = file.sought.into_iter().collect();
        sought.sort();

        Ok(Self {
            currency,
            sought,
            options,
            minimums,
            fees,
        })
    }

    /// Currency every amount in the fixture is expressed in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Quantities sought, sorted by good.
    pub fn sought(&self) -> &[(String, u32)] {
        &self.sought
    }

    /// Offers in file order.
    pub fn options(&self) -> &[PurchaseOption<String>] {
        &self.options
    }

    /// Minimum spend per vendor.
    pub fn minimums(&self) -> &FxHashMap<String, i64> {
        &self.minimums
    }

    /// Fixed fee per vendor.
    pub fn fees(&self) -> &FxHashMap<String, i64> {
        &self.fees
    }

    /// Build the vendor problem described by the fixture.
    pub fn problem(&self) -> VendorProblem<String> {
        VendorProblem::new(
            self.sought.iter().cloned(),
            self.options.iter().cloned(),
            self.minimums.iter().map(|(vendor, minimum)| (vendor.clone(), *minimum)),
        )
        .with_vendor_fees(self.fees.iter().map(|(vendor, fee)| (vendor.clone(), *fee)))
    }
}
