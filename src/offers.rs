//! Purchase Options

use crate::goods::Good;

/// A single vendor's offer for a single good.
///
/// Prices are integers in minor currency units (pence, cents) so the optimisation stays exact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PurchaseOption<G: Good> {
    good: G,
    vendor: String,
    available_quantity: u32,
    price: i64,
}

impl<G: Good> PurchaseOption<G> {
    /// Creates a new purchase option.
    pub fn new(good: G, vendor: impl Into<String>, available_quantity: u32, price: i64) -> Self {
        Self {
            good,
            vendor: vendor.into(),
            available_quantity,
            price,
        }
    }

    /// The good on offer.
    pub fn good(&self) -> &G {
        &self.good
    }

    /// Name of the vendor making the offer.
    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    /// Maximum number of units that can be bought from this offer.
    pub fn available_quantity(&self) -> u32 {
        self.available_quantity
    }

    /// Unit price in minor units.
    pub fn price(&self) -> i64 {
        self.price
    }

    /// Cost of buying `quantity` units from this offer, or `None` on overflow.
    pub fn cost_of(&self, quantity: u32) -> Option<i64> {
        self.price.checked_mul(i64::from(quantity))
    }
}

/// Returns the cheapest offer in a list of offers.
pub fn cheapest_option<'a, G: Good>(
    options: impl IntoIterator<Item = &'a PurchaseOption<G>>,
) -> Option<&'a PurchaseOption<G>> {
    options.into_iter().min_by_key(|option| option.price())
}
