//! Vendor Solutions

use rustc_hash::FxHashMap;

use crate::{goods::Good, offers::PurchaseOption};

/// How many units to buy from one offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseToMake<G: Good> {
    quantity: u32,
    option: PurchaseOption<G>,
}

impl<G: Good> PurchaseToMake<G> {
    /// Creates a new purchase instruction.
    pub fn new(quantity: u32, option: PurchaseOption<G>) -> Self {
        Self { quantity, option }
    }

    /// Number of units to buy (always positive in a solution).
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// The offer to buy from.
    pub fn option(&self) -> &PurchaseOption<G> {
        &self.option
    }

    /// Line cost (`quantity * price`), or `None` on overflow.
    pub fn cost(&self) -> Option<i64> {
        self.option.cost_of(self.quantity)
    }
}

/// A chosen purchase plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorSolution<G: Good> {
    purchases_to_make: Vec<PurchaseToMake<G>>,
    total_cost: i64,
    vendor_fees: i64,
}

impl<G: Good> VendorSolution<G> {
    /// Creates a solution from purchases and their already-computed costs.
    ///
    /// `total_cost` covers the goods only; `vendor_fees` is the sum of fixed fees for every
    /// vendor purchased from.
    pub fn new(purchases_to_make: Vec<PurchaseToMake<G>>, total_cost: i64, vendor_fees: i64) -> Self {
        Self {
            purchases_to_make,
            total_cost,
            vendor_fees,
        }
    }

    /// A solution that buys nothing.
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0, 0)
    }

    /// Purchases to make; every entry has a positive quantity.
    pub fn purchases_to_make(&self) -> &[PurchaseToMake<G>] {
        &self.purchases_to_make
    }

    /// Consume the solution, returning the purchases to make.
    pub fn into_purchases(self) -> Vec<PurchaseToMake<G>> {
        self.purchases_to_make
    }

    /// Cost of the goods, in minor units.
    pub fn total_cost(&self) -> i64 {
        self.total_cost
    }

    /// Fixed vendor fees incurred, in minor units.
    pub fn vendor_fees(&self) -> i64 {
        self.vendor_fees
    }

    /// Goods plus vendor fees.
    pub fn grand_total(&self) -> i64 {
        self.total_cost.saturating_add(self.vendor_fees)
    }

    /// Whether nothing is bought.
    pub fn is_empty(&self) -> bool {
        self.purchases_to_make.is_empty()
    }

    /// Total units of `good` bought across every vendor.
    pub fn quantity_of(&self, good: &G) -> u64 {
        self.purchases_to_make
            .iter()
            .filter(|purchase| purchase.option().good() == good)
            .map(|purchase| u64::from(purchase.quantity()))
            .sum()
    }

    /// Spend per vendor in minor units, excluding fees.
    pub fn spend_by_vendor(&self) -> FxHashMap<&str, i64> {
        let mut spend: FxHashMap<&str, i64> = FxHashMap::default();

        for purchase in &self.purchases_to_make {
            let entry = spend.entry(purchase.option().vendor()).or_default();
            *entry = entry.saturating_add(purchase.cost().unwrap_or(i64::MAX));
        }

        spend
    }

    /// Vendors purchased from, in order of first purchase.
    pub fn vendors(&self) -> Vec<&str> {
        let mut vendors: Vec<&str> = Vec::new();

        for purchase in &self.purchases_to_make {
            if !vendors.contains(&purchase.option().vendor()) {
                vendors.push(purchase.option().vendor());
            }
        }

        vendors
    }
}

/// Sum of `quantity * price` over `purchases`, or `None` on overflow.
pub fn cost_of_purchases<G: Good>(purchases: &[PurchaseToMake<G>]) -> Option<i64> {
    purchases
        .iter()
        .try_fold(0_i64, |total, purchase| total.checked_add(purchase.cost()?))
}
