//! Vendor Problems

use rustc_hash::FxHashMap;
use smallvec::{SmallVec, smallvec};

use crate::{goods::Good, offers::PurchaseOption};

/// Indexes into [`VendorProblem::purchase_options`].
pub type OptionIndexes = SmallVec<[usize; 4]>;

/// One allocation request: what to buy, what is on offer, and the per-vendor rules.
///
/// The offers are grouped by good and by vendor once, on construction; the problem is read-only
/// afterwards. No feasibility checks happen here, the solvers report those.
#[derive(Debug, Clone)]
pub struct VendorProblem<G: Good> {
    good_quantities_sought: FxHashMap<G, u32>,
    purchase_options: Vec<PurchaseOption<G>>,
    minimum_purchase_by_vendor: FxHashMap<String, i64>,
    vendor_fees: FxHashMap<String, i64>,
    options_by_good: FxHashMap<G, OptionIndexes>,
    options_by_vendor: FxHashMap<String, OptionIndexes>,
    vendors: Vec<String>,
}

impl<G: Good> VendorProblem<G> {
    /// Create a problem with per-vendor minimum spends.
    ///
    /// Vendors without an entry in `minimum_purchase_by_vendor` have no minimum. Repeated
    /// entries for the same good are added together, saturating at `u32::MAX`.
    pub fn new<V: Into<String>>(
        good_quantities_sought: impl IntoIterator<Item = (G, u32)>,
        purchase_options: impl IntoIterator<Item = PurchaseOption<G>>,
        minimum_purchase_by_vendor: impl IntoIterator<Item = (V, i64)>,
    ) -> Self {
        let purchase_options: Vec<PurchaseOption<G>> = purchase_options.into_iter().collect();

        let mut options_by_good: FxHashMap<G, OptionIndexes> = FxHashMap::default();
        let mut options_by_vendor: FxHashMap<String, OptionIndexes> = FxHashMap::default();
        let mut vendors = Vec::new();

        for (idx, option) in purchase_options.iter().enumerate() {
            options_by_good
                .entry(option.good().clone())
                .or_default()
                .push(idx);

            if let Some(indexes) = options_by_vendor.get_mut(option.vendor()) {
                indexes.push(idx);
            } else {
                options_by_vendor.insert(option.vendor().to_string(), smallvec![idx]);
                vendors.push(option.vendor().to_string());
            }
        }

        let mut sought: FxHashMap<G, u32> = FxHashMap::default();

        for (good, quantity) in good_quantities_sought {
            let total = sought.entry(good).or_default();
            *total = total.saturating_add(quantity);
        }

        Self {
            good_quantities_sought: sought,
            purchase_options,
            minimum_purchase_by_vendor: minimum_purchase_by_vendor
                .into_iter()
                .map(|(vendor, minimum)| (vendor.into(), minimum))
                .collect(),
            vendor_fees: FxHashMap::default(),
            options_by_good,
            options_by_vendor,
            vendors,
        }
    }

    /// Create a problem where no vendor has a minimum spend.
    pub fn without_minimums(
        good_quantities_sought: impl IntoIterator<Item = (G, u32)>,
        purchase_options: impl IntoIterator<Item = PurchaseOption<G>>,
    ) -> Self {
        Self::new::<String>(good_quantities_sought, purchase_options, [])
    }

    /// Create a problem where every vendor that has an offer shares the same minimum spend.
    pub fn with_uniform_minimum(
        good_quantities_sought: impl IntoIterator<Item = (G, u32)>,
        purchase_options: impl IntoIterator<Item = PurchaseOption<G>>,
        minimum_purchase: i64,
    ) -> Self {
        let mut problem = Self::without_minimums(good_quantities_sought, purchase_options);

        problem.minimum_purchase_by_vendor = problem
            .vendors
            .iter()
            .map(|vendor| (vendor.clone(), minimum_purchase))
            .collect();

        problem
    }

    /// Attach fixed per-vendor fees, charged once if anything is bought from that vendor.
    #[must_use]
    pub fn with_vendor_fees<V: Into<String>>(
        mut self,
        vendor_fees: impl IntoIterator<Item = (V, i64)>,
    ) -> Self {
        self.vendor_fees = vendor_fees
            .into_iter()
            .map(|(vendor, fee)| (vendor.into(), fee))
            .collect();

        self
    }

    /// Quantity sought for each good.
    pub fn good_quantities_sought(&self) -> &FxHashMap<G, u32> {
        &self.good_quantities_sought
    }

    /// Every offer under consideration.
    pub fn purchase_options(&self) -> &[PurchaseOption<G>] {
        &self.purchase_options
    }

    /// Minimum spend per vendor in minor units; absent vendors have no minimum.
    pub fn minimum_purchase_by_vendor(&self) -> &FxHashMap<String, i64> {
        &self.minimum_purchase_by_vendor
    }

    /// Fixed fee per vendor in minor units; absent vendors have no fee.
    pub fn vendor_fees(&self) -> &FxHashMap<String, i64> {
        &self.vendor_fees
    }

    /// Offer indexes grouped by good.
    pub fn options_by_good(&self) -> &FxHashMap<G, OptionIndexes> {
        &self.options_by_good
    }

    /// Offer indexes grouped by vendor.
    pub fn options_by_vendor(&self) -> &FxHashMap<String, OptionIndexes> {
        &self.options_by_vendor
    }

    /// Vendors with at least one offer, in order of first appearance.
    pub fn vendors(&self) -> &[String] {
        &self.vendors
    }

    /// Offers for a single good, in insertion order.
    pub fn options_for_good<'a>(
        &'a self,
        good: &G,
    ) -> impl Iterator<Item = (usize, &'a PurchaseOption<G>)> + use<'a, G> {
        self.indexed_options(self.options_by_good.get(good))
    }

    /// Offers from a single vendor, in insertion order.
    pub fn options_for_vendor<'a>(
        &'a self,
        vendor: &str,
    ) -> impl Iterator<Item = (usize, &'a PurchaseOption<G>)> + use<'a, G> {
        self.indexed_options(self.options_by_vendor.get(vendor))
    }

    /// Minimum spend for `vendor`, if one applies.
    pub fn minimum_purchase_for(&self, vendor: &str) -> Option<i64> {
        self.minimum_purchase_by_vendor
            .get(vendor)
            .copied()
            .filter(|minimum| *minimum > 0)
    }

    /// Fixed fee for `vendor`, zero if none is configured.
    pub fn fee_for(&self, vendor: &str) -> i64 {
        self.vendor_fees.get(vendor).copied().unwrap_or(0)
    }

    /// Whether any vendor that has an offer also has a minimum spend.
    pub fn has_thresholds(&self) -> bool {
        self.vendors
            .iter()
            .any(|vendor| self.minimum_purchase_for(vendor).is_some())
    }

    /// Total quantity of `good` across all offers.
    pub fn available_quantity_for(&self, good: &G) -> u64 {
        self.options_for_good(good)
            .map(|(_, option)| u64::from(option.available_quantity()))
            .sum()
    }

    /// Total quantity that could be bought from `vendor` across all of its offers.
    pub fn vendor_capacity(&self, vendor: &str) -> u64 {
        self.options_for_vendor(vendor)
            .map(|(_, option)| u64::from(option.available_quantity()))
            .sum()
    }

    /// Sought goods that have no offers at all.
    pub fn unavailable_goods(&self) -> impl Iterator<Item = &G> {
        self.good_quantities_sought
            .keys()
            .filter(|good| !self.options_by_good.contains_key(*good))
    }

    /// Whether nothing is sought.
    pub fn is_empty(&self) -> bool {
        self.good_quantities_sought.is_empty()
    }

    fn indexed_options<'a>(
        &'a self,
        indexes: Option<&'a OptionIndexes>,
    ) -> impl Iterator<Item = (usize, &'a PurchaseOption<G>)> + use<'a, G> {
        indexes
            .into_iter()
            .flatten()
            .filter_map(|&idx| self.purchase_options.get(idx).map(|option| (idx, option)))
    }
}
