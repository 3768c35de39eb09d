//! Allocator
//!
//! Turns raw wants and offers into a [`VendorProblem`] according to an [`AllocationConfig`],
//! then runs the configured optimizer. Goods dropped on the way are reported back rather than
//! silently ignored.

use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    config::{AllocationConfig, Strategy},
    goods::Good,
    offers::{PurchaseOption, cheapest_option},
    problem::VendorProblem,
    solution::VendorSolution,
    solvers::{Optimizer, SolverError, greedy::GreedyOptimizer, milp::MilpOptimizer},
};

/// Allocation Errors
#[derive(Debug, Error)]
pub enum AllocationError {
    /// The greedy strategy was configured but vendors have minimum spends
    #[error("greedy strategy cannot honour vendor minimum spends; use the milp strategy")]
    GreedyWithThresholds,

    /// Repeated lines for one good add up to more than `u32::MAX`
    #[error("quantity sought for {good} overflows")]
    QuantityOverflow {
        /// The good, formatted for display
        good: String,
    },

    /// The optimizer failed
    #[error(transparent)]
    Solver(#[from] SolverError),
}

/// Why a sought good was left out of the problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionReason {
    /// Every offer costs more than the configured maximum price
    TooExpensive {
        /// Cheapest price on offer, in minor units
        cheapest: i64,
    },

    /// Nothing is offered (reported when `exclude_unavailable` is set or a maximum price is
    /// configured)
    NoOffers,
}

/// A sought good left out of the problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludedGood<G: Good> {
    /// The good
    pub good: G,

    /// Quantity that was sought
    pub quantity: u32,

    /// Why it was left out
    pub reason: ExclusionReason,
}

/// A problem ready to solve, plus the goods left out of it.
#[derive(Debug, Clone)]
pub struct PreparedProblem<G: Good> {
    /// The problem to solve
    pub problem: VendorProblem<G>,

    /// Goods that were sought but left out
    pub excluded: Vec<ExcludedGood<G>>,
}

/// A solved allocation, plus the goods left out of it.
#[derive(Debug, Clone)]
pub struct Allocation<G: Good> {
    /// The chosen purchases
    pub solution: VendorSolution<G>,

    /// Goods that were sought but not bought
    pub excluded: Vec<ExcludedGood<G>>,
}

/// Prepares and solves allocation problems under one config.
#[derive(Debug, Clone, Default)]
pub struct Allocator {
    config: AllocationConfig,
}

impl Allocator {
    /// Create an allocator from a config.
    pub fn from_config(config: AllocationConfig) -> Self {
        Self { config }
    }

    /// The config in use.
    pub fn config(&self) -> &AllocationConfig {
        &self.config
    }

    /// Build the problem to solve.
    ///
    /// Offers from blacklisted vendors are dropped first. Repeated lines for the same good are
    /// added together. A sought good is then excluded when every remaining offer is above the
    /// maximum price, or when it has no offers and either `exclude_unavailable` is set or a
    /// maximum price is configured. Minimums and fees apply to every vendor left with an offer.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError::QuantityOverflow`] if the lines for one good add up to more
    /// than `u32::MAX`.
    pub fn prepare<G: Good>(
        &self,
        sought: impl IntoIterator<Item = (G, u32)>,
        options: impl IntoIterator<Item = PurchaseOption<G>>,
    ) -> Result<PreparedProblem<G>, AllocationError> {
        let options: Vec<PurchaseOption<G>> = options
            .into_iter()
            .filter(|option| !self.config.is_blacklisted(option.vendor()))
            .collect();

        let mut kept = Vec::new();
        let mut excluded = Vec::new();

        for (good, quantity) in combine_lines(sought)? {
            let cheapest = cheapest_option(options.iter().filter(|option| option.good() == &good))
                .map(PurchaseOption::price);

            let reason = match (cheapest, self.config.maximum_price) {
                (Some(cheapest), Some(maximum)) if cheapest > maximum => {
                    Some(ExclusionReason::TooExpensive { cheapest })
                }
                (None, Some(_)) => Some(ExclusionReason::NoOffers),
                (None, None) if self.config.exclude_unavailable => Some(ExclusionReason::NoOffers),
                _ => None,
            };

            match reason {
                Some(reason) => {
                    debug!(good = ?good, ?reason, "excluding good");

                    excluded.push(ExcludedGood {
                        good,
                        quantity,
                        reason,
                    });
                }
                None => kept.push((good, quantity)),
            }
        }

        let problem = VendorProblem::without_minimums(kept, options);

        let minimums: Vec<(String, i64)> = problem
            .vendors()
            .iter()
            .filter_map(|vendor| {
                self.config
                    .minimum_for(vendor)
                    .map(|minimum| (vendor.clone(), minimum))
            })
            .collect();

        let fees: Vec<(String, i64)> = problem
            .vendors()
            .iter()
            .filter_map(|vendor| {
                self.config
                    .vendor_fees
                    .get(vendor)
                    .map(|fee| (vendor.clone(), *fee))
            })
            .collect();

        let problem = VendorProblem::new(
            problem.good_quantities_sought().clone(),
            problem.purchase_options().to_vec(),
            minimums,
        )
        .with_vendor_fees(fees);

        Ok(PreparedProblem { problem, excluded })
    }

    /// Prepare and solve in one step.
    ///
    /// # Errors
    ///
    /// Returns an [`AllocationError`] if the sought quantities overflow, the configured
    /// optimizer fails, or the greedy strategy is configured for a problem with minimum spends.
    pub fn allocate<G: Good>(
        &self,
        sought: impl IntoIterator<Item = (G, u32)>,
        options: impl IntoIterator<Item = PurchaseOption<G>>,
    ) -> Result<Allocation<G>, AllocationError> {
        self.solve_prepared(self.prepare(sought, options)?)
    }

    /// Solve an already prepared problem with the configured optimizer.
    ///
    /// # Errors
    ///
    /// Returns an [`AllocationError`] if the configured optimizer fails, or if the greedy
    /// strategy is configured for a problem with minimum spends.
    pub fn solve_prepared<G: Good>(
        &self,
        prepared: PreparedProblem<G>,
    ) -> Result<Allocation<G>, AllocationError> {
        let PreparedProblem { problem, excluded } = prepared;

        let solution = match self.config.strategy {
            Strategy::Milp => run(&MilpOptimizer::with_big_m(self.config.big_m), &problem)?,
            Strategy::Greedy if problem.has_thresholds() => {
                return Err(AllocationError::GreedyWithThresholds);
            }
            Strategy::Greedy => run(&GreedyOptimizer, &problem)?,
        };

        info!(
            purchases = solution.purchases_to_make().len(),
            total_cost = solution.total_cost(),
            vendor_fees = solution.vendor_fees(),
            excluded = excluded.len(),
            "allocation complete"
        );

        Ok(Allocation { solution, excluded })
    }
}

/// Add up repeated lines for the same good, keeping the order goods first appear in.
fn combine_lines<G: Good>(
    sought: impl IntoIterator<Item = (G, u32)>,
) -> Result<Vec<(G, u32)>, AllocationError> {
    let mut totals: FxHashMap<G, u32> = FxHashMap::default();
    let mut order = Vec::new();

    for (good, quantity) in sought {
        match totals.entry(good) {
            Entry::Occupied(mut entry) => {
                let Some(total) = entry.get().checked_add(quantity) else {
                    return Err(AllocationError::QuantityOverflow {
                        good: format!("{:?}", entry.key()),
                    });
                };

                entry.insert(total);
            }
            Entry::Vacant(entry) => {
                order.push(entry.key().clone());
                entry.insert(quantity);
            }
        }
    }

    Ok(order
        .into_iter()
        .filter_map(|good| totals.remove(&good).map(|quantity| (good, quantity)))
        .collect())
}

fn run<G: Good, O: Optimizer>(
    optimizer: &O,
    problem: &VendorProblem<G>,
) -> Result<VendorSolution<G>, SolverError> {
    debug!(strategy = optimizer.name(), "solving");

    optimizer.solve(problem)
}
