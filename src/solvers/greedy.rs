//! Greedy Solver
//!
//! Buys each good from its cheapest offers first, ignoring vendors entirely. Minimum spends and
//! vendor fees play no part in the choice, so this is only cost-optimal when neither is
//! configured. Fees of the vendors it ends up using are still reported. It is kept as a fast
//! baseline to compare the MILP engine against.

use tracing::{debug, warn};

use crate::{
    goods::Good,
    offers::PurchaseOption,
    problem::VendorProblem,
    solution::{PurchaseToMake, VendorSolution, cost_of_purchases},
    solvers::{Optimizer, SolverError, UnsolvableError},
};

/// Cheapest-offer-first strategy that ignores minimum spends.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreedyOptimizer;

impl Optimizer for GreedyOptimizer {
    fn name(&self) -> &'static str {
        "greedy"
    }

    #[tracing::instrument(
        name = "greedy.solve",
        skip_all,
        fields(
            goods = problem.good_quantities_sought().len(),
            options = problem.purchase_options().len(),
        )
    )]
    fn solve<G: Good>(&self, problem: &VendorProblem<G>) -> Result<VendorSolution<G>, SolverError> {
        if problem.has_thresholds() {
            warn!("greedy strategy ignores the configured vendor minimum spends");
        }

        let mut purchases = Vec::new();

        for (good, &sought) in problem.good_quantities_sought() {
            let options: Vec<&PurchaseOption<G>> =
                problem.options_for_good(good).map(|(_, option)| option).collect();

            if options.is_empty() {
                return Err(UnsolvableError::unavailable_good(good).into());
            }

            purchases.extend(greedy_purchases(good, sought, options)?);
        }

        let total_cost = cost_of_purchases(&purchases).ok_or(SolverError::CostOverflow)?;
        let vendor_fees = fees_incurred(problem, &purchases).ok_or(SolverError::CostOverflow)?;

        debug!(
            purchases = purchases.len(),
            total_cost,
            vendor_fees,
            "greedy allocation complete"
        );

        Ok(VendorSolution::new(purchases, total_cost, vendor_fees))
    }
}

/// Fees of every vendor bought from, or `None` on overflow.
fn fees_incurred<G: Good>(
    problem: &VendorProblem<G>,
    purchases: &[PurchaseToMake<G>],
) -> Option<i64> {
    let mut vendors: Vec<&str> = purchases
        .iter()
        .map(|purchase| purchase.option().vendor())
        .collect();

    vendors.sort_unstable();
    vendors.dedup();

    vendors
        .into_iter()
        .try_fold(0_i64, |total, vendor| total.checked_add(problem.fee_for(vendor).max(0)))
}

/// Consume offers for one good in ascending price order until `sought` units are covered.
///
/// The sort is stable, so equally priced offers are used in the order they were given.
fn greedy_purchases<G: Good>(
    good: &G,
    sought: u32,
    mut options: Vec<&PurchaseOption<G>>,
) -> Result<Vec<PurchaseToMake<G>>, UnsolvableError> {
    options.sort_by_key(|option| option.price());

    let mut purchases = Vec::new();
    let mut remaining = sought;

    for option in options {
        if remaining == 0 {
            break;
        }

        let quantity = option.available_quantity().min(remaining);

        if quantity == 0 {
            continue;
        }

        purchases.push(PurchaseToMake::new(quantity, option.clone()));
        remaining -= quantity;
    }

    if remaining > 0 {
        return Err(UnsolvableError::InsufficientSupply {
            good: format!("{good:?}"),
            sought,
            available: u64::from(sought - remaining),
        });
    }

    Ok(purchases)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn single_option_covers_demand() -> TestResult {
        let problem = VendorProblem::without_minimums(
            [("apple", 1)],
            [PurchaseOption::new("apple", "Merchant1", 100, 112)],
        );

        let solution = GreedyOptimizer.solve(&problem)?;

        assert_eq!(
            solution.purchases_to_make(),
            [PurchaseToMake::new(
                1,
                PurchaseOption::new("apple", "Merchant1", 100, 112)
            )]
        );
        assert_eq!(solution.total_cost(), 112);

        Ok(())
    }

    #[test]
    fn buys_in_ascending_price_order_across_vendors() -> TestResult {
        let purchases = greedy_purchases(
            &"apple",
            10,
            vec![
                &PurchaseOption::new("apple", "Merchant1", 100, 112),
                &PurchaseOption::new("apple", "Merchant2", 1, 1),
                &PurchaseOption::new("apple", "Merchant3", 3, 2),
            ],
        )?;

        assert_eq!(
            purchases,
            vec![
                PurchaseToMake::new(1, PurchaseOption::new("apple", "Merchant2", 1, 1)),
                PurchaseToMake::new(3, PurchaseOption::new("apple", "Merchant3", 3, 2)),
                PurchaseToMake::new(6, PurchaseOption::new("apple", "Merchant1", 100, 112)),
            ]
        );

        Ok(())
    }

    #[test]
    fn skips_empty_offers() -> TestResult {
        let purchases = greedy_purchases(
            &"apple",
            2,
            vec![
                &PurchaseOption::new("apple", "Merchant1", 0, 1),
                &PurchaseOption::new("apple", "Merchant2", 5, 3),
            ],
        )?;

        assert_eq!(
            purchases,
            vec![PurchaseToMake::new(2, PurchaseOption::new("apple", "Merchant2", 5, 3))]
        );

        Ok(())
    }

    #[test]
    fn insufficient_supply_fails_instead_of_partially_filling() {
        let result = greedy_purchases(
            &"apple",
            10,
            vec![
                &PurchaseOption::new("apple", "Merchant1", 4, 2),
                &PurchaseOption::new("apple", "Merchant2", 5, 3),
            ],
        );

        assert_eq!(
            result,
            Err(UnsolvableError::InsufficientSupply {
                good: "\"apple\"".to_string(),
                sought: 10,
                available: 9,
            })
        );
    }

    #[test]
    fn good_without_offers_is_unavailable() {
        let problem = VendorProblem::without_minimums(
            [("banana", 10)],
            [PurchaseOption::new("apple", "Merchant1", 100, 112)],
        );

        let err = GreedyOptimizer.solve(&problem).err();

        assert!(
            matches!(
                err,
                Some(SolverError::Unsolvable(UnsolvableError::UnavailableGood { .. }))
            ),
            "expected an unavailable good error, got {err:?}"
        );
    }

    #[test]
    fn nothing_sought_buys_nothing() -> TestResult {
        let problem = VendorProblem::without_minimums(
            Vec::<(&str, u32)>::new(),
            [PurchaseOption::new("apple", "Merchant1", 100, 112)],
        );

        let solution = GreedyOptimizer.solve(&problem)?;

        assert!(solution.is_empty());
        assert_eq!(solution.total_cost(), 0);

        Ok(())
    }

    #[test]
    fn reports_fees_of_vendors_used() -> TestResult {
        let problem = VendorProblem::without_minimums(
            [("apple", 2), ("banana", 1)],
            [
                PurchaseOption::new("apple", "Merchant1", 1, 10),
                PurchaseOption::new("apple", "Merchant2", 5, 20),
                PurchaseOption::new("banana", "Merchant1", 5, 5),
                PurchaseOption::new("banana", "Merchant3", 5, 50),
            ],
        )
        .with_vendor_fees([("Merchant1", 100), ("Merchant2", 7), ("Merchant3", 1000)]);

        let solution = GreedyOptimizer.solve(&problem)?;

        assert_eq!(solution.total_cost(), 10 + 20 + 5);
        assert_eq!(solution.vendor_fees(), 107);

        Ok(())
    }
}
