//! Shared checks for solver integration tests.

use procure::{
    goods::Good,
    problem::VendorProblem,
    solution::{VendorSolution, cost_of_purchases},
};

/// Check a solution against every rule of its problem, returning the first violation.
pub fn check_solution<G: Good>(
    problem: &VendorProblem<G>,
    solution: &VendorSolution<G>,
) -> Result<(), String> {
    for (good, sought) in problem.good_quantities_sought() {
        let bought = solution.quantity_of(good);

        if bought != u64::from(*sought) {
            return Err(format!("{good:?}: sought {sought}, bought {bought}"));
        }
    }

    for purchase in solution.purchases_to_make() {
        if purchase.quantity() == 0 {
            return Err(format!("zero quantity purchase from {}", purchase.option().vendor()));
        }

        if purchase.quantity() > purchase.option().available_quantity() {
            return Err(format!(
                "{:?} from {}: bought {} of {}",
                purchase.option().good(),
                purchase.option().vendor(),
                purchase.quantity(),
                purchase.option().available_quantity()
            ));
        }

        if !problem.purchase_options().contains(purchase.option()) {
            return Err(format!("purchase from unknown offer {:?}", purchase.option()));
        }
    }

    for (vendor, spend) in solution.spend_by_vendor() {
        if let Some(minimum) = problem.minimum_purchase_for(vendor) {
            if spend < minimum {
                return Err(format!("{vendor}: spend {spend} below minimum {minimum}"));
            }
        }
    }

    if cost_of_purchases(solution.purchases_to_make()) != Some(solution.total_cost()) {
        return Err(format!(
            "reported total {} does not match purchases",
            solution.total_cost()
        ));
    }

    let fees: i64 = solution
        .vendors()
        .into_iter()
        .map(|vendor| problem.fee_for(vendor))
        .sum();

    if fees != solution.vendor_fees() {
        return Err(format!(
            "reported fees {} do not match vendors used ({fees})",
            solution.vendor_fees()
        ));
    }

    Ok(())
}
