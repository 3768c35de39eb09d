//! MILP Solver
//!
//! Formulates a [`VendorProblem`] as a mixed integer linear program:
//!
//! - one integer quantity variable per offer, bounded by the offer's available quantity
//! - one binary buy-flag per vendor, forced on by a big-M linkage when anything is bought
//! - exact demand per sought good
//! - `T * flag - spend <= 0` per vendor with a minimum spend `T`
//!
//! and minimises the cost of the goods plus any fixed vendor fees.

use good_lp::{
    Expression, ResolutionError, Solution, SolutionStatus, SolverModel, Variable, solvers::Solver,
};
use num_traits::ToPrimitive;
use tracing::debug;

#[cfg(feature = "solver-highs")]
use good_lp::solvers::highs::highs as default_solver;
#[cfg(all(not(feature = "solver-highs"), feature = "solver-microlp"))]
use good_lp::solvers::microlp::microlp as default_solver;

use crate::{
    goods::Good,
    problem::VendorProblem,
    solution::{PurchaseToMake, VendorSolution, cost_of_purchases},
    solvers::{Optimizer, SolverError, UnsolvableError},
};

pub mod big_m;
pub mod observer;
pub mod state;
pub mod verify;

pub use big_m::{BigM, REFERENCE_BIG_M};
pub use observer::{MilpObserver, NoopObserver};
pub use state::{ConstraintKind, ConstraintRelation};

use state::{FormulationState, RecordedConstraint};
use verify::{RoundedAssignment, verify_objective, verify_solution};

/// Exact, threshold-aware optimizer.
#[derive(Debug, Default, Clone, Copy)]
pub struct MilpOptimizer {
    big_m: BigM,
}

/// Buy-flag created for one vendor.
#[derive(Debug, Clone, Copy)]
struct BuyFlag<'a> {
    vendor: &'a str,
    var: Variable,
    fee: i64,
}

impl MilpOptimizer {
    /// Optimizer with per-vendor derived big-M constants.
    pub fn new() -> Self {
        Self::default()
    }

    /// Optimizer using the given big-M policy.
    pub fn with_big_m(big_m: BigM) -> Self {
        Self { big_m }
    }

    /// The big-M policy in use.
    pub fn big_m(&self) -> BigM {
        self.big_m
    }

    /// Solve with an observer capturing the formulation.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if the problem has no acceptable solution or cannot be
    /// formulated exactly.
    pub fn solve_with_observer<G: Good, O: MilpObserver + ?Sized>(
        &self,
        problem: &VendorProblem<G>,
        observer: &mut O,
    ) -> Result<VendorSolution<G>, SolverError> {
        self.solve_with_backend(problem, default_solver, observer)
    }

    /// Solve using an explicit `good_lp` backend.
    ///
    /// A fresh model is built for every call, so independent problems may be solved on
    /// independent threads.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if the problem has no acceptable solution or cannot be
    /// formulated exactly.
    #[tracing::instrument(
        name = "milp.solve",
        skip_all,
        fields(
            goods = problem.good_quantities_sought().len(),
            options = problem.purchase_options().len(),
            vendors = problem.vendors().len(),
        )
    )]
    pub fn solve_with_backend<G, S, O>(
        &self,
        problem: &VendorProblem<G>,
        backend: S,
        observer: &mut O,
    ) -> Result<VendorSolution<G>, SolverError>
    where
        G: Good,
        S: Solver,
        S::Model: SolverModel<Error = ResolutionError>,
        O: MilpObserver + ?Sized,
    {
        if problem.is_empty() {
            debug!("nothing sought");

            return Ok(VendorSolution::empty());
        }

        // Structural infeasibility is reported before any model is built.
        if let Some(good) = problem.unavailable_goods().next() {
            return Err(UnsolvableError::unavailable_good(good).into());
        }

        let mut state = FormulationState::new();

        let quantities = add_quantity_variables(problem, &mut state, observer)?;

        add_demand_constraints(problem, &quantities, &mut state, observer)?;

        let flags = add_vendor_constraints(problem, self.big_m, &quantities, &mut state, observer)?;

        debug!(
            constraints = state.constraints().len(),
            flags = flags.len(),
            "formulation built"
        );

        let (pb, cost, variables, constraints) = state.into_parts();

        let model = pb.minimise(cost.clone()).using(backend);
        let model = apply_recorded_constraints(model, &constraints);

        let solution = model.solve().map_err(UnsolvableError::from)?;

        match solution.status() {
            SolutionStatus::Optimal => {}
            status => {
                return Err(UnsolvableError::NotOptimal {
                    status: format!("{status:?}"),
                }
                .into());
            }
        }

        let assignment = verify_solution(&solution, &variables, &constraints)?;

        let purchases = extract_purchases(problem, &quantities, &assignment)?;
        let total_cost = cost_of_purchases(&purchases).ok_or(SolverError::CostOverflow)?;
        let objective = total_cost
            .checked_add(flagged_fees(&flags, &assignment)?)
            .ok_or(SolverError::CostOverflow)?;

        verify_objective(solution.eval(&cost), objective)?;

        let vendor_fees = charged_fees(problem, &flags, &assignment, &quantities)?;
        let solution = VendorSolution::new(purchases, total_cost, vendor_fees);

        debug!(
            purchases = solution.purchases_to_make().len(),
            total_cost = solution.total_cost(),
            vendor_fees = solution.vendor_fees(),
            "optimal allocation verified"
        );

        Ok(solution)
    }
}

impl Optimizer for MilpOptimizer {
    fn name(&self) -> &'static str {
        "milp"
    }

    fn solve<G: Good>(&self, problem: &VendorProblem<G>) -> Result<VendorSolution<G>, SolverError> {
        self.solve_with_observer(problem, &mut NoopObserver)
    }
}

/// Declare one integer variable per offer and add its cost to the objective.
///
/// Offers whose good is not sought are bounded to zero.
///
/// The returned variables are indexed like [`VendorProblem::purchase_options`].
fn add_quantity_variables<G: Good, O: MilpObserver + ?Sized>(
    problem: &VendorProblem<G>,
    state: &mut FormulationState,
    observer: &mut O,
) -> Result<Vec<Variable>, SolverError> {
    problem
        .purchase_options()
        .iter()
        .enumerate()
        .map(|(option_idx, option)| {
            let price = option.price();

            // `good_lp` stores coefficients as `f64`; refuse prices that would silently change.
            let coefficient =
                i64_to_f64_exact(price).ok_or(SolverError::MinorUnitsNotRepresentable(price))?;

            let upper = if problem.good_quantities_sought().contains_key(option.good()) {
                option.available_quantity()
            } else {
                0
            };

            let var = state.add_integer(f64::from(upper));

            state.add_to_objective(var, coefficient);

            observer.on_quantity_variable(option_idx, var, upper, price);
            observer.on_objective_term(var, coefficient);

            Ok(var)
        })
        .collect()
}

/// Every sought good must be bought in exactly the quantity sought.
fn add_demand_constraints<G: Good, O: MilpObserver + ?Sized>(
    problem: &VendorProblem<G>,
    quantities: &[Variable],
    state: &mut FormulationState,
    observer: &mut O,
) -> Result<(), SolverError> {
    for (good, &sought) in problem.good_quantities_sought() {
        let mut bought = Expression::default();

        for (option_idx, _) in problem.options_for_good(good) {
            bought += variable_for(quantities, option_idx)?;
        }

        record(
            state,
            observer,
            ConstraintKind::Demand,
            format!("{good:?}"),
            bought,
            ConstraintRelation::Eq,
            f64::from(sought),
        );
    }

    Ok(())
}

/// Buy-flags, their big-M linkage, minimum spends and vendor fees.
fn add_vendor_constraints<'a, G: Good, O: MilpObserver + ?Sized>(
    problem: &'a VendorProblem<G>,
    big_m: BigM,
    quantities: &[Variable],
    state: &mut FormulationState,
    observer: &mut O,
) -> Result<Vec<BuyFlag<'a>>, SolverError> {
    let mut flags = Vec::with_capacity(problem.vendors().len());

    for vendor in problem.vendors() {
        let big_m = big_m.for_vendor(vendor, problem.vendor_capacity(vendor))?;
        let big_m_coefficient =
            u64_to_f64_exact(big_m).ok_or(SolverError::QuantityNotRepresentable(big_m))?;

        let flag = state.add_binary();

        observer.on_buy_flag(vendor, flag, big_m);

        let mut bought = Expression::default();
        let mut spend = Expression::default();

        for (option_idx, option) in problem.options_for_vendor(vendor) {
            let var = variable_for(quantities, option_idx)?;
            let price = i64_to_f64_exact(option.price())
                .ok_or(SolverError::MinorUnitsNotRepresentable(option.price()))?;

            bought += var;
            spend += var * price;
        }

        record(
            state,
            observer,
            ConstraintKind::BuyFlagLinkage,
            vendor.clone(),
            bought - flag * big_m_coefficient,
            ConstraintRelation::Leq,
            0.0,
        );

        if let Some(minimum) = problem.minimum_purchase_for(vendor) {
            let threshold =
                i64_to_f64_exact(minimum).ok_or(SolverError::MinorUnitsNotRepresentable(minimum))?;

            record(
                state,
                observer,
                ConstraintKind::MinimumSpend,
                vendor.clone(),
                flag * threshold - spend,
                ConstraintRelation::Leq,
                0.0,
            );
        }

        let fee = problem.fee_for(vendor);

        if fee > 0 {
            let coefficient =
                i64_to_f64_exact(fee).ok_or(SolverError::MinorUnitsNotRepresentable(fee))?;

            state.add_to_objective(flag, coefficient);
            observer.on_objective_term(flag, coefficient);
        }

        flags.push(BuyFlag {
            vendor,
            var: flag,
            fee: fee.max(0),
        });
    }

    Ok(flags)
}

fn record<O: MilpObserver + ?Sized>(
    state: &mut FormulationState,
    observer: &mut O,
    kind: ConstraintKind,
    label: String,
    lhs: Expression,
    relation: ConstraintRelation,
    rhs: f64,
) {
    observer.on_constraint(kind, &label, &lhs, relation, rhs);
    state.add_constraint(kind, label, lhs, relation, rhs);
}

fn apply_recorded_constraints<S: SolverModel>(mut model: S, constraints: &[RecordedConstraint]) -> S {
    for constraint in constraints {
        let lhs = constraint.lhs.clone();

        model = match constraint.relation {
            ConstraintRelation::Eq => model.with(lhs.eq(constraint.rhs)),
            ConstraintRelation::Leq => model.with(lhs.leq(constraint.rhs)),
            ConstraintRelation::Geq => model.with(lhs.geq(constraint.rhs)),
        };
    }

    model
}

/// Turn every offer with a positive verified quantity into a purchase, in offer order.
fn extract_purchases<G: Good>(
    problem: &VendorProblem<G>,
    quantities: &[Variable],
    assignment: &RoundedAssignment,
) -> Result<Vec<PurchaseToMake<G>>, SolverError> {
    let mut purchases = Vec::new();

    for (option, &var) in problem.purchase_options().iter().zip(quantities) {
        let quantity = assignment
            .get(var)
            .to_u32()
            .ok_or(SolverError::InvariantViolation {
                message: "verified quantity does not fit in u32",
            })?;

        if quantity > 0 {
            purchases.push(PurchaseToMake::new(quantity, option.clone()));
        }
    }

    Ok(purchases)
}

/// Fees of every vendor whose flag is on, as the objective counted them.
fn flagged_fees(flags: &[BuyFlag<'_>], assignment: &RoundedAssignment) -> Result<i64, SolverError> {
    flags
        .iter()
        .filter(|flag| assignment.get(flag.var) > 0.5)
        .try_fold(0_i64, |total, flag| total.checked_add(flag.fee))
        .ok_or(SolverError::CostOverflow)
}

/// Fees of every vendor something is actually bought from.
fn charged_fees<G: Good>(
    problem: &VendorProblem<G>,
    flags: &[BuyFlag<'_>],
    assignment: &RoundedAssignment,
    quantities: &[Variable],
) -> Result<i64, SolverError> {
    let mut total = 0_i64;

    for flag in flags {
        let bought = problem
            .options_for_vendor(flag.vendor)
            .filter_map(|(option_idx, _)| quantities.get(option_idx))
            .any(|&var| assignment.get(var) > 0.5);

        if bought {
            total = total.checked_add(flag.fee).ok_or(SolverError::CostOverflow)?;
        }
    }

    Ok(total)
}

fn variable_for(quantities: &[Variable], option_idx: usize) -> Result<Variable, SolverError> {
    quantities
        .get(option_idx)
        .copied()
        .ok_or(SolverError::InvariantViolation {
            message: "offer index has no quantity variable",
        })
}

/// Convert an `i64` to an `f64` if it can be represented exactly.
pub(crate) fn i64_to_f64_exact(v: i64) -> Option<f64> {
    let f = v.to_f64()?;

    (f.to_i64() == Some(v)).then_some(f)
}

/// Convert a `u64` to an `f64` if it can be represented exactly.
pub(crate) fn u64_to_f64_exact(v: u64) -> Option<f64> {
    let f = v.to_f64()?;

    (f.to_u64() == Some(v)).then_some(f)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::offers::PurchaseOption;

    use super::*;

    fn two_vendor_options() -> Vec<PurchaseOption<&'static str>> {
        vec![
            PurchaseOption::new("apple", "Merchant1", 100, 112),
            PurchaseOption::new("banana", "Merchant1", 100, 95),
            PurchaseOption::new("coconut", "Merchant1", 15, 9),
            PurchaseOption::new("date", "Merchant1", 1, 1000),
            PurchaseOption::new("apple", "Merchant2", 1, 100_000),
            PurchaseOption::new("banana", "Merchant2", 1, 15),
            PurchaseOption::new("coconut", "Merchant2", 1, 10),
            PurchaseOption::new("date", "Merchant2", 1, 199),
        ]
    }

    fn one_of_each() -> [(&'static str, u32); 4] {
        [("apple", 1), ("banana", 1), ("coconut", 1), ("date", 1)]
    }

    #[derive(Debug, Default)]
    struct CountingObserver {
        quantity_variables: usize,
        buy_flags: Vec<(String, u64)>,
        objective_terms: usize,
        demand: usize,
        linkage: usize,
        minimum_spend: usize,
    }

    impl MilpObserver for CountingObserver {
        fn on_quantity_variable(&mut self, _: usize, _: Variable, _: u32, _: i64) {
            self.quantity_variables += 1;
        }

        fn on_buy_flag(&mut self, vendor: &str, _: Variable, big_m: u64) {
            self.buy_flags.push((vendor.to_string(), big_m));
        }

        fn on_objective_term(&mut self, _: Variable, _: f64) {
            self.objective_terms += 1;
        }

        fn on_constraint(
            &mut self,
            kind: ConstraintKind,
            _: &str,
            _: &Expression,
            _: ConstraintRelation,
            _: f64,
        ) {
            match kind {
                ConstraintKind::Demand => self.demand += 1,
                ConstraintKind::BuyFlagLinkage => self.linkage += 1,
                ConstraintKind::MinimumSpend => self.minimum_spend += 1,
            }
        }
    }

    #[test]
    fn single_vendor_buys_everything_from_it() -> TestResult {
        let options = vec![
            PurchaseOption::new("apple", "Merchant1", 1, 30),
            PurchaseOption::new("banana", "Merchant1", 1, 40),
            PurchaseOption::new("coconut", "Merchant1", 1, 50),
        ];
        let problem = VendorProblem::with_uniform_minimum(
            [("apple", 1), ("banana", 1), ("coconut", 1)],
            options.clone(),
            100,
        );

        let solution = MilpOptimizer::new().solve(&problem)?;

        let expected: Vec<_> = options
            .into_iter()
            .map(|option| PurchaseToMake::new(1, option))
            .collect();

        assert_eq!(solution.purchases_to_make(), expected.as_slice());
        assert_eq!(solution.total_cost(), 120);

        Ok(())
    }

    #[test]
    fn minimum_spend_forces_a_globally_cheaper_split() -> TestResult {
        let problem = VendorProblem::with_uniform_minimum(one_of_each(), two_vendor_options(), 200);

        let solution = MilpOptimizer::new().solve(&problem)?;

        // Coconut is cheaper at Merchant1, but Merchant2 would then miss its minimum.
        assert_eq!(
            solution.purchases_to_make(),
            [
                PurchaseToMake::new(1, PurchaseOption::new("apple", "Merchant1", 100, 112)),
                PurchaseToMake::new(1, PurchaseOption::new("banana", "Merchant1", 100, 95)),
                PurchaseToMake::new(1, PurchaseOption::new("coconut", "Merchant2", 1, 10)),
                PurchaseToMake::new(1, PurchaseOption::new("date", "Merchant2", 1, 199)),
            ]
        );
        assert_eq!(solution.total_cost(), 416);
        assert_eq!(solution.vendor_fees(), 0);

        Ok(())
    }

    #[test]
    fn explicit_backend_matches_default() -> TestResult {
        let problem = VendorProblem::with_uniform_minimum(one_of_each(), two_vendor_options(), 200);

        let solution =
            MilpOptimizer::new().solve_with_backend(&problem, default_solver, &mut NoopObserver)?;

        assert_eq!(solution.total_cost(), 416);

        Ok(())
    }

    #[test]
    fn observer_sees_every_variable_and_constraint() -> TestResult {
        let problem = VendorProblem::with_uniform_minimum(one_of_each(), two_vendor_options(), 200);
        let mut observer = CountingObserver::default();

        MilpOptimizer::new().solve_with_observer(&problem, &mut observer)?;

        assert_eq!(observer.quantity_variables, 8);
        assert_eq!(observer.objective_terms, 8);
        assert_eq!(
            observer.buy_flags,
            vec![("Merchant1".to_string(), 217), ("Merchant2".to_string(), 5)]
        );
        assert_eq!(observer.demand, 4);
        assert_eq!(observer.linkage, 2);
        assert_eq!(observer.minimum_spend, 2);

        Ok(())
    }

    #[test]
    fn vendors_without_minimum_get_no_minimum_constraint() -> TestResult {
        let problem =
            VendorProblem::new(one_of_each(), two_vendor_options(), [("Merchant2", 200)]);
        let mut observer = CountingObserver::default();

        let solution = MilpOptimizer::new().solve_with_observer(&problem, &mut observer)?;

        assert_eq!(observer.minimum_spend, 1);
        assert_eq!(observer.linkage, 2);

        // Merchant1 has no minimum, so it takes coconut at 9; Merchant2 still clears 200 with
        // banana and date.
        assert_eq!(solution.total_cost(), 112 + 15 + 9 + 199);

        Ok(())
    }

    #[test]
    fn unavailable_good_fails_before_solving() {
        let problem = VendorProblem::with_uniform_minimum(
            [("banana", 10)],
            [PurchaseOption::new("apple", "Merchant1", 100, 112)],
            1,
        );
        let mut observer = CountingObserver::default();

        let result = MilpOptimizer::new().solve_with_observer(&problem, &mut observer);

        assert!(
            matches!(
                result,
                Err(SolverError::Unsolvable(UnsolvableError::UnavailableGood { .. }))
            ),
            "expected an unavailable good error, got {result:?}"
        );
        assert_eq!(observer.quantity_variables, 0, "no model should be built");
    }

    #[test]
    fn unreachable_minimum_is_unsolvable() {
        let options = vec![
            PurchaseOption::new("apple", "Merchant1", 100, 5),
            PurchaseOption::new("banana", "Merchant1", 100, 10),
            PurchaseOption::new("apple", "Merchant2", 1, 20),
            PurchaseOption::new("banana", "Merchant2", 1, 30),
        ];
        let problem =
            VendorProblem::with_uniform_minimum([("apple", 1), ("banana", 1)], options, 200);

        let result = MilpOptimizer::new().solve(&problem);

        assert!(
            result.as_ref().is_err_and(SolverError::is_unsolvable),
            "expected an unsolvable error, got {result:?}"
        );
    }

    #[test]
    fn insufficient_supply_is_infeasible() {
        let problem = VendorProblem::without_minimums(
            [("apple", 10)],
            [
                PurchaseOption::new("apple", "Merchant1", 4, 2),
                PurchaseOption::new("apple", "Merchant2", 5, 3),
            ],
        );

        let result = MilpOptimizer::new().solve(&problem);

        assert!(
            matches!(
                result,
                Err(SolverError::Unsolvable(UnsolvableError::Infeasible))
            ),
            "expected infeasibility, got {result:?}"
        );
    }

    #[test]
    fn nothing_sought_returns_empty_solution() -> TestResult {
        let problem = VendorProblem::without_minimums(
            Vec::<(&str, u32)>::new(),
            [PurchaseOption::new("apple", "Merchant1", 100, 112)],
        );

        let solution = MilpOptimizer::new().solve(&problem)?;

        assert!(solution.is_empty());
        assert_eq!(solution.total_cost(), 0);

        Ok(())
    }

    #[test]
    fn offers_for_goods_not_sought_are_never_bought() -> TestResult {
        let problem = VendorProblem::without_minimums([("apple", 1)], two_vendor_options());

        let solution = MilpOptimizer::new().solve(&problem)?;

        assert_eq!(
            solution.purchases_to_make(),
            [PurchaseToMake::new(1, PurchaseOption::new("apple", "Merchant1", 100, 112))]
        );

        Ok(())
    }

    #[test]
    fn unsought_goods_never_pad_a_minimum_spend() -> TestResult {
        let problem = VendorProblem::with_uniform_minimum(
            [("apple", 1)],
            [
                PurchaseOption::new("apple", "Merchant1", 1, 150),
                PurchaseOption::new("filler", "Merchant1", 10, 10),
                PurchaseOption::new("apple", "Merchant2", 1, 300),
            ],
            200,
        );

        let solution = MilpOptimizer::new().solve(&problem)?;

        assert_eq!(solution.total_cost(), 300);
        assert_eq!(solution.vendors(), vec!["Merchant2"]);

        Ok(())
    }

    #[test]
    fn vendor_fee_can_outweigh_a_cheaper_price() -> TestResult {
        let options = vec![
            PurchaseOption::new("apple", "Merchant1", 1, 10),
            PurchaseOption::new("banana", "Merchant1", 1, 10),
            PurchaseOption::new("apple", "Merchant2", 1, 1),
        ];

        let without_fee =
            VendorProblem::without_minimums([("apple", 1), ("banana", 1)], options.clone());
        let with_fee = without_fee.clone().with_vendor_fees([("Merchant2", 50)]);

        let cheap = MilpOptimizer::new().solve(&without_fee)?;
        let consolidated = MilpOptimizer::new().solve(&with_fee)?;

        assert_eq!(cheap.total_cost(), 11);
        assert_eq!(consolidated.total_cost(), 20);
        assert_eq!(consolidated.vendor_fees(), 0);
        assert_eq!(consolidated.vendors(), vec!["Merchant1"]);

        Ok(())
    }

    #[test]
    fn fees_are_charged_once_per_vendor_used() -> TestResult {
        let options = vec![
            PurchaseOption::new("apple", "Merchant1", 1, 10),
            PurchaseOption::new("banana", "Merchant1", 1, 10),
            PurchaseOption::new("apple", "Merchant2", 1, 1),
        ];
        let problem = VendorProblem::without_minimums([("apple", 1), ("banana", 1)], options)
            .with_vendor_fees([("Merchant1", 5), ("Merchant2", 5)]);

        let solution = MilpOptimizer::new().solve(&problem)?;

        assert_eq!(solution.total_cost(), 11);
        assert_eq!(solution.vendor_fees(), 10);
        assert_eq!(solution.grand_total(), 21);

        Ok(())
    }

    #[test]
    fn fixed_big_m_below_vendor_capacity_is_rejected() {
        let problem = VendorProblem::with_uniform_minimum(one_of_each(), two_vendor_options(), 200);

        let result = MilpOptimizer::with_big_m(BigM::Fixed(100)).solve(&problem);

        assert!(
            matches!(
                result,
                Err(SolverError::BigMTooSmall { ref vendor, big_m: 100, capacity: 216 })
                    if vendor == "Merchant1"
            ),
            "expected big-M rejection, got {result:?}"
        );
    }

    #[test]
    fn reference_big_m_gives_the_same_optimum() -> TestResult {
        let problem = VendorProblem::with_uniform_minimum(one_of_each(), two_vendor_options(), 200);

        let solution = MilpOptimizer::with_big_m(BigM::reference()).solve(&problem)?;

        assert_eq!(solution.total_cost(), 416);

        Ok(())
    }

    #[test]
    fn unrepresentable_price_is_rejected() {
        let problem = VendorProblem::without_minimums(
            [("apple", 1)],
            [PurchaseOption::new("apple", "Merchant1", 1, i64::MAX)],
        );

        let result = MilpOptimizer::new().solve(&problem);

        assert!(
            matches!(result, Err(SolverError::MinorUnitsNotRepresentable(i64::MAX))),
            "expected a representability error, got {result:?}"
        );
    }

    #[test]
    fn i64_to_f64_exact_accepts_representable_values() {
        assert_eq!(i64_to_f64_exact(0).map(f64::to_bits), Some(0.0_f64.to_bits()));
        assert_eq!(
            i64_to_f64_exact(1 << 53).map(f64::to_bits),
            Some(9_007_199_254_740_992.0_f64.to_bits())
        );
        assert_eq!(i64_to_f64_exact((1 << 53) + 1), None);
    }

    #[test]
    fn u64_to_f64_exact_rejects_unrepresentable_values() {
        assert!(u64_to_f64_exact(REFERENCE_BIG_M).is_some());
        assert_eq!(u64_to_f64_exact(u64::MAX - 1), None);
    }
}
