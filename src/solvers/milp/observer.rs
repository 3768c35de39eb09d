//! MILP Observer

use good_lp::{Expression, Variable};

use crate::solvers::milp::state::{ConstraintKind, ConstraintRelation};

/// Observer for capturing the allocation MILP as it's built.
///
/// The solver remains the only place the formulation is constructed; observers passively
/// record variables, objective terms and constraints for rendering, debugging or tests.
///
/// When no observer is provided the solver uses [`NoopObserver`] and the calls are optimised
/// away via monomorphization.
pub trait MilpObserver {
    /// Called when a quantity variable is created for an offer.
    ///
    /// # Parameters
    ///
    /// - `option_idx`: Index of the offer in the problem's purchase options
    /// - `var`: The integer decision variable
    /// - `available_quantity`: Upper bound of the variable
    /// - `price_minor`: Unit price in minor units
    fn on_quantity_variable(
        &mut self,
        option_idx: usize,
        var: Variable,
        available_quantity: u32,
        price_minor: i64,
    );

    /// Called when a buy-flag is created for a vendor.
    ///
    /// `big_m` is the linkage constant chosen for this vendor.
    fn on_buy_flag(&mut self, _vendor: &str, _var: Variable, _big_m: u64) {}

    /// Called when a term is added to the objective function.
    fn on_objective_term(&mut self, _var: Variable, _coefficient: f64) {}

    /// Called when a constraint is added.
    ///
    /// # Parameters
    ///
    /// - `kind`: Constraint family
    /// - `label`: The good or vendor the constraint is about
    /// - `lhs`: Left-hand side expression
    /// - `relation`: Relation operator
    /// - `rhs`: Right-hand side value
    fn on_constraint(
        &mut self,
        kind: ConstraintKind,
        label: &str,
        lhs: &Expression,
        relation: ConstraintRelation,
        rhs: f64,
    );
}

/// No-op observer for unobserved solves.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl MilpObserver for NoopObserver {
    fn on_quantity_variable(&mut self, _: usize, _: Variable, _: u32, _: i64) {}

    fn on_constraint(
        &mut self,
        _: ConstraintKind,
        _: &str,
        _: &Expression,
        _: ConstraintRelation,
        _: f64,
    ) {
    }
}
