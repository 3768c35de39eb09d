//! Solution Verification
//!
//! A backend reporting an optimal status is not trusted on its own. The raw values are snapped
//! to integers, and the snapped assignment is re-checked against every bound and recorded
//! constraint before anything is extracted from it.

use good_lp::{Solution, SolutionStatus, Variable};
use rustc_hash::FxHashMap;

use crate::solvers::{
    UnsolvableError,
    milp::{
        i64_to_f64_exact,
        state::{BoundedVariable, ConstraintRelation, RecordedConstraint},
    },
};

/// Largest distance from an integer that a raw integer variable may have.
pub const INTEGRALITY_TOLERANCE: f64 = 1e-6;

/// Slack allowed when re-checking constraints on the snapped assignment.
pub const FEASIBILITY_TOLERANCE: f64 = 1e-7;

/// Relative slack between the reported objective and the exact integer cost.
pub const OBJECTIVE_TOLERANCE: f64 = 1e-6;

/// Integer assignment derived from a backend solution.
#[derive(Debug, Default)]
pub(crate) struct RoundedAssignment {
    values: FxHashMap<Variable, f64>,
}

impl RoundedAssignment {
    /// Snapped value of `var`, zero if it was never declared.
    pub(crate) fn get(&self, var: Variable) -> f64 {
        self.values.get(&var).copied().unwrap_or(0.0)
    }
}

impl Solution for RoundedAssignment {
    fn status(&self) -> SolutionStatus {
        SolutionStatus::Optimal
    }

    fn value(&self, variable: Variable) -> f64 {
        self.get(variable)
    }
}

/// Snap `solution` to integers and re-check it against `variables` and `constraints`.
///
/// # Errors
///
/// Returns [`UnsolvableError::VerificationFailed`] describing the first violation found.
pub(crate) fn verify_solution<S: Solution>(
    solution: &S,
    variables: &[BoundedVariable],
    constraints: &[RecordedConstraint],
) -> Result<RoundedAssignment, UnsolvableError> {
    let mut values = FxHashMap::default();

    for bounded in variables {
        let raw = solution.value(bounded.var);
        let snapped = raw.round();

        if !raw.is_finite() || (raw - snapped).abs() > INTEGRALITY_TOLERANCE {
            return Err(failed(format!(
                "variable {:?} has non-integral value {raw}",
                bounded.var
            )));
        }

        if snapped < bounded.lower - FEASIBILITY_TOLERANCE
            || snapped > bounded.upper + FEASIBILITY_TOLERANCE
        {
            return Err(failed(format!(
                "variable {:?} = {snapped} is outside [{}, {}]",
                bounded.var, bounded.lower, bounded.upper
            )));
        }

        values.insert(bounded.var, snapped);
    }

    let assignment = RoundedAssignment { values };

    for constraint in constraints {
        let lhs = assignment.eval(&constraint.lhs);
        let rhs = constraint.rhs;

        let satisfied = match constraint.relation {
            ConstraintRelation::Eq => (lhs - rhs).abs() <= FEASIBILITY_TOLERANCE,
            ConstraintRelation::Leq => lhs <= rhs + FEASIBILITY_TOLERANCE,
            ConstraintRelation::Geq => lhs >= rhs - FEASIBILITY_TOLERANCE,
        };

        if !satisfied {
            return Err(failed(format!(
                "{:?} constraint for {} violated: {lhs} {} {rhs}",
                constraint.kind,
                constraint.label,
                constraint.relation.symbol()
            )));
        }
    }

    Ok(assignment)
}

/// Check the objective reported by the backend against the exact integer objective.
///
/// # Errors
///
/// Returns [`UnsolvableError::VerificationFailed`] if they disagree beyond
/// [`OBJECTIVE_TOLERANCE`].
pub(crate) fn verify_objective(reported: f64, exact: i64) -> Result<(), UnsolvableError> {
    let expected = i64_to_f64_exact(exact)
        .ok_or_else(|| failed(format!("objective {exact} is not representable")))?;

    if (reported - expected).abs() > OBJECTIVE_TOLERANCE * expected.abs().max(1.0) {
        return Err(failed(format!(
            "reported objective {reported} does not match purchase cost {exact}"
        )));
    }

    Ok(())
}

fn failed(reason: String) -> UnsolvableError {
    UnsolvableError::VerificationFailed { reason }
}
