//! Solvers for Vendor Problems

use good_lp::ResolutionError;
use thiserror::Error;

use crate::{goods::Good, problem::VendorProblem, solution::VendorSolution};

pub mod greedy;
pub mod milp;

/// Reasons a vendor problem has no acceptable solution.
///
/// None of these are recovered from: the whole solve is abandoned and the caller decides whether
/// to drop goods and retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnsolvableError {
    /// A sought good has no offers at all.
    #[error("desire {good} but it is unavailable")]
    UnavailableGood {
        /// The good, formatted for display
        good: String,
    },

    /// Offers for a good do not add up to the quantity sought.
    #[error("not enough {good} on offer: sought {sought}, available {available}")]
    InsufficientSupply {
        /// The good, formatted for display
        good: String,

        /// Quantity sought
        sought: u32,

        /// Quantity available across every offer
        available: u64,
    },

    /// The constraint system admits no integer solution.
    #[error("vendor problem is infeasible")]
    Infeasible,

    /// The solver backend failed for a reason other than infeasibility.
    #[error("vendor problem was not mathematically solvable: {reason}")]
    SolverFailure {
        /// Backend error message
        reason: String,
    },

    /// The solver stopped without proving optimality.
    #[error("vendor problem was not solved to optimality; returned status {status}")]
    NotOptimal {
        /// Status reported by the backend
        status: String,
    },

    /// A reportedly optimal solution violated a constraint when re-checked.
    #[error("solution could not be verified as legitimate: {reason}")]
    VerificationFailed {
        /// The first violation found
        reason: String,
    },
}

impl UnsolvableError {
    /// Build an [`UnsolvableError::UnavailableGood`] for `good`.
    pub fn unavailable_good<G: Good>(good: &G) -> Self {
        Self::UnavailableGood {
            good: format!("{good:?}"),
        }
    }
}

impl From<ResolutionError> for UnsolvableError {
    fn from(err: ResolutionError) -> Self {
        match err {
            ResolutionError::Infeasible => Self::Infeasible,
            other => Self::SolverFailure {
                reason: other.to_string(),
            },
        }
    }
}

/// Solver Errors
#[derive(Debug, Error)]
pub enum SolverError {
    /// The problem has no acceptable solution.
    #[error(transparent)]
    Unsolvable(#[from] UnsolvableError),

    /// Money amount in minor units cannot be represented exactly as a solver coefficient.
    #[error(
        "money amount in minor units cannot be represented exactly as a solver coefficient: {0}"
    )]
    MinorUnitsNotRepresentable(i64),

    /// Quantity cannot be represented exactly as a solver coefficient.
    #[error("quantity cannot be represented exactly as a solver coefficient: {0}")]
    QuantityNotRepresentable(u64),

    /// A fixed big-M constant does not exceed a vendor's purchasable quantity.
    #[error("big-M constant {big_m} does not exceed the {capacity} units available from {vendor}")]
    BigMTooSmall {
        /// Vendor whose capacity was too large
        vendor: String,

        /// The configured constant
        big_m: u64,

        /// Total quantity purchasable from the vendor
        capacity: u64,
    },

    /// A cost does not fit in an `i64` of minor units.
    #[error("cost overflowed while totalling purchases")]
    CostOverflow,

    /// Internal solver invariant was violated (this is a bug).
    #[error("solver invariant violated: {message}")]
    InvariantViolation {
        /// What invariant was violated
        message: &'static str,
    },
}

impl SolverError {
    /// Whether this error means the problem itself has no acceptable solution.
    pub fn is_unsolvable(&self) -> bool {
        matches!(self, Self::Unsolvable(_))
    }

    /// The underlying unsolvable reason, if any.
    pub fn as_unsolvable(&self) -> Option<&UnsolvableError> {
        match self {
            Self::Unsolvable(err) => Some(err),
            _ => None,
        }
    }
}

/// A strategy for turning a [`VendorProblem`] into a [`VendorSolution`].
pub trait Optimizer {
    /// Human readable strategy name, used in logs.
    fn name(&self) -> &'static str;

    /// Solve the vendor problem.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if no acceptable solution exists or the solver fails.
    fn solve<G: Good>(&self, problem: &VendorProblem<G>)
    -> Result<VendorSolution<G>, SolverError>;
}
