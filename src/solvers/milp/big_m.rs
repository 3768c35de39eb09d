//! Big-M Linkage Constants
//!
//! Each vendor's buy-flag is tied to its quantity variables by
//! `sum(q_v) - M_v * flag_v <= 0`. This only forces the flag on correctly when `M_v` is strictly
//! greater than every quantity that could be bought from the vendor, so the constant is checked
//! against the vendor's total offered quantity rather than trusted.

use crate::solvers::SolverError;

/// Conventional fixed linkage constant.
pub const REFERENCE_BIG_M: u64 = 1_000_000;

/// How the per-vendor big-M constant is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BigM {
    /// One more than the vendor's total offered quantity.
    #[default]
    Derived,

    /// The same constant for every vendor, rejected if any vendor could exceed it.
    Fixed(u64),
}

impl BigM {
    /// The [`REFERENCE_BIG_M`] constant, validated per vendor.
    pub fn reference() -> Self {
        Self::Fixed(REFERENCE_BIG_M)
    }

    /// Linkage constant for a vendor that offers `capacity` units in total.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::BigMTooSmall`] if a fixed constant does not exceed `capacity`, or
    /// [`SolverError::QuantityNotRepresentable`] if the derived constant overflows.
    pub fn for_vendor(self, vendor: &str, capacity: u64) -> Result<u64, SolverError> {
        match self {
            Self::Derived => capacity
                .checked_add(1)
                .ok_or(SolverError::QuantityNotRepresentable(capacity)),
            Self::Fixed(big_m) if big_m > capacity => Ok(big_m),
            Self::Fixed(big_m) => Err(SolverError::BigMTooSmall {
                vendor: vendor.to_string(),
                big_m,
                capacity,
            }),
        }
    }
}
