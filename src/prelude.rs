//! Procure prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    allocator::{
        Allocation, AllocationError, Allocator, ExcludedGood, ExclusionReason, PreparedProblem,
    },
    config::{AllocationConfig, ConfigError, Strategy},
    goods::Good,
    offers::{PurchaseOption, cheapest_option},
    prices::{PriceError, format_minor, parse_price},
    problem::VendorProblem,
    receipt::{Receipt, ReceiptError},
    solution::{PurchaseToMake, VendorSolution},
    solvers::{
        Optimizer, SolverError, UnsolvableError,
        greedy::GreedyOptimizer,
        milp::{BigM, MilpObserver, MilpOptimizer, NoopObserver},
    },
};
