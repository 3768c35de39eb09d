//! Procure
//!
//! Procure allocates purchases across vendors at the lowest total cost. Every sought good is
//! bought in exactly the quantity wanted, and any vendor that is bought from must reach its
//! minimum spend. The exact optimizer solves this as a mixed-integer linear program; a greedy
//! cheapest-first optimizer is provided as a baseline for problems without minimums.

pub mod allocator;
pub mod config;
pub mod fixtures;
pub mod goods;
pub mod offers;
pub mod prelude;
pub mod prices;
pub mod problem;
pub mod receipt;
pub mod solution;
pub mod solvers;
pub mod utils;
