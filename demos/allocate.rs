//! Allocation Example
//!
//! Loads a problem set from `fixtures/problems`, solves it and prints a receipt.
//!
//! Use `-f` to load a problem set by name
//! Use `-c` to apply a config file, e.g. `fixtures/config/budget.yml`
//! Use `-s` to choose the strategy (`milp` or `greedy`)
//!
//! Set `RUST_LOG=procure=debug` to see the solver's progress.

use std::{io, time::Instant};

use anyhow::{Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use procure::{
    allocator::Allocator, config::AllocationConfig, fixtures::ProblemFixture, receipt::Receipt,
    utils::AllocateArgs,
};

/// Allocation Example
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = AllocateArgs::parse();

    let fixture = ProblemFixture::from_set(&args.fixture)?;

    let mut config = match args.config.as_deref() {
        Some(path) => AllocationConfig::from_file(path)?,
        None => AllocationConfig {
            currency: fixture.currency(),
            ..AllocationConfig::default()
        },
    };

    if config.currency != fixture.currency() {
        bail!(
            "config currency {} does not match problem set currency {}",
            config.currency.iso_alpha_code,
            fixture.currency().iso_alpha_code
        );
    }

    for (vendor, minimum) in fixture.minimums() {
        config.vendor_minimums.entry(vendor.clone()).or_insert(*minimum);
    }

    for (vendor, fee) in fixture.fees() {
        config.vendor_fees.entry(vendor.clone()).or_insert(*fee);
    }

    if let Some(strategy) = args.strategy {
        config.strategy = strategy;
    }

    let currency = config.currency;
    let allocator = Allocator::from_config(config);

    let prepared = allocator.prepare(
        fixture.sought().iter().cloned(),
        fixture.options().iter().cloned(),
    )?;
    let problem = prepared.problem.clone();

    let start = Instant::now();

    let allocation = allocator.solve_prepared(prepared)?;

    let elapsed = start.elapsed().as_secs_f32();

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    Receipt::from_allocation(&problem, &allocation, currency).write_to(&mut handle)?;

    println!("\nSolution: {elapsed}s");

    Ok(())
}
