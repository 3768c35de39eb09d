//! Utils

use clap::Parser;

use crate::config::Strategy;

/// Arguments for the allocation demo
#[derive(Debug, Parser)]
pub struct AllocateArgs {
    /// Problem set to load from `fixtures/problems`
    #[clap(short, long, default_value = "two_vendors")]
    pub fixture: String,

    /// Config file to apply on top of the problem set
    #[clap(short, long)]
    pub config: Option<String>,

    /// Override the configured strategy
    #[clap(short, long, value_enum)]
    pub strategy: Option<Strategy>,
}
