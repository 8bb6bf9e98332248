//! `simaccel` — run the verification harness against the simulated
//! accelerator shell.
//!
//! ```text
//! USAGE:
//!   simaccel [-n COUNT] [--seed SEED] [--max-bytes N] [--max-beats N]
//!            [--dma-length N] [--poll-budget N] [--config-path PATH]
//! ```
//!
//! Exit status is 0 when the run finished with zero mismatches, 1
//! otherwise.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use simaccel_harness::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "simaccel", about = "SimAccel DMA verification harness", version)]
struct Cli {
    /// Number of randomized transactions in the soak phase.
    #[arg(short = 'n', long = "transactions", default_value_t = 100)]
    transactions: usize,

    /// Maximum number of bytes in any single read/write.
    #[arg(long, default_value_t = 4)]
    max_bytes: usize,

    /// Maximum number of beats per bus burst.
    #[arg(long, default_value_t = 1)]
    max_beats: u32,

    /// RNG seed; rerun with the same seed to reproduce a run exactly.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Directed-phase DMA transfer length in bytes.
    #[arg(long, default_value_t = 32)]
    dma_length: u32,

    /// Completion poll budget before the run fails with a timeout.
    #[arg(long, default_value_t = 10_000)]
    poll_budget: u32,

    /// Route used to program the DMA registers.
    #[arg(long, value_enum, default_value = "direct")]
    config_path: PathArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PathArg {
    /// Direct register writes (the confirmed route).
    Direct,
    /// Serialized command channel (unconfirmed wiring; expect a timeout
    /// on the current device).
    Serialized,
}

impl From<PathArg> for ConfigPath {
    fn from(arg: PathArg) -> Self {
        match arg {
            PathArg::Direct => Self::Direct,
            PathArg::Serialized => Self::Serialized,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    let mut scenario = TestScenario::default();
    scenario.bus.max_beats = cli.max_beats;
    scenario.bus.max_bytes = cli.max_bytes;
    scenario.generator.count = cli.transactions;
    scenario.generator.max_bytes = cli.max_bytes;
    scenario.generator.seed = cli.seed;
    scenario.dma.length = cli.dma_length;
    scenario.max_polls = cli.poll_budget;
    scenario.path = cli.config_path.into();

    let mut device = SimAccelDevice::for_scenario(&scenario);
    let result = Verifier::new(scenario).run(&mut device)?;

    for mismatch in &result.mismatches {
        println!("MISMATCH {mismatch}");
    }
    println!(
        "{} ({} transactions, {} mismatches, {} polls)",
        if result.passed() { "PASS!" } else { "FAIL" },
        result.transactions,
        result.mismatches.len(),
        result.polls
    );

    std::process::exit(result.exit_code());
}
