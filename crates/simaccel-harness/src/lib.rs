//! Differential verification harness for the SimAccel DMA shell.
//!
//! Drives a memory-mapped accelerator through a blocking bus-transaction
//! primitive and checks everything it observes against a golden memory
//! model. A run is a randomized read/write soak followed by a directed
//! DMA scenario: program the engine, trigger it, poll for completion,
//! and compare the destination against the source payload.
//!
//! The DMA registers are reachable two ways — direct writes, or the
//! serialized command channel tunneled through the control port pair.
//! Both sit behind [`ConfigurationChannel`]; the direct route is the
//! default because the channel's connection to the configuration logic
//! is unconfirmed on the observed device.
//!
//! ```no_run
//! use simaccel_harness::{SimAccelDevice, TestScenario, Verifier};
//!
//! # fn main() -> simaccel_harness::Result<()> {
//! let scenario = TestScenario::default();
//! let mut device = SimAccelDevice::for_scenario(&scenario);
//! let result = Verifier::new(scenario).run(&mut device)?;
//! assert!(result.passed());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]

pub mod backends;
pub mod bus;
pub mod channel;
pub mod error;
pub mod generator;
pub mod golden;
pub mod poll;
pub mod scenario;
pub mod verifier;

pub use backends::SimAccelDevice;
pub use bus::{read_word, write_word, BusParams, BusTransactor};
pub use channel::{ConfigurationChannel, DirectConfigurator, DmaJob, SerializedChannel};
pub use error::{HarnessError, Result};
pub use generator::{GeneratorConfig, Transaction, TransactionGenerator};
pub use golden::{GoldenMemory, Mismatch};
pub use poll::CompletionPoller;
pub use scenario::{ConfigPath, TestScenario};
pub use verifier::{RunResult, Verifier};

/// Commonly used types.
pub mod prelude {
    pub use crate::{
        BusParams, BusTransactor, CompletionPoller, ConfigPath, ConfigurationChannel,
        DirectConfigurator, DmaJob, GoldenMemory, HarnessError, Result, RunResult,
        SerializedChannel, SimAccelDevice, TestScenario, TransactionGenerator, Verifier,
    };
}
