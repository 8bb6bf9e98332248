//! Run orchestration.
//!
//! A run has two phases. The random phase drives generated traffic
//! through the bus, mirroring writes into the golden model and checking
//! every read against it. The directed phase plants a known payload in
//! the source region, programs and triggers the DMA engine through the
//! scenario's configuration channel, waits for completion, and compares
//! the destination readback byte-for-byte against what the source held.
//! Mismatches never abort a run; they are accumulated and reported in
//! aggregate.

use crate::bus::BusTransactor;
use crate::channel::{ConfigurationChannel, DirectConfigurator, SerializedChannel};
use crate::error::Result;
use crate::generator::{Transaction, TransactionGenerator};
use crate::golden::{diff_bytes, GoldenMemory, Mismatch};
use crate::poll::CompletionPoller;
use crate::scenario::{ConfigPath, TestScenario};
use tracing::{debug, info};

/// Outcome of one verification run.
#[derive(Debug)]
pub struct RunResult {
    /// Every differing byte observed, in discovery order.
    pub mismatches: Vec<Mismatch>,
    /// Random-phase transactions issued.
    pub transactions: usize,
    /// Status polls the directed phase needed.
    pub polls: u32,
}

impl RunResult {
    /// True when both phases completed without a single differing byte.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// Process exit status: 0 on pass, 1 otherwise.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        i32::from(!self.passed())
    }
}

/// Drives one [`TestScenario`] against a bus transactor.
#[derive(Debug)]
pub struct Verifier {
    scenario: TestScenario,
}

impl Verifier {
    /// Verifier for the given scenario.
    #[must_use]
    pub const fn new(scenario: TestScenario) -> Self {
        Self { scenario }
    }

    /// The scenario this verifier runs.
    #[must_use]
    pub const fn scenario(&self) -> &TestScenario {
        &self.scenario
    }

    /// Execute both phases and collect the result.
    ///
    /// # Errors
    ///
    /// `InvalidScenario` for malformed configuration, bus precondition
    /// errors, `PollTimeout` when completion is never observed. Data
    /// mismatches are not errors; see [`RunResult`].
    pub fn run(&self, bus: &mut dyn BusTransactor) -> Result<RunResult> {
        self.scenario.validate()?;
        match self.scenario.path {
            ConfigPath::Direct => {
                let channel = DirectConfigurator::new(self.scenario.config_base);
                self.run_with(bus, &channel)
            }
            ConfigPath::Serialized => {
                let channel =
                    SerializedChannel::new(self.scenario.ctrl_addr, self.scenario.config_base);
                self.run_with(bus, &channel)
            }
        }
    }

    fn run_with(
        &self,
        bus: &mut dyn BusTransactor,
        channel: &dyn ConfigurationChannel,
    ) -> Result<RunResult> {
        let scenario = &self.scenario;
        let mut golden = GoldenMemory::new(scenario.bus.addr_width);
        let mut mismatches = Vec::new();

        // Random phase: differential soak against the golden model.
        let mut generator =
            TransactionGenerator::new(scenario.generator.clone(), scenario.bus.limit());
        let mut transactions = 0usize;
        for tx in generator.by_ref() {
            transactions += 1;
            match tx {
                Transaction::Write { addr, data } => {
                    bus.write(addr, &data)?;
                    golden.update(addr, &data);
                }
                Transaction::Read { addr, len } => {
                    let actual = bus.read(addr, len)?;
                    mismatches.extend(golden.compare(addr, &actual));
                }
            }
        }
        info!(
            transactions,
            mismatches = mismatches.len(),
            "random phase done"
        );

        // Directed phase: plant a payload, trigger the engine, read back.
        let length = scenario.dma.length as usize;
        let payload = generator.payload(length);
        let chunk_size = scenario.bus.max_bytes;
        for (i, chunk) in payload.chunks(chunk_size).enumerate() {
            let addr = scenario.dma.src + (i * chunk_size) as u32;
            bus.write(addr, chunk)?;
            golden.update(addr, chunk);
        }
        debug!(bytes = length, "source payload planted");

        channel.configure(bus, &scenario.dma)?;
        let polls = CompletionPoller::new(scenario.max_polls).await_nonzero(bus, channel)?;
        debug!(polls, "DMA completed");

        let mut actual = Vec::with_capacity(length);
        let mut offset = 0usize;
        while offset < length {
            let chunk = chunk_size.min(length - offset);
            actual.extend(bus.read(scenario.dma.dst + offset as u32, chunk)?);
            offset += chunk;
        }
        let expected = golden.expected(scenario.dma.src, length);
        mismatches.extend(diff_bytes(scenario.dma.dst, expected, &actual));

        info!(
            mismatches = mismatches.len(),
            polls,
            pass = mismatches.is_empty(),
            "run complete"
        );
        Ok(RunResult {
            mismatches,
            transactions,
            polls,
        })
    }
}
