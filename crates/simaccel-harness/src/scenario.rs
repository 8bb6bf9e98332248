//! Parameterized run configuration.
//!
//! One [`TestScenario`] describes everything a run needs — bus geometry,
//! generator policy, memory layout, DMA job, configuration path, poll
//! budget — and a single [`crate::verifier::Verifier`] consumes it. The
//! per-variant harness scripts this replaces differed only in these
//! values.

use crate::bus::BusParams;
use crate::channel::DmaJob;
use crate::error::{HarnessError, Result};
use crate::generator::GeneratorConfig;
use crate::poll::DEFAULT_MAX_POLLS;
use simaccel_chip::{layout, regs, wire};

/// Which route programs the DMA registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigPath {
    /// Direct register writes. The default: the only path confirmed to
    /// reach the device's configuration logic.
    #[default]
    Direct,
    /// The serialized command tunnel. Kept as an explicit opt-in until
    /// its connection to the configuration bus is confirmed.
    Serialized,
}

/// Complete configuration for one verification run.
#[derive(Debug, Clone)]
pub struct TestScenario {
    /// Bus interface parameters.
    pub bus: BusParams,
    /// Random-phase generator policy.
    pub generator: GeneratorConfig,
    /// Serialized-channel write port (read port is 4 bytes above).
    pub ctrl_addr: u32,
    /// Base address of the DMA configuration registers.
    pub config_base: u32,
    /// Directed-phase DMA job.
    pub dma: DmaJob,
    /// Configuration route.
    pub path: ConfigPath,
    /// Completion poll budget.
    pub max_polls: u32,
}

impl Default for TestScenario {
    fn default() -> Self {
        Self {
            bus: BusParams::default(),
            generator: GeneratorConfig::default(),
            ctrl_addr: layout::CHANNEL_WRITE_PORT,
            config_base: layout::CONFIG_BASE,
            dma: DmaJob {
                src: layout::SOURCE_BASE,
                dst: layout::DMA_BUFFER_BASE,
                length: layout::DEFAULT_DMA_LENGTH,
            },
            path: ConfigPath::default(),
            max_polls: DEFAULT_MAX_POLLS,
        }
    }
}

impl TestScenario {
    /// Reject malformed configuration before any transaction is issued.
    /// Nothing is clamped: a bad scenario aborts the run.
    ///
    /// # Errors
    ///
    /// `InvalidScenario` naming the first violated precondition.
    pub fn validate(&self) -> Result<()> {
        let limit = self.bus.limit();

        if self.bus.addr_width == 0 || self.bus.addr_width > 32 {
            return Err(HarnessError::invalid_scenario(format!(
                "address width {} outside 1..=32",
                self.bus.addr_width
            )));
        }
        if self.bus.max_beats == 0 {
            return Err(HarnessError::invalid_scenario("max_beats must be nonzero"));
        }
        if self.bus.max_bytes < regs::REG_BYTES {
            return Err(HarnessError::invalid_scenario(format!(
                "max_bytes {} cannot carry a {}-byte register word",
                self.bus.max_bytes,
                regs::REG_BYTES
            )));
        }
        if self.max_polls == 0 {
            return Err(HarnessError::invalid_scenario("poll budget must be nonzero"));
        }

        let g = &self.generator;
        if g.max_bytes == 0 || g.max_bytes > self.bus.max_bytes {
            return Err(HarnessError::invalid_scenario(format!(
                "generator max_bytes {} outside 1..={}",
                g.max_bytes, self.bus.max_bytes
            )));
        }
        if g.window_len == 0
            || u64::from(g.window_base) + u64::from(g.window_len) > limit
        {
            return Err(HarnessError::invalid_scenario(format!(
                "generator window {:#x}+{:#x} outside address space",
                g.window_base, g.window_len
            )));
        }

        if self.dma.length == 0 {
            return Err(HarnessError::invalid_scenario("DMA length must be nonzero"));
        }
        for (name, base) in [("source", self.dma.src), ("destination", self.dma.dst)] {
            if u64::from(base) + u64::from(self.dma.length) > limit {
                return Err(HarnessError::invalid_scenario(format!(
                    "DMA {name} region {base:#x}+{} outside address space",
                    self.dma.length
                )));
            }
        }
        if u64::from(self.config_base) + u64::from(regs::WINDOW_BYTES) > limit {
            return Err(HarnessError::invalid_scenario(
                "config registers outside address space",
            ));
        }
        if u64::from(self.ctrl_addr) + u64::from(2 * wire::PORT_SPACING) > limit {
            return Err(HarnessError::invalid_scenario(
                "channel ports outside address space",
            ));
        }

        // The directed phase reads the destination back as plain memory;
        // it must not shadow the register window or the channel ports.
        let dst_end = u64::from(self.dma.dst) + u64::from(self.dma.length);
        let cfg_end = u64::from(self.config_base) + u64::from(regs::WINDOW_BYTES);
        if u64::from(self.dma.dst) < cfg_end && u64::from(self.config_base) < dst_end {
            return Err(HarnessError::invalid_scenario(
                "DMA destination overlaps config registers",
            ));
        }

        Ok(())
    }
}
