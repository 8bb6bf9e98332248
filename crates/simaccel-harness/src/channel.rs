//! Configuration channels.
//!
//! Two routes program the same DMA register map:
//!
//! - [`DirectConfigurator`] — plain bus writes at the register offsets.
//! - [`SerializedChannel`] — the same registers tunneled through the
//!   narrow command protocol on the control port pair.
//!
//! Both implement [`ConfigurationChannel`], selected per scenario. The
//! serialized route is kept behind an explicit opt-in: on the observed
//! device it is not internally connected to the DMA configuration logic,
//! so it is exercised as a standalone protocol component and never used
//! as the default path.

use crate::bus::{read_word, write_word, BusTransactor};
use crate::error::{HarnessError, Result};
use simaccel_chip::regs;
use simaccel_chip::wire::{CommandHeader, CommandOp, PORT_SPACING};
use tracing::debug;

/// One DMA transfer to program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DmaJob {
    /// Source base address.
    pub src: u32,
    /// Destination base address.
    pub dst: u32,
    /// Transfer length in bytes.
    pub length: u32,
}

/// A route to the DMA register map.
///
/// `configure` programs src/dst/length and asserts the trigger — always
/// in that order, so the trigger never fires against a half-written
/// configuration. It returns once the writes are issued; completion is
/// observed separately through `read_status`.
pub trait ConfigurationChannel {
    /// Program the register map and assert the trigger.
    ///
    /// # Errors
    ///
    /// Propagates bus precondition errors.
    fn configure(&self, bus: &mut dyn BusTransactor, job: &DmaJob) -> Result<()>;

    /// Read the 4-byte completion status word.
    ///
    /// # Errors
    ///
    /// Propagates bus precondition errors; the serialized route also
    /// fails on protocol violations.
    fn read_status(&self, bus: &mut dyn BusTransactor) -> Result<u32>;
}

/// Programs the DMA registers with direct bus writes.
#[derive(Debug, Clone, Copy)]
pub struct DirectConfigurator {
    config_base: u32,
}

impl DirectConfigurator {
    /// Configurator for a register map at `config_base`.
    #[must_use]
    pub const fn new(config_base: u32) -> Self {
        Self { config_base }
    }
}

impl ConfigurationChannel for DirectConfigurator {
    fn configure(&self, bus: &mut dyn BusTransactor, job: &DmaJob) -> Result<()> {
        debug!(
            "direct DMA configure: src={:#x} dst={:#x} length={}",
            job.src, job.dst, job.length
        );
        write_word(bus, self.config_base + regs::SRC, job.src)?;
        write_word(bus, self.config_base + regs::DST, job.dst)?;
        write_word(bus, self.config_base + regs::LENGTH, job.length)?;
        write_word(bus, self.config_base + regs::TRIGGER, regs::TRIGGER_WORD)?;
        Ok(())
    }

    fn read_status(&self, bus: &mut dyn BusTransactor) -> Result<u32> {
        read_word(bus, self.config_base + regs::STATUS)
    }
}

/// Programs the DMA registers through the serialized command tunnel.
#[derive(Debug, Clone, Copy)]
pub struct SerializedChannel {
    write_port: u32,
    read_port: u32,
    config_base: u32,
}

impl SerializedChannel {
    /// Channel with its write port at `ctrl_addr`, read port one transfer
    /// above it, targeting a register map at `config_base`.
    #[must_use]
    pub const fn new(ctrl_addr: u32, config_base: u32) -> Self {
        Self {
            write_port: ctrl_addr,
            read_port: ctrl_addr + PORT_SPACING,
            config_base,
        }
    }

    /// Issue a write command: the five header words, then one 4-byte bus
    /// write per payload word.
    ///
    /// # Errors
    ///
    /// `ChannelProtocol` for an empty payload; bus errors otherwise.
    pub fn write_request(
        &self,
        bus: &mut dyn BusTransactor,
        addr: u32,
        words: &[u32],
    ) -> Result<()> {
        let count = u32::try_from(words.len())
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| HarnessError::channel_protocol("write command needs 1..2^32 words"))?;

        let header = CommandHeader::new(CommandOp::Write, addr, count);
        debug!("channel write: addr={addr:#x} words={count}");
        for word in header.encode() {
            write_word(bus, self.write_port, word)?;
        }
        for &word in words {
            write_word(bus, self.write_port, word)?;
        }
        Ok(())
    }

    /// Issue a read command and collect `word_count` response words, each
    /// fetched as an individual 4-byte read from the read port, in issue
    /// order.
    ///
    /// # Errors
    ///
    /// `ChannelProtocol` for a zero word count; bus errors otherwise.
    pub fn read_request(
        &self,
        bus: &mut dyn BusTransactor,
        addr: u32,
        word_count: u32,
    ) -> Result<Vec<u32>> {
        if word_count == 0 {
            return Err(HarnessError::channel_protocol(
                "read command needs 1..2^32 words",
            ));
        }
        let header = CommandHeader::new(CommandOp::Read, addr, word_count);
        debug!("channel read: addr={addr:#x} words={word_count}");
        for word in header.encode() {
            write_word(bus, self.write_port, word)?;
        }
        (0..word_count)
            .map(|_| read_word(bus, self.read_port))
            .collect()
    }
}

impl ConfigurationChannel for SerializedChannel {
    fn configure(&self, bus: &mut dyn BusTransactor, job: &DmaJob) -> Result<()> {
        debug!(
            "serialized DMA configure: src={:#x} dst={:#x} length={}",
            job.src, job.dst, job.length
        );
        self.write_request(bus, self.config_base + regs::SRC, &[job.src])?;
        self.write_request(bus, self.config_base + regs::DST, &[job.dst])?;
        self.write_request(bus, self.config_base + regs::LENGTH, &[job.length])?;
        self.write_request(bus, self.config_base + regs::TRIGGER, &[regs::TRIGGER_WORD])?;
        Ok(())
    }

    fn read_status(&self, bus: &mut dyn BusTransactor) -> Result<u32> {
        let words = self.read_request(bus, self.config_base + regs::STATUS, 1)?;
        Ok(words[0])
    }
}
