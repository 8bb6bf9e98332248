//! In-process simulated accelerator shell.
//!
//! Implements [`BusTransactor`] over a flat byte RAM plus the two device
//! features the harness verifies: the DMA engine behind the
//! configuration registers, and the serialized command channel behind
//! the control port pair. This is the stand-in for the RTL simulation,
//! so every run — CI included — exercises the full harness without an
//! external simulator.
//!
//! Behavior matches the observed device:
//!
//! - Registers and channel ports are word-granular; they shadow RAM only
//!   for aligned 4-byte accesses.
//! - Writing the trigger clears the status register and starts the copy;
//!   status reads report completion only after a configurable number of
//!   polls, so the poller's retry path is exercised on every run.
//! - The channel keeps its own word store. It is **not** wired to the
//!   DMA configuration registers — configuring through it lands in
//!   channel-local memory and the real engine never starts.

use std::collections::{HashMap, VecDeque};

use crate::bus::{BusParams, BusTransactor};
use crate::error::{HarnessError, Result};
use crate::scenario::TestScenario;
use simaccel_chip::layout;
use simaccel_chip::regs;
use simaccel_chip::wire::{CommandHeader, CommandOp, HEADER_WORDS, PORT_SPACING};
use tracing::{debug, trace, warn};

/// Status reads a freshly triggered transfer stays pending for.
const DEFAULT_COMPLETION_LATENCY: u32 = 3;

#[derive(Debug, Default)]
struct DmaRegs {
    src: u32,
    dst: u32,
    length: u32,
    status: u32,
}

#[derive(Debug)]
enum ChannelState {
    Header(Vec<u32>),
    Payload { next_addr: u32, remaining: u32 },
}

/// Serialized-channel engine: header/payload state machine, a
/// channel-local word store, and the response FIFO behind the read port.
#[derive(Debug)]
struct ChannelEngine {
    state: ChannelState,
    store: HashMap<u32, u32>,
    responses: VecDeque<u32>,
}

impl ChannelEngine {
    fn new() -> Self {
        Self {
            state: ChannelState::Header(Vec::with_capacity(HEADER_WORDS)),
            store: HashMap::new(),
            responses: VecDeque::new(),
        }
    }

    fn push_word(&mut self, word: u32) -> Result<()> {
        match &mut self.state {
            ChannelState::Header(words) => {
                words.push(word);
                if words.len() < HEADER_WORDS {
                    return Ok(());
                }
                let raw: [u32; HEADER_WORDS] =
                    words.as_slice().try_into().expect("header length checked");
                let Some(header) = CommandHeader::decode(&raw) else {
                    // Drop the malformed header so the port can resync.
                    self.state = ChannelState::Header(Vec::with_capacity(HEADER_WORDS));
                    return Err(HarnessError::channel_protocol(format!(
                        "bad command header {raw:08x?}"
                    )));
                };
                trace!(?header, "channel command");
                match header.op {
                    CommandOp::Write => {
                        self.state = ChannelState::Payload {
                            next_addr: header.addr,
                            remaining: header.word_count(),
                        };
                    }
                    CommandOp::Read => {
                        for i in 0..header.word_count() {
                            let addr = header.addr.wrapping_add(i * PORT_SPACING);
                            let value = self.store.get(&addr).copied().unwrap_or(0);
                            self.responses.push_back(value);
                        }
                        self.state = ChannelState::Header(Vec::with_capacity(HEADER_WORDS));
                    }
                }
                Ok(())
            }
            ChannelState::Payload {
                next_addr,
                remaining,
            } => {
                self.store.insert(*next_addr, word);
                *next_addr = next_addr.wrapping_add(PORT_SPACING);
                *remaining -= 1;
                if *remaining == 0 {
                    self.state = ChannelState::Header(Vec::with_capacity(HEADER_WORDS));
                }
                Ok(())
            }
        }
    }

    fn pop_response(&mut self) -> Result<u32> {
        self.responses
            .pop_front()
            .ok_or_else(|| HarnessError::channel_protocol("read port has no pending response"))
    }
}

/// Simulated accelerator shell behind the bus-transactor seam.
#[derive(Debug)]
pub struct SimAccelDevice {
    params: BusParams,
    mem: Vec<u8>,
    config_base: u32,
    channel_write_port: u32,
    channel_read_port: u32,
    dma: DmaRegs,
    channel: ChannelEngine,
    completion_latency: u32,
    pending_polls: Option<u32>,
}

impl SimAccelDevice {
    /// Device with its register map at `config_base` and the channel
    /// write port at `ctrl_addr`.
    #[must_use]
    pub fn new(params: BusParams, config_base: u32, ctrl_addr: u32) -> Self {
        let mem = vec![0u8; usize::try_from(params.limit()).expect("address space fits usize")];
        Self {
            params,
            mem,
            config_base,
            channel_write_port: ctrl_addr,
            channel_read_port: ctrl_addr + PORT_SPACING,
            dma: DmaRegs::default(),
            channel: ChannelEngine::new(),
            completion_latency: DEFAULT_COMPLETION_LATENCY,
            pending_polls: None,
        }
    }

    /// Device laid out to match a scenario.
    #[must_use]
    pub fn for_scenario(scenario: &TestScenario) -> Self {
        Self::new(
            scenario.bus.clone(),
            scenario.config_base,
            scenario.ctrl_addr,
        )
    }

    /// Device with the default layout and bus geometry.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(
            BusParams::default(),
            layout::CONFIG_BASE,
            layout::CHANNEL_WRITE_PORT,
        )
    }

    /// Set how many status polls a triggered transfer stays pending for.
    /// A latency beyond the poll budget models a hung device.
    #[must_use]
    pub fn with_completion_latency(mut self, polls: u32) -> Self {
        self.completion_latency = polls;
        self
    }

    fn is_config_word(&self, addr: u32, len: usize) -> bool {
        len == regs::REG_BYTES
            && addr >= self.config_base
            && addr + regs::REG_BYTES as u32 <= self.config_base + regs::WINDOW_BYTES
            && (addr - self.config_base) % regs::REG_BYTES as u32 == 0
    }

    fn config_write(&mut self, offset: u32, value: u32) {
        match offset {
            regs::SRC => self.dma.src = value,
            regs::DST => self.dma.dst = value,
            regs::LENGTH => self.dma.length = value,
            regs::TRIGGER => self.start_dma(),
            regs::STATUS => self.dma.status = value,
            _ => warn!(offset, "write to unmapped config offset ignored"),
        }
    }

    fn config_read(&mut self, offset: u32) -> u32 {
        match offset {
            regs::SRC => self.dma.src,
            regs::DST => self.dma.dst,
            regs::LENGTH => self.dma.length,
            regs::TRIGGER => regs::TRIGGER_WORD,
            regs::STATUS => self.status_poll(),
            _ => 0,
        }
    }

    /// Latch the programmed job and start the copy. Status is cleared
    /// first, so a poll can never observe a stale completion.
    fn start_dma(&mut self) {
        self.dma.status = 0;
        let src = self.dma.src as usize;
        let dst = self.dma.dst as usize;
        let len = self.dma.length as usize;
        if src + len > self.mem.len() || dst + len > self.mem.len() {
            warn!("DMA window {src:#x}/{dst:#x}+{len} exceeds memory; copy skipped");
        } else {
            let payload = self.mem[src..src + len].to_vec();
            self.mem[dst..dst + len].copy_from_slice(&payload);
        }
        self.pending_polls = Some(self.completion_latency);
        debug!(
            "DMA triggered: src={src:#x} dst={dst:#x} len={len} latency={}",
            self.completion_latency
        );
    }

    fn status_poll(&mut self) -> u32 {
        if let Some(left) = self.pending_polls {
            if left == 0 {
                self.dma.status = 1;
                self.pending_polls = None;
            } else {
                self.pending_polls = Some(left - 1);
            }
        }
        self.dma.status
    }

    fn ram_write(&mut self, addr: u32, data: &[u8]) {
        let burst = self.params.burst_bytes();
        let mut offset = addr as usize;
        for chunk in data.chunks(burst) {
            trace!(
                "write burst: addr={offset:#x} beats={}",
                chunk.len().div_ceil(self.params.beat_bytes())
            );
            self.mem[offset..offset + chunk.len()].copy_from_slice(chunk);
            offset += chunk.len();
        }
    }

    fn ram_read(&self, addr: u32, len: usize) -> Vec<u8> {
        let burst = self.params.burst_bytes();
        let mut out = Vec::with_capacity(len);
        let mut offset = addr as usize;
        let mut remaining = len;
        while remaining > 0 {
            let chunk = remaining.min(burst);
            trace!(
                "read burst: addr={offset:#x} beats={}",
                chunk.div_ceil(self.params.beat_bytes())
            );
            out.extend_from_slice(&self.mem[offset..offset + chunk]);
            offset += chunk;
            remaining -= chunk;
        }
        out
    }
}

impl BusTransactor for SimAccelDevice {
    fn params(&self) -> &BusParams {
        &self.params
    }

    fn write(&mut self, addr: u32, data: &[u8]) -> Result<()> {
        self.params.check_transfer(addr, data.len())?;

        if addr == self.channel_write_port && data.len() == regs::REG_BYTES {
            let word = u32::from_le_bytes(data.try_into().expect("length checked"));
            return self.channel.push_word(word);
        }
        if self.is_config_word(addr, data.len()) {
            let word = u32::from_le_bytes(data.try_into().expect("length checked"));
            self.config_write(addr - self.config_base, word);
            return Ok(());
        }
        self.ram_write(addr, data);
        Ok(())
    }

    fn read(&mut self, addr: u32, len: usize) -> Result<Vec<u8>> {
        self.params.check_transfer(addr, len)?;

        if addr == self.channel_read_port && len == regs::REG_BYTES {
            let word = self.channel.pop_response()?;
            return Ok(word.to_le_bytes().to_vec());
        }
        if self.is_config_word(addr, len) {
            let word = self.config_read(addr - self.config_base);
            return Ok(word.to_le_bytes().to_vec());
        }
        Ok(self.ram_read(addr, len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::{read_word, write_word};

    fn device() -> SimAccelDevice {
        SimAccelDevice::with_defaults()
    }

    #[test]
    fn ram_write_read_round_trip() {
        let mut dev = device();
        dev.write(0x10040, &[0xDE, 0xAD]).unwrap();
        assert_eq!(dev.read(0x10040, 2).unwrap(), vec![0xDE, 0xAD]);
    }

    #[test]
    fn memory_resets_to_zero() {
        let mut dev = device();
        assert_eq!(dev.read(0x10000, 4).unwrap(), vec![0; 4]);
    }

    #[test]
    fn config_registers_read_back() {
        let mut dev = device();
        write_word(&mut dev, layout::CONFIG_BASE + regs::SRC, 0x10000).unwrap();
        write_word(&mut dev, layout::CONFIG_BASE + regs::LENGTH, 32).unwrap();
        assert_eq!(
            read_word(&mut dev, layout::CONFIG_BASE + regs::SRC).unwrap(),
            0x10000
        );
        assert_eq!(
            read_word(&mut dev, layout::CONFIG_BASE + regs::LENGTH).unwrap(),
            32
        );
    }

    #[test]
    fn status_stays_zero_until_latency_polls_elapse() {
        let mut dev = device().with_completion_latency(2);
        write_word(&mut dev, layout::CONFIG_BASE + regs::SRC, 0x10000).unwrap();
        write_word(&mut dev, layout::CONFIG_BASE + regs::DST, 0x21000).unwrap();
        write_word(&mut dev, layout::CONFIG_BASE + regs::LENGTH, 4).unwrap();
        write_word(&mut dev, layout::CONFIG_BASE + regs::TRIGGER, 0).unwrap();

        let status_addr = layout::CONFIG_BASE + regs::STATUS;
        assert_eq!(read_word(&mut dev, status_addr).unwrap(), 0);
        assert_eq!(read_word(&mut dev, status_addr).unwrap(), 0);
        assert_eq!(read_word(&mut dev, status_addr).unwrap(), 1);
    }

    #[test]
    fn status_is_zero_before_any_trigger() {
        let mut dev = device().with_completion_latency(0);
        for _ in 0..4 {
            assert_eq!(
                read_word(&mut dev, layout::CONFIG_BASE + regs::STATUS).unwrap(),
                0
            );
        }
    }

    #[test]
    fn dma_copies_source_to_destination() {
        let mut dev = device().with_completion_latency(0);
        dev.write(0x10000, &[1, 2, 3, 4]).unwrap();
        write_word(&mut dev, layout::CONFIG_BASE + regs::SRC, 0x10000).unwrap();
        write_word(&mut dev, layout::CONFIG_BASE + regs::DST, 0x21000).unwrap();
        write_word(&mut dev, layout::CONFIG_BASE + regs::LENGTH, 4).unwrap();
        write_word(&mut dev, layout::CONFIG_BASE + regs::TRIGGER, 0).unwrap();
        assert_eq!(dev.read(0x21000, 4).unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn channel_is_not_wired_to_dma_registers() {
        let mut dev = device();
        // Program src through the channel; the real register must not move.
        let header = CommandHeader::new(CommandOp::Write, layout::CONFIG_BASE + regs::SRC, 1);
        for word in header.encode() {
            write_word(&mut dev, layout::CHANNEL_WRITE_PORT, word).unwrap();
        }
        write_word(&mut dev, layout::CHANNEL_WRITE_PORT, 0x1234).unwrap();
        assert_eq!(
            read_word(&mut dev, layout::CONFIG_BASE + regs::SRC).unwrap(),
            0
        );
    }

    #[test]
    fn channel_read_of_unwritten_word_returns_zero() {
        let mut dev = device();
        let header = CommandHeader::new(CommandOp::Read, 0x40, 1);
        for word in header.encode() {
            write_word(&mut dev, layout::CHANNEL_WRITE_PORT, word).unwrap();
        }
        assert_eq!(read_word(&mut dev, layout::CHANNEL_READ_PORT).unwrap(), 0);
    }

    #[test]
    fn empty_read_port_is_a_protocol_error() {
        let mut dev = device();
        let err = read_word(&mut dev, layout::CHANNEL_READ_PORT).unwrap_err();
        assert!(matches!(err, HarnessError::ChannelProtocol { .. }));
    }

    #[test]
    fn malformed_header_is_rejected() {
        let mut dev = device();
        // Opcode 7 is unknown; detected once the fifth header word lands.
        for word in [7u32, 0, 0, 0] {
            write_word(&mut dev, layout::CHANNEL_WRITE_PORT, word).unwrap();
        }
        let err = write_word(&mut dev, layout::CHANNEL_WRITE_PORT, 0).unwrap_err();
        assert!(matches!(err, HarnessError::ChannelProtocol { .. }));

        // The port resyncs: a well-formed command still goes through.
        let header = CommandHeader::new(CommandOp::Read, 0x10, 1);
        for word in header.encode() {
            write_word(&mut dev, layout::CHANNEL_WRITE_PORT, word).unwrap();
        }
        assert_eq!(read_word(&mut dev, layout::CHANNEL_READ_PORT).unwrap(), 0);
    }

    #[test]
    fn bursts_are_transparent_to_the_caller() {
        let params = BusParams {
            max_beats: 2,
            max_bytes: 64,
            ..BusParams::default()
        };
        let mut dev = SimAccelDevice::new(params, layout::CONFIG_BASE, layout::CTRL_BASE);
        let data: Vec<u8> = (0..37).collect();
        dev.write(0x10000, &data).unwrap();
        assert_eq!(dev.read(0x10000, 37).unwrap(), data);
    }
}
