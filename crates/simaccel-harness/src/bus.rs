//! Bus transactor abstraction.
//!
//! Everything the harness knows about the device goes through
//! [`BusTransactor`]: a blocking read/write primitive over a
//! memory-mapped subordinate interface. Calls are atomic and observe
//! program order on the same instance; the bus is singly owned for the
//! duration of a run, so the trait takes `&mut self`.

use crate::error::{HarnessError, Result};
use simaccel_chip::iface::{
    BusDirection, ADDR_WIDTH, DATA_WIDTH, DEFAULT_MAX_BEATS, DEFAULT_MAX_BYTES, ID_WIDTH,
};

/// Interface parameters, supplied once at setup and fixed for the run.
#[derive(Debug, Clone)]
pub struct BusParams {
    /// Address width in bits; valid addresses are `0..2^addr_width`.
    pub addr_width: u32,
    /// Data width of one beat, in bits.
    pub data_width: u32,
    /// Transaction-id width in bits.
    pub id_width: u32,
    /// Which side of the connection the device plays.
    pub direction: BusDirection,
    /// Maximum beats per burst; longer transfers are split transparently.
    pub max_beats: u32,
    /// Maximum bytes accepted by a single read or write call.
    pub max_bytes: usize,
}

impl Default for BusParams {
    fn default() -> Self {
        Self {
            addr_width: ADDR_WIDTH,
            data_width: DATA_WIDTH,
            id_width: ID_WIDTH,
            direction: BusDirection::Subordinate,
            max_beats: DEFAULT_MAX_BEATS,
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }
}

impl BusParams {
    /// Exclusive upper bound of the address space.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        1u64 << self.addr_width
    }

    /// Bytes carried by one beat.
    #[must_use]
    pub const fn beat_bytes(&self) -> usize {
        (self.data_width / 8) as usize
    }

    /// Bytes carried by one full burst.
    #[must_use]
    pub const fn burst_bytes(&self) -> usize {
        self.beat_bytes() * self.max_beats as usize
    }

    /// Validate a transfer window against the interface limits.
    ///
    /// # Errors
    ///
    /// `EmptyTransfer` for zero-length transfers, `SizeExceedsMax` when
    /// `len` exceeds the per-call byte cap, `AddressOutOfRange` when the
    /// window extends past `2^addr_width`.
    pub fn check_transfer(&self, addr: u32, len: usize) -> Result<()> {
        if len == 0 {
            return Err(HarnessError::EmptyTransfer);
        }
        if len > self.max_bytes {
            return Err(HarnessError::SizeExceedsMax {
                size: len,
                max: self.max_bytes,
            });
        }
        if u64::from(addr) + len as u64 > self.limit() {
            return Err(HarnessError::AddressOutOfRange {
                addr,
                len,
                limit: self.limit(),
            });
        }
        Ok(())
    }
}

/// Blocking read/write primitive over the simulated bus.
///
/// Implementations must validate every transfer with
/// [`BusParams::check_transfer`] before touching device state, and may
/// split transfers into bursts of at most `max_beats` beats — invisibly
/// to the caller, who sees each call complete as a whole.
pub trait BusTransactor {
    /// Interface parameters this transactor was built with.
    fn params(&self) -> &BusParams;

    /// Transfer `data` to the device starting at `addr`.
    ///
    /// # Errors
    ///
    /// Returns a precondition error for empty, oversized, or
    /// out-of-range transfers; the transfer is rejected before anything
    /// is issued.
    fn write(&mut self, addr: u32, data: &[u8]) -> Result<()>;

    /// Fetch exactly `len` bytes from the device starting at `addr`.
    ///
    /// # Errors
    ///
    /// Same preconditions as [`BusTransactor::write`].
    fn read(&mut self, addr: u32, len: usize) -> Result<Vec<u8>>;
}

/// Write one little-endian 32-bit word.
///
/// # Errors
///
/// Propagates the transactor's precondition errors.
pub fn write_word(bus: &mut dyn BusTransactor, addr: u32, word: u32) -> Result<()> {
    bus.write(addr, &word.to_le_bytes())
}

/// Read one little-endian 32-bit word.
///
/// # Errors
///
/// Propagates the transactor's precondition errors.
pub fn read_word(bus: &mut dyn BusTransactor, addr: u32) -> Result<u32> {
    let bytes = bus.read(addr, 4)?;
    let arr: [u8; 4] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| HarnessError::channel_protocol("short word read"))?;
    Ok(u32::from_le_bytes(arr))
}
