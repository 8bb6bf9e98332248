//! Bus interface geometry.
//!
//! The shell exposes its host-facing interfaces as subordinate
//! memory-mapped ports. These constants are the parameters the simulated
//! device is built with; they are supplied once at setup and never change
//! during a run.

/// Address width of the host-facing interfaces, in bits.
pub const ADDR_WIDTH: u32 = 18;

/// Data width of one beat, in bits.
pub const DATA_WIDTH: u32 = 32;

/// Transaction-id width, in bits.
pub const ID_WIDTH: u32 = 2;

/// Default maximum burst length, in beats.
pub const DEFAULT_MAX_BEATS: u32 = 1;

/// Default cap on bytes per single read or write call.
pub const DEFAULT_MAX_BYTES: usize = 4;

/// Which side of the memory-mapped connection an interface plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BusDirection {
    /// The responding (target) side — the device's role here.
    #[default]
    Subordinate,
    /// The initiating side.
    Manager,
}
