//! Address-space layout driven by the verification harness.
//!
//! ```text
//! 0x10000  ┌──────────────────────┐
//!          │ source region        │  randomized traffic + DMA source payload
//! 0x20000  ├──────────────────────┤
//!          │ channel write port   │  serialized-command tunnel (4 bytes)
//! 0x20004  │ channel read port    │  response words (4 bytes)
//! 0x20800  ├──────────────────────┤
//!          │ DMA config registers │  src / dst / length / trigger / status
//! 0x21000  ├──────────────────────┤
//!          │ DMA buffer           │  directed-scenario destination
//!          └──────────────────────┘
//! ```

use crate::wire::PORT_SPACING;

/// Base of the source / randomized-traffic region.
pub const SOURCE_BASE: u32 = 0x1_0000;

/// Length of the randomized-traffic address window.
pub const WINDOW_LEN: u32 = 0x1_0000;

/// Base of the control region.
pub const CTRL_BASE: u32 = 0x2_0000;

/// Serialized-channel write port.
pub const CHANNEL_WRITE_PORT: u32 = CTRL_BASE;

/// Serialized-channel read port.
pub const CHANNEL_READ_PORT: u32 = CTRL_BASE + PORT_SPACING;

/// Base address of the DMA configuration registers.
pub const CONFIG_BASE: u32 = CTRL_BASE + 0x800;

/// Base of the DMA destination buffer.
pub const DMA_BUFFER_BASE: u32 = CTRL_BASE + 0x1000;

/// Default directed-scenario transfer length in bytes.
pub const DEFAULT_DMA_LENGTH: u32 = 32;
