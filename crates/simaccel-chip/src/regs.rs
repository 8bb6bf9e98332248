//! DMA configuration register map.
//!
//! All offsets are in bytes relative to the configuration base address.
//! Every register is a 4-byte little-endian word. Programming order
//! matters: `SRC`, `DST`, `LENGTH` must be written before `TRIGGER`;
//! `STATUS` is polled after the trigger until it reads nonzero.

// ── Configuration registers ──────────────────────────────────────────────────

/// DMA source base address.
pub const SRC: u32 = 0;

/// DMA destination base address.
pub const DST: u32 = 8;

/// DMA transfer length in bytes.
pub const LENGTH: u32 = 16;

/// Trigger register — writing the all-zero word starts the transfer.
/// The write itself is the start signal; the value is ignored.
pub const TRIGGER: u32 = 24;

/// Completion status — reads zero while the transfer is in flight,
/// nonzero once it has finished.
pub const STATUS: u32 = 32;

// ── Geometry ─────────────────────────────────────────────────────────────────

/// Width of every configuration register, in bytes.
pub const REG_BYTES: usize = 4;

/// Size of the register window: `STATUS` is the last register.
pub const WINDOW_BYTES: u32 = STATUS + REG_BYTES as u32;

/// Value written to [`TRIGGER`] to start a transfer.
pub const TRIGGER_WORD: u32 = 0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_offsets_match_device() {
        assert_eq!(SRC, 0);
        assert_eq!(DST, 8);
        assert_eq!(LENGTH, 16);
        assert_eq!(TRIGGER, 24);
        assert_eq!(STATUS, 32);
    }

    #[test]
    fn registers_fit_in_window() {
        for off in [SRC, DST, LENGTH, TRIGGER, STATUS] {
            assert!(off + REG_BYTES as u32 <= WINDOW_BYTES);
        }
    }
}
