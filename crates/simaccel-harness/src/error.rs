//! Error types for harness operations.

use thiserror::Error;

/// Result type alias for harness operations.
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Errors that abort a verification run.
///
/// Data mismatches are deliberately not in this taxonomy — they are
/// accumulated in [`crate::verifier::RunResult`] and reported in
/// aggregate at the end of the run.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Transfer window extends past the end of the address space.
    #[error("address out of range: {addr:#x}+{len} exceeds {limit:#x}")]
    AddressOutOfRange {
        /// Start address of the rejected transfer.
        addr: u32,
        /// Transfer length in bytes.
        len: usize,
        /// Exclusive upper bound of the address space.
        limit: u64,
    },

    /// Transfer is larger than the configured per-call byte cap.
    #[error("transfer of {size} bytes exceeds maximum of {max}")]
    SizeExceedsMax {
        /// Requested transfer size.
        size: usize,
        /// Configured maximum.
        max: usize,
    },

    /// Zero-length transfer.
    #[error("empty transfer rejected")]
    EmptyTransfer,

    /// Status register never went nonzero within the poll budget.
    #[error("completion poll timed out after {polls} polls")]
    PollTimeout {
        /// Number of polls issued before giving up.
        polls: u32,
    },

    /// Malformed serialized-channel traffic.
    #[error("channel protocol violation: {reason}")]
    ChannelProtocol {
        /// What went wrong on the wire.
        reason: String,
    },

    /// Run configuration rejected before any transaction was issued.
    #[error("invalid scenario: {reason}")]
    InvalidScenario {
        /// Which precondition failed.
        reason: String,
    },
}

impl HarnessError {
    /// Create a channel protocol error.
    pub fn channel_protocol(reason: impl Into<String>) -> Self {
        Self::ChannelProtocol {
            reason: reason.into(),
        }
    }

    /// Create an invalid scenario error.
    pub fn invalid_scenario(reason: impl Into<String>) -> Self {
        Self::InvalidScenario {
            reason: reason.into(),
        }
    }
}
