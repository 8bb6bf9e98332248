//! Serialized command-channel wire format.
//!
//! The channel tunnels register-style requests through a single pair of
//! bus addresses: a write port and a read port [`PORT_SPACING`] bytes
//! above it. Every command starts with a five-word little-endian header:
//!
//! ```text
//! word 0   opcode        0 = read, 1 = write
//! word 1   address       target byte address
//! word 2   reserved      must be zero
//! word 3   length        word count minus one
//! word 4   reserved      must be zero
//! ```
//!
//! A write command is followed by `length + 1` payload words on the write
//! port. A read command is answered by `length + 1` words, fetched as
//! individual 4-byte reads from the read port.

/// Number of 32-bit words in a command header.
pub const HEADER_WORDS: usize = 5;

/// Byte distance between the write port and the read port.
pub const PORT_SPACING: u32 = 4;

/// Bytes per channel word.
pub const WORD_BYTES: usize = 4;

/// Command opcode, word 0 of the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOp {
    /// Read `length + 1` words starting at the target address.
    Read,
    /// Write `length + 1` payload words starting at the target address.
    Write,
}

impl CommandOp {
    /// Decode an opcode word. Returns `None` for anything but 0 or 1.
    #[must_use]
    pub const fn from_word(word: u32) -> Option<Self> {
        match word {
            0 => Some(Self::Read),
            1 => Some(Self::Write),
            _ => None,
        }
    }

    /// Encode as the header opcode word.
    #[must_use]
    pub const fn to_word(self) -> u32 {
        match self {
            Self::Read => 0,
            Self::Write => 1,
        }
    }
}

/// Decoded command header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandHeader {
    /// Read or write.
    pub op: CommandOp,
    /// Target byte address.
    pub addr: u32,
    /// Word count minus one, as carried on the wire.
    pub count_minus_one: u32,
}

impl CommandHeader {
    /// Build a header for `word_count` words at `addr`.
    ///
    /// # Panics
    ///
    /// Panics if `word_count` is zero — the wire encoding cannot express
    /// an empty command.
    #[must_use]
    pub fn new(op: CommandOp, addr: u32, word_count: u32) -> Self {
        assert!(word_count > 0, "channel commands carry at least one word");
        Self {
            op,
            addr,
            count_minus_one: word_count - 1,
        }
    }

    /// Number of payload (write) or response (read) words.
    #[must_use]
    pub const fn word_count(&self) -> u32 {
        self.count_minus_one + 1
    }

    /// Encode as the five on-wire header words.
    #[must_use]
    pub const fn encode(&self) -> [u32; HEADER_WORDS] {
        [self.op.to_word(), self.addr, 0, self.count_minus_one, 0]
    }

    /// Decode five on-wire words. Returns `None` if the opcode is unknown
    /// or a reserved word is nonzero.
    #[must_use]
    pub fn decode(words: &[u32; HEADER_WORDS]) -> Option<Self> {
        let op = CommandOp::from_word(words[0])?;
        if words[2] != 0 || words[4] != 0 {
            return None;
        }
        Some(Self {
            op,
            addr: words[1],
            count_minus_one: words[3],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_encodes_count_minus_one() {
        let h = CommandHeader::new(CommandOp::Write, 0x2080, 3);
        assert_eq!(h.encode(), [1, 0x2080, 0, 2, 0]);
    }

    #[test]
    fn single_word_read_has_zero_length_field() {
        let h = CommandHeader::new(CommandOp::Read, 0x20, 1);
        assert_eq!(h.encode(), [0, 0x20, 0, 0, 0]);
        assert_eq!(h.word_count(), 1);
    }

    #[test]
    fn decode_round_trip() {
        let h = CommandHeader::new(CommandOp::Read, 0xdead, 7);
        assert_eq!(CommandHeader::decode(&h.encode()), Some(h));
    }

    #[test]
    fn decode_rejects_bad_opcode_and_reserved_words() {
        assert_eq!(CommandHeader::decode(&[2, 0, 0, 0, 0]), None);
        assert_eq!(CommandHeader::decode(&[1, 0, 5, 0, 0]), None);
        assert_eq!(CommandHeader::decode(&[0, 0, 0, 0, 9]), None);
    }
}
