//! Golden reference memory.
//!
//! A byte-addressable mirror of what the device is expected to hold,
//! sized to the full address space and zeroed at creation — the same
//! reset state the simulated device starts from. It is mutated only by
//! writes issued through this harness and never rolled back: it always
//! represents the last-known-correct state assuming all prior writes
//! were observed.

/// One differing byte between expected and observed data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch {
    /// Address the observed byte was read from.
    pub addr: u32,
    /// Byte the golden model holds.
    pub expected: u8,
    /// Byte the device returned.
    pub actual: u8,
}

impl std::fmt::Display for Mismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:#07x}: expected {:#04x}, got {:#04x}",
            self.addr, self.expected, self.actual
        )
    }
}

/// Byte-for-byte comparison of an observed slice against its expected
/// contents, reporting addresses relative to `base`.
#[must_use]
pub fn diff_bytes(base: u32, expected: &[u8], actual: &[u8]) -> Vec<Mismatch> {
    debug_assert_eq!(expected.len(), actual.len());
    expected
        .iter()
        .zip(actual.iter())
        .enumerate()
        .filter(|(_, (e, a))| e != a)
        .map(|(i, (&expected, &actual))| Mismatch {
            addr: base + i as u32,
            expected,
            actual,
        })
        .collect()
}

/// Reference store mirroring expected device contents.
#[derive(Debug)]
pub struct GoldenMemory {
    bytes: Vec<u8>,
}

impl GoldenMemory {
    /// Create an all-zero model covering `2^addr_width` bytes.
    #[must_use]
    pub fn new(addr_width: u32) -> Self {
        Self {
            bytes: vec![0; 1 << addr_width],
        }
    }

    /// Overwrite the modeled bytes at `addr..addr + data.len()`.
    ///
    /// # Panics
    ///
    /// Panics if the range falls outside the modeled space; callers
    /// validate addresses against [`crate::bus::BusParams`] first.
    pub fn update(&mut self, addr: u32, data: &[u8]) {
        let start = addr as usize;
        self.bytes[start..start + data.len()].copy_from_slice(data);
    }

    /// Expected contents of `addr..addr + len`.
    ///
    /// # Panics
    ///
    /// Panics if the range falls outside the modeled space.
    #[must_use]
    pub fn expected(&self, addr: u32, len: usize) -> &[u8] {
        let start = addr as usize;
        &self.bytes[start..start + len]
    }

    /// Compare observed data against the model at `addr`, one mismatch
    /// record per differing byte.
    #[must_use]
    pub fn compare(&self, addr: u32, actual: &[u8]) -> Vec<Mismatch> {
        diff_bytes(addr, self.expected(addr, actual.len()), actual)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_all_zero() {
        let golden = GoldenMemory::new(10);
        assert_eq!(golden.expected(0, 1 << 10), vec![0u8; 1 << 10].as_slice());
    }

    #[test]
    fn update_then_compare_is_clean() {
        let mut golden = GoldenMemory::new(10);
        golden.update(0x40, &[1, 2, 3, 4]);
        assert!(golden.compare(0x40, &[1, 2, 3, 4]).is_empty());
    }

    #[test]
    fn compare_reports_each_differing_byte() {
        let mut golden = GoldenMemory::new(10);
        golden.update(0x10, &[0xAA, 0xBB, 0xCC]);
        let mismatches = golden.compare(0x10, &[0xAA, 0x00, 0xCD]);
        assert_eq!(
            mismatches,
            vec![
                Mismatch {
                    addr: 0x11,
                    expected: 0xBB,
                    actual: 0x00
                },
                Mismatch {
                    addr: 0x12,
                    expected: 0xCC,
                    actual: 0xCD
                },
            ]
        );
    }

    #[test]
    fn overlapping_update_wins() {
        let mut golden = GoldenMemory::new(10);
        golden.update(0x20, &[1, 1, 1, 1]);
        golden.update(0x22, &[9, 9]);
        assert_eq!(golden.expected(0x20, 4), &[1, 1, 9, 9]);
    }
}
