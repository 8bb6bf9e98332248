//! Bounded completion polling.
//!
//! The observed system spins on the status register with no bound; here
//! every poll loop carries a budget and exhausting it is a hard
//! [`HarnessError::PollTimeout`], never an unbounded block.

use crate::bus::BusTransactor;
use crate::channel::ConfigurationChannel;
use crate::error::{HarnessError, Result};
use tracing::trace;

/// Default poll budget for the simulated device.
pub const DEFAULT_MAX_POLLS: u32 = 10_000;

/// Polls a status word through a configuration channel until its low
/// byte goes nonzero.
#[derive(Debug, Clone, Copy)]
pub struct CompletionPoller {
    max_polls: u32,
}

impl CompletionPoller {
    /// Poller with the given budget.
    #[must_use]
    pub const fn new(max_polls: u32) -> Self {
        Self { max_polls }
    }

    /// Configured budget.
    #[must_use]
    pub const fn max_polls(&self) -> u32 {
        self.max_polls
    }

    /// Re-read the status word until its first byte is nonzero,
    /// returning the number of polls issued.
    ///
    /// # Errors
    ///
    /// `PollTimeout` once the budget is exhausted; channel and bus
    /// errors propagate immediately.
    pub fn await_nonzero(
        &self,
        bus: &mut dyn BusTransactor,
        channel: &dyn ConfigurationChannel,
    ) -> Result<u32> {
        for i in 0..self.max_polls {
            let status = channel.read_status(bus)?;
            trace!(poll = i + 1, status, "status poll");
            if status & 0xFF != 0 {
                return Ok(i + 1);
            }
        }
        Err(HarnessError::PollTimeout {
            polls: self.max_polls,
        })
    }
}

impl Default for CompletionPoller {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_POLLS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::BusParams;
    use crate::channel::DmaJob;
    use std::cell::Cell;

    /// Transactor stub; the stub channel below never touches it.
    struct NullBus(BusParams);

    impl BusTransactor for NullBus {
        fn params(&self) -> &BusParams {
            &self.0
        }
        fn write(&mut self, addr: u32, data: &[u8]) -> Result<()> {
            self.0.check_transfer(addr, data.len())
        }
        fn read(&mut self, addr: u32, len: usize) -> Result<Vec<u8>> {
            self.0.check_transfer(addr, len)?;
            Ok(vec![0; len])
        }
    }

    /// Channel whose status goes nonzero after a fixed number of reads.
    struct CountdownChannel {
        remaining: Cell<u32>,
    }

    impl ConfigurationChannel for CountdownChannel {
        fn configure(&self, _bus: &mut dyn BusTransactor, _job: &DmaJob) -> Result<()> {
            Ok(())
        }
        fn read_status(&self, _bus: &mut dyn BusTransactor) -> Result<u32> {
            let left = self.remaining.get();
            if left == 0 {
                Ok(1)
            } else {
                self.remaining.set(left - 1);
                Ok(0)
            }
        }
    }

    #[test]
    fn returns_poll_count_on_completion() {
        let mut bus = NullBus(BusParams::default());
        let channel = CountdownChannel {
            remaining: Cell::new(4),
        };
        let polls = CompletionPoller::new(10)
            .await_nonzero(&mut bus, &channel)
            .unwrap();
        assert_eq!(polls, 5);
    }

    #[test]
    fn times_out_within_budget() {
        let mut bus = NullBus(BusParams::default());
        let channel = CountdownChannel {
            remaining: Cell::new(u32::MAX),
        };
        let err = CompletionPoller::new(8)
            .await_nonzero(&mut bus, &channel)
            .unwrap_err();
        assert!(matches!(err, HarnessError::PollTimeout { polls: 8 }));
    }
}
