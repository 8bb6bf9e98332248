//! Bus transactor backends.
//!
//! One backend ships today: the in-process simulated device. The harness
//! itself only sees [`crate::bus::BusTransactor`], so a transactor backed
//! by an external RTL simulation plugs in behind the same trait.

pub mod sim;

pub use sim::SimAccelDevice;
