//! Pure model of the SimAccel accelerator shell.
//!
//! This crate has **no dependencies** and **no I/O** — it is a static
//! description of the simulated device as seen from the host bus: the DMA
//! configuration register map, the serialized command-channel wire format,
//! the bus interface geometry, and the memory layout the verification
//! harness drives against.
//!
//! # Crate organisation
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`regs`] | DMA configuration register map — offsets relative to the config base |
//! | [`wire`] | Serialized-channel command encoding (5-word LE header + payload) |
//! | [`iface`] | Bus interface geometry: widths, direction, burst limits |
//! | [`layout`] | Address-space layout: source region, control ports, DMA buffer |

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod iface;
pub mod layout;
pub mod regs;
pub mod wire;
