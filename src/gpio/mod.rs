//! # PORT (GPIO) module
//!
//! The SAM E5x PORT peripheral is split into groups of up to 32 pins. Every group has its own
//! register block, so this module hands out one [`PortGroup`] handle per group. Each handle is the
//! only way to reach the registers of its group and every mutating operation requires
//! `&mut self`, so concurrent access to the same group from different execution contexts has to
//! be made explicit, for example with a [`SharedGroup`].
//!
//! The API is organized in layers:
//!
//! - [`addr`]: Packing of a port group and a pin number into a [`GpioId`] and back
//! - [`port`]: The mask based state operations (direction, level, pull mode, function select)
//!   on a single [`PortGroup`]
//! - [`controller`]: The [`PortController`] which applies the static [`PinConfig`] table on
//!   initialization and dispatches the operations by [`Port`]
//! - [`dynpin`]: A value-level single pin which implements the embedded HAL digital traits
//! - [`checked`]: An optional validating layer on top of the unchecked core
//!
//! The core operations do not validate their arguments. Masks or pins which do not exist on the
//! device, or function codes which are not supported by a pin, silently produce wrong hardware
//! behaviour. Use [`checked::CheckedPorts`] if the arguments are not known to be valid.
//!
//! ## Examples
//!
//! - Blinky demo: `demos/blinky.rs`
//! - Loopback test image: `demos/port_test.rs`
pub mod addr;
pub use addr::*;

pub mod checked;

pub mod config;
pub use config::*;

pub mod controller;
pub use controller::*;

pub mod dynpin;
pub use dynpin::*;

pub mod port;
pub use port::*;

pub mod reg;
pub use reg::{GroupRegisters, MmioGroup};

pub mod shared;
pub use shared::*;

pub mod sim;
