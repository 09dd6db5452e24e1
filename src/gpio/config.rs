//! # Static pin configuration
//!
//! The board configuration is a table of [`PinConfig`] entries which is applied once by
//! [`PortController::init`](super::PortController::init). The table is usually a `static` built
//! with the `const` builder functions:
//!
//! ```
//! use same5x_port_hal::gpio::{mux, pinmux, Direction, PinConfig, PullMode, PA04, PA10, PB22};
//!
//! static PINS: [PinConfig; 3] = [
//!     PinConfig::new(PA10).direction(Direction::Out).level(true),
//!     PinConfig::new(PB22).pull(PullMode::Up),
//!     PinConfig::new(PA04).function(pinmux(PA04, mux::D)),
//! ];
//! ```
use super::addr::{GpioId, GPIO_PIN_FUNCTION_OFF};
use super::port::{Direction, DriveStrength, PullMode};

/// Configuration of a single pin
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    pub id: GpioId,
    pub direction: Direction,
    /// A pull mode other than [`PullMode::Off`] turns the pin into an input
    pub pull: PullMode,
    /// Function code, [`GPIO_PIN_FUNCTION_OFF`] for plain GPIO use
    pub function: u32,
    /// Initial value of the output latch
    pub level: bool,
    pub drive: DriveStrength,
    /// Sample the input continuously instead of on demand
    pub continuous_sampling: bool,
}

impl PinConfig {
    /// Reset configuration: direction [`Direction::Off`], no pull, plain GPIO, latch low
    pub const fn new(id: GpioId) -> Self {
        PinConfig {
            id,
            direction: Direction::Off,
            pull: PullMode::Off,
            function: GPIO_PIN_FUNCTION_OFF,
            level: false,
            drive: DriveStrength::Normal,
            continuous_sampling: false,
        }
    }

    pub const fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub const fn pull(mut self, pull: PullMode) -> Self {
        self.pull = pull;
        self
    }

    pub const fn function(mut self, function: u32) -> Self {
        self.function = function;
        self
    }

    pub const fn level(mut self, level: bool) -> Self {
        self.level = level;
        self
    }

    pub const fn drive(mut self, drive: DriveStrength) -> Self {
        self.drive = drive;
        self
    }

    pub const fn continuous_sampling(mut self, enable: bool) -> Self {
        self.continuous_sampling = enable;
        self
    }
}
