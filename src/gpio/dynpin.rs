//! # Value-level single pin
//!
//! A [`DynPin`] borrows a [`PortGroup`] and addresses one pin of it. It is the bridge between the
//! mask based port operations and drivers which expect the embedded HAL digital traits.
//!
//! ```
//! use embedded_hal::digital::v2::{OutputPin, StatefulOutputPin};
//! use same5x_port_hal::gpio::{sim::SimGroup, Port, PortGroup};
//!
//! let sim = SimGroup::default();
//! let mut porta = PortGroup::new(Port::A, &sim);
//! let mut led = porta.pin(10);
//! led.into_push_pull_output();
//! led.set_high().ok();
//! assert!(led.is_set_high().unwrap());
//! ```
//!
//! The pin mode is not tracked in the type system. The digital traits never fail: reading a pin
//! reports the input buffer for inputs and the output latch for outputs, and writing the level
//! of a pin which is not an output only updates its output latch.
use super::addr::GpioId;
use super::port::{Direction, DriveStrength, PortGroup, PullMode};
use super::reg::GroupRegisters;
use core::convert::Infallible;
use embedded_hal::digital::v2::{InputPin, OutputPin, StatefulOutputPin, ToggleableOutputPin};

/// A single pin of a borrowed [`PortGroup`]
pub struct DynPin<'a, R> {
    group: &'a mut PortGroup<R>,
    pin: u8,
}

impl<'a, R: GroupRegisters> DynPin<'a, R> {
    /// Only the lower 5 bits of `pin` are used
    #[inline]
    pub fn new(group: &'a mut PortGroup<R>, pin: u8) -> Self {
        DynPin {
            group,
            pin: pin & 0x1f,
        }
    }

    #[inline]
    pub fn id(&self) -> GpioId {
        self.group.id(self.pin)
    }

    #[inline]
    fn mask(&self) -> u32 {
        1 << self.pin
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.group.direction(self.pin)
    }

    #[inline]
    pub fn pull_mode(&self) -> PullMode {
        self.group.pull_mode(self.pin)
    }

    /// Configure the pin to operate as a push-pull output
    #[inline]
    pub fn into_push_pull_output(&mut self) {
        self.group.set_direction(self.mask(), Direction::Out);
    }

    /// Configure the pin to operate as a push-pull output with the given initial level. The
    /// latch is written before the output driver is enabled.
    #[inline]
    pub fn into_push_pull_output_in_state(&mut self, level: bool) {
        self.group.set_level(self.mask(), level);
        self.group.set_direction(self.mask(), Direction::Out);
    }

    /// Configure the pin to operate as a floating input
    #[inline]
    pub fn into_floating_input(&mut self) {
        self.group.set_direction(self.mask(), Direction::In);
    }

    /// Configure the pin to operate as a pulled up input
    #[inline]
    pub fn into_pull_up_input(&mut self) {
        self.group.set_direction(self.mask(), Direction::In);
        self.group.set_pin_pull_mode(self.pin, PullMode::Up);
    }

    /// Configure the pin to operate as a pulled down input
    #[inline]
    pub fn into_pull_down_input(&mut self) {
        self.group.set_direction(self.mask(), Direction::In);
        self.group.set_pin_pull_mode(self.pin, PullMode::Down);
    }

    /// Disable the pin. Input buffer, output driver and pull resistor are switched off.
    #[inline]
    pub fn into_disabled(&mut self) {
        self.group.set_direction(self.mask(), Direction::Off);
    }

    /// Hand the pin to a peripheral function. See [`PortGroup::set_pin_function`].
    #[inline]
    pub fn into_function(&mut self, function: u32) {
        self.group.set_pin_function(self.pin, function);
    }

    #[inline]
    pub fn set_drive_strength(&mut self, strength: DriveStrength) {
        self.group.set_pin_drive_strength(self.pin, strength);
    }

    #[inline]
    fn _is_high(&self) -> bool {
        self.group.get_level() & self.mask() != 0
    }

    #[inline]
    fn _is_set_high(&self) -> bool {
        self.group.output_latch() & self.mask() != 0
    }
}

//==================================================================================================
// Embedded HAL traits
//==================================================================================================

impl<R: GroupRegisters> OutputPin for DynPin<'_, R> {
    type Error = Infallible;

    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.group.set_level(self.mask(), true);
        Ok(())
    }

    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.group.set_level(self.mask(), false);
        Ok(())
    }
}

impl<R: GroupRegisters> StatefulOutputPin for DynPin<'_, R> {
    #[inline]
    fn is_set_high(&self) -> Result<bool, Self::Error> {
        Ok(self._is_set_high())
    }

    #[inline]
    fn is_set_low(&self) -> Result<bool, Self::Error> {
        Ok(!self._is_set_high())
    }
}

impl<R: GroupRegisters> ToggleableOutputPin for DynPin<'_, R> {
    type Error = Infallible;

    #[inline]
    fn toggle(&mut self) -> Result<(), Self::Error> {
        self.group.toggle_level(self.mask());
        Ok(())
    }
}

impl<R: GroupRegisters> InputPin for DynPin<'_, R> {
    type Error = Infallible;

    #[inline]
    fn is_high(&self) -> Result<bool, Self::Error> {
        Ok(self._is_high())
    }

    #[inline]
    fn is_low(&self) -> Result<bool, Self::Error> {
        Ok(!self._is_high())
    }
}
