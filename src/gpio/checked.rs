//! # Validating layer
//!
//! The port operations of [`PortController`] and [`PortGroup`](super::PortGroup) do not check
//! their arguments. [`CheckedPorts`] wraps a controller, validates every argument against the pins
//! which are implemented on the device package and then calls the unchecked operation. The
//! behaviour for valid arguments is the same as for the unchecked API.
//!
//! Function codes are checked structurally: the multiplexer index must exist on the device and a
//! code in the `PINMUX_*` format must belong to the target pin. Whether a given peripheral
//! function is actually routed to the pin is not known to this layer.
//!
//! A code with a zero upper half is a bare multiplexer index and fits every pin. The id of
//! [`PA00`](super::PA00) is zero as well, so codes built for PA00 are accepted on any pin and can
//! not be checked for a pin mismatch.
use super::addr::{mux, GpioId, Port, GPIO_PIN_FUNCTION_OFF, PINS_PER_GROUP};
use super::config::PinConfig;
use super::controller::PortController;
use super::port::{Direction, PullMode};
use super::reg::GroupRegisters;

/// Error type of the validating layer
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PortError {
    /// The group index has no corresponding port group, or the group is not implemented
    InvalidPort(u8),
    /// The pin number is 32 or larger
    InvalidPin(u8),
    /// The mask contains pins which are not implemented in the group
    UnimplementedPins { port: Port, mask: u32 },
    /// The multiplexer index of the function code does not exist
    InvalidFunction(u32),
    /// The function code is encoded for a different pin
    FunctionPinMismatch { pin: GpioId, function: u32 },
}

/// Masks of the implemented pins of every group, in [`Port`] index order
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ImplementedPins(pub [u32; Port::COUNT]);

impl ImplementedPins {
    /// Every pin of every group
    pub const ALL: ImplementedPins = ImplementedPins([u32::MAX; Port::COUNT]);

    #[inline]
    pub fn mask(&self, port: Port) -> u32 {
        self.0[usize::from(port.index())]
    }

    /// Check that `index` names a port group which is implemented
    pub fn port(&self, index: u8) -> Result<Port, PortError> {
        match Port::from_index(index) {
            Some(port) if self.mask(port) != 0 => Ok(port),
            _ => Err(PortError::InvalidPort(index)),
        }
    }

    /// Check that `port` is implemented and that every pin in `mask` exists in it
    pub fn check_mask(&self, port: Port, mask: u32) -> Result<(), PortError> {
        self.port(port.index())?;
        let missing = mask & !self.mask(port);
        if missing != 0 {
            return Err(PortError::UnimplementedPins {
                port,
                mask: missing,
            });
        }
        Ok(())
    }

    /// Check that `pin` exists in `port`
    pub fn check_pin(&self, port: Port, pin: u8) -> Result<(), PortError> {
        if pin >= PINS_PER_GROUP {
            return Err(PortError::InvalidPin(pin));
        }
        self.check_mask(port, 1 << pin)
    }

    /// Check that the pin `id` exists
    pub fn check_id(&self, id: GpioId) -> Result<Port, PortError> {
        let port = self.port(id.port())?;
        self.check_pin(port, id.pin())?;
        Ok(port)
    }
}

/// Check a function code for the pin `id`
///
/// Codes for [`PA00`](super::PA00) are indistinguishable from bare multiplexer indices and pass
/// the pin check for every pin.
pub fn check_function(id: GpioId, function: u32) -> Result<(), PortError> {
    if function == GPIO_PIN_FUNCTION_OFF {
        return Ok(());
    }
    if function & 0xffff > mux::MAX {
        return Err(PortError::InvalidFunction(function));
    }
    let target = function >> 16;
    if target != 0 && target != u32::from(id) {
        return Err(PortError::FunctionPinMismatch { pin: id, function });
    }
    Ok(())
}

/// Validate a static pin configuration table
///
/// Returns the index of the first invalid entry together with the error.
pub fn validate_table(
    table: &[PinConfig],
    implemented: &ImplementedPins,
) -> Result<(), (usize, PortError)> {
    for (index, cfg) in table.iter().enumerate() {
        implemented
            .check_id(cfg.id)
            .and_then(|_| check_function(cfg.id, cfg.function))
            .map_err(|e| {
                warn!("invalid pin configuration {} {:?}: {:?}", index, cfg.id, e);
                (index, e)
            })?;
    }
    Ok(())
}

/// [`PortController`] with argument validation
pub struct CheckedPorts<R> {
    ports: PortController<R>,
    implemented: ImplementedPins,
}

impl<R: GroupRegisters> CheckedPorts<R> {
    pub fn new(ports: PortController<R>, implemented: ImplementedPins) -> Self {
        CheckedPorts { ports, implemented }
    }

    /// Validate `table` and initialize the controller with it. Nothing is written to the
    /// registers if the table contains an invalid entry; the register interfaces are returned
    /// together with the error in that case.
    pub fn init(
        regs: [R; Port::COUNT],
        table: &[PinConfig],
        implemented: ImplementedPins,
    ) -> Result<Self, ([R; Port::COUNT], usize, PortError)> {
        if let Err((index, e)) = validate_table(table, &implemented) {
            return Err((regs, index, e));
        }
        Ok(Self::new(PortController::init(regs, table), implemented))
    }

    #[inline]
    pub fn implemented(&self) -> &ImplementedPins {
        &self.implemented
    }

    /// Access the unchecked controller
    #[inline]
    pub fn unchecked(&mut self) -> &mut PortController<R> {
        &mut self.ports
    }

    /// Consumes the wrapper and returns the unchecked controller
    #[inline]
    pub fn release(self) -> PortController<R> {
        self.ports
    }

    pub fn set_direction(
        &mut self,
        port: u8,
        mask: u32,
        direction: Direction,
    ) -> Result<(), PortError> {
        let port = self.checked_mask(port, mask)?;
        self.ports.set_direction(port, mask, direction);
        Ok(())
    }

    pub fn set_level(&mut self, port: u8, mask: u32, level: bool) -> Result<(), PortError> {
        let port = self.checked_mask(port, mask)?;
        self.ports.set_level(port, mask, level);
        Ok(())
    }

    pub fn toggle_level(&mut self, port: u8, mask: u32) -> Result<(), PortError> {
        let port = self.checked_mask(port, mask)?;
        self.ports.toggle_level(port, mask);
        Ok(())
    }

    /// Level of all implemented pins of the group. Bits of pins which do not exist are cleared.
    pub fn get_level(&self, port: u8) -> Result<u32, PortError> {
        let port = self.implemented.port(port)?;
        Ok(self.ports.get_level(port) & self.implemented.mask(port))
    }

    pub fn set_pin_pull_mode(
        &mut self,
        port: u8,
        pin: u8,
        pull_mode: PullMode,
    ) -> Result<(), PortError> {
        let port = self.implemented.port(port)?;
        self.implemented.check_pin(port, pin)?;
        self.ports.set_pin_pull_mode(port, pin, pull_mode);
        Ok(())
    }

    pub fn set_pin_function(&mut self, gpio: GpioId, function: u32) -> Result<(), PortError> {
        self.implemented.check_id(gpio)?;
        check_function(gpio, function)?;
        self.ports.set_pin_function(gpio, function);
        Ok(())
    }

    fn checked_mask(&self, port: u8, mask: u32) -> Result<Port, PortError> {
        let port = self.implemented.port(port)?;
        self.implemented.check_mask(port, mask)?;
        Ok(port)
    }
}
