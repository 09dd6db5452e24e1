//! # Port group state operations
//!
//! A [`PortGroup`] is the owning handle of one port group. All operations work on a [`u32`] mask
//! where bit `i` addresses pin `i` of the group, except for the pull mode, function select and
//! drive strength operations which address a single pin.
//!
//! Every operation completes with a small, fixed number of register accesses. The SET, CLR and
//! TGL registers make [`PortGroup::set_level`] and [`PortGroup::toggle_level`] atomic with
//! respect to the other bits of the group. The PINCFG, PMUX and CTRL updates are read-modify-write
//! sequences and are not atomic against other execution contexts accessing the same group.
use super::addr::{GpioId, Port, GPIO_PIN_FUNCTION_OFF};
use super::dynpin::DynPin;
use super::reg::{pincfg, wrconfig, GroupRegisters, PMUX_ODD_SHIFT};

//==================================================================================================
//  Definitions
//==================================================================================================

/// Direction of a pin
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Input with the input buffer disabled. The pin floats unless it is pulled.
    Off,
    /// Input with the input buffer enabled
    In,
    /// Output, input buffer disabled
    Out,
}

/// Pull resistor configuration of a pin
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PullMode {
    Off,
    /// Pull towards VDD
    Up,
    /// Pull towards GND
    Down,
}

/// Output driver strength of a pin
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriveStrength {
    Normal,
    Strong,
}

//==================================================================================================
//  PortGroup
//==================================================================================================

/// Owning handle of a single port group
pub struct PortGroup<R> {
    regs: R,
    port: Port,
}

impl<R: GroupRegisters> PortGroup<R> {
    /// Wrap the register interface of `port`
    #[inline]
    pub fn new(port: Port, regs: R) -> Self {
        PortGroup { regs, port }
    }

    #[inline]
    pub fn port(&self) -> Port {
        self.port
    }

    /// Identifier of `pin` inside this group
    #[inline]
    pub fn id(&self, pin: u8) -> GpioId {
        GpioId::new(self.port, pin)
    }

    /// Consumes the group and returns the register interface
    #[inline]
    pub fn release(self) -> R {
        self.regs
    }

    /// Borrow a single pin of this group
    #[inline]
    pub fn pin(&mut self, pin: u8) -> DynPin<'_, R> {
        DynPin::new(self, pin)
    }

    /// Set the direction of all pins in `mask`
    ///
    /// - [`Direction::Off`]: Input, input buffer disabled
    /// - [`Direction::In`]: Input, input buffer enabled
    /// - [`Direction::Out`]: Output, input buffer disabled
    ///
    /// The pin configuration is written through WRCONFIG, which replaces the whole PINCFG of the
    /// masked pins. Pull resistor, drive strength and peripheral multiplexing of these pins are
    /// reset, so the pins return to plain GPIO use.
    pub fn set_direction(&mut self, mask: u32, direction: Direction) {
        let pincfg = match direction {
            Direction::Off => {
                self.regs.clear_dir(mask);
                0
            }
            Direction::In => {
                self.regs.clear_dir(mask);
                wrconfig::INEN
            }
            Direction::Out => {
                self.regs.set_dir(mask);
                0
            }
        };
        self.write_pincfg_masked(mask, wrconfig::WRPINCFG | pincfg);
    }

    /// Write a WRCONFIG command for every 16 pin half of the group which has bits set in `mask`
    fn write_pincfg_masked(&self, mask: u32, command: u32) {
        let lower = mask & wrconfig::PINMASK;
        let upper = mask >> 16;
        if lower != 0 {
            self.regs.write_wrconfig(command | lower);
        }
        if upper != 0 {
            self.regs.write_wrconfig(wrconfig::HWSEL | command | upper);
        }
    }

    /// Drive the output latch of all pins in `mask` to `level`
    ///
    /// The latch is written for pins which are not outputs as well. It takes effect when the
    /// direction is changed to [`Direction::Out`].
    #[inline]
    pub fn set_level(&mut self, mask: u32, level: bool) {
        if level {
            self.regs.set_out(mask);
        } else {
            self.regs.clear_out(mask);
        }
    }

    /// Invert the output latch of all pins in `mask` with a single OUTTGL write
    #[inline]
    pub fn toggle_level(&mut self, mask: u32) {
        self.regs.toggle_out(mask);
    }

    /// Get the level of all pins of the group
    ///
    /// Inputs report the value sampled by the input buffer, outputs report the value of the output
    /// latch. The DIR, IN and OUT registers are read inside one critical section.
    pub fn get_level(&self) -> u32 {
        let (dir, input, out) = critical_section::with(|_| {
            (self.regs.dir(), self.regs.input(), self.regs.out())
        });
        (input & !dir) | (out & dir)
    }

    /// Set the pull mode of a single pin
    ///
    /// [`PullMode::Up`] and [`PullMode::Down`] change the direction of the pin to
    /// [`Direction::In`]. The pull direction is selected with the output latch of the pin, so the
    /// latch holds the pull level afterwards. [`PullMode::Off`] only disables the resistor.
    pub fn set_pin_pull_mode(&mut self, pin: u8, pull_mode: PullMode) {
        let mask = pin_mask(pin);
        match pull_mode {
            PullMode::Off => {
                self.regs.modify_pincfg(pin, |cfg| cfg & !pincfg::PULLEN);
            }
            PullMode::Up => {
                self.regs.clear_dir(mask);
                self.regs
                    .modify_pincfg(pin, |cfg| cfg | pincfg::PULLEN | pincfg::INEN);
                self.regs.set_out(mask);
            }
            PullMode::Down => {
                self.regs.clear_dir(mask);
                self.regs
                    .modify_pincfg(pin, |cfg| cfg | pincfg::PULLEN | pincfg::INEN);
                self.regs.clear_out(mask);
            }
        }
    }

    /// Select the peripheral function of a single pin
    ///
    /// `function` is a device specific code. Only the multiplexer index in the lower nibble is
    /// used. [`GPIO_PIN_FUNCTION_OFF`] returns the pin to plain GPIO use. Direction, level and
    /// pull mode are left untouched, but the peripheral takes over the pin while its function is
    /// selected, so the function should be configured last.
    pub fn set_pin_function(&mut self, pin: u8, function: u32) {
        if function == GPIO_PIN_FUNCTION_OFF {
            self.regs.modify_pincfg(pin, |cfg| cfg & !pincfg::PMUXEN);
            return;
        }
        self.regs.modify_pincfg(pin, |cfg| cfg | pincfg::PMUXEN);
        let mux = (function & 0x0f) as u8;
        let pin = pin & 0x1f;
        self.regs.modify_pmux(pin >> 1, |pmux| {
            if pin & 1 == 1 {
                (pmux & 0x0f) | (mux << PMUX_ODD_SHIFT)
            } else {
                (pmux & 0xf0) | mux
            }
        });
    }

    /// Set the output driver strength of a single pin
    pub fn set_pin_drive_strength(&mut self, pin: u8, strength: DriveStrength) {
        self.regs.modify_pincfg(pin, |cfg| match strength {
            DriveStrength::Normal => cfg & !pincfg::DRVSTR,
            DriveStrength::Strong => cfg | pincfg::DRVSTR,
        });
    }

    /// Enable continuous input sampling for the pins in `mask`, or return them to on-demand
    /// sampling
    pub fn set_input_sampling(&mut self, mask: u32, continuous: bool) {
        self.regs.modify_ctrl(|ctrl| {
            if continuous {
                ctrl | mask
            } else {
                ctrl & !mask
            }
        });
    }

    //==============================================================================================
    //  Queries
    //==============================================================================================

    /// Current direction of a single pin
    pub fn direction(&self, pin: u8) -> Direction {
        if self.regs.dir() & pin_mask(pin) != 0 {
            Direction::Out
        } else if self.regs.pincfg(pin) & pincfg::INEN != 0 {
            Direction::In
        } else {
            Direction::Off
        }
    }

    /// Current pull mode of a single pin
    pub fn pull_mode(&self, pin: u8) -> PullMode {
        if self.regs.pincfg(pin) & pincfg::PULLEN == 0 {
            PullMode::Off
        } else if self.regs.out() & pin_mask(pin) != 0 {
            PullMode::Up
        } else {
            PullMode::Down
        }
    }

    /// Multiplexer index of a single pin, or [`GPIO_PIN_FUNCTION_OFF`] for plain GPIO use
    pub fn pin_function(&self, pin: u8) -> u32 {
        if self.regs.pincfg(pin) & pincfg::PMUXEN == 0 {
            return GPIO_PIN_FUNCTION_OFF;
        }
        let pin = pin & 0x1f;
        let pmux = self.regs.pmux(pin >> 1);
        let mux = if pin & 1 == 1 {
            pmux >> PMUX_ODD_SHIFT
        } else {
            pmux & 0x0f
        };
        u32::from(mux)
    }

    pub fn drive_strength(&self, pin: u8) -> DriveStrength {
        if self.regs.pincfg(pin) & pincfg::DRVSTR != 0 {
            DriveStrength::Strong
        } else {
            DriveStrength::Normal
        }
    }

    /// Value of the output latch (OUT) of all pins
    #[inline]
    pub fn output_latch(&self) -> u32 {
        self.regs.out()
    }

    /// Mask of pins with continuous input sampling
    #[inline]
    pub fn input_sampling(&self) -> u32 {
        self.regs.ctrl()
    }
}

#[inline(always)]
pub(super) fn pin_mask(pin: u8) -> u32 {
    1 << (pin & 0x1f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpio::sim::SimGroup;

    fn group(sim: &SimGroup) -> PortGroup<&SimGroup> {
        PortGroup::new(Port::A, sim)
    }

    #[test]
    fn direction_states() {
        let sim = SimGroup::default();
        let mut porta = group(&sim);
        porta.set_direction(0b111, Direction::In);
        porta.set_direction(0b010, Direction::Out);
        porta.set_direction(0b100, Direction::Off);
        assert_eq!(porta.direction(0), Direction::In);
        assert_eq!(porta.direction(1), Direction::Out);
        assert_eq!(porta.direction(2), Direction::Off);
        assert_eq!(sim.dir_raw(), 0b010);
        assert_eq!(sim.pincfg_raw(0), pincfg::INEN);
        assert_eq!(sim.pincfg_raw(1), 0);
    }

    #[test]
    fn direction_uses_both_wrconfig_halves() {
        let sim = SimGroup::default();
        let mut porta = group(&sim);
        porta.set_direction(0x0001_0001, Direction::In);
        assert_eq!(sim.wrconfig_writes(), 2);
        assert_eq!(porta.direction(0), Direction::In);
        assert_eq!(porta.direction(16), Direction::In);
        porta.set_direction(0x8000_0000, Direction::Off);
        assert_eq!(sim.wrconfig_writes(), 3);
        assert_eq!(porta.direction(31), Direction::Off);
    }

    #[test]
    fn direction_resets_pin_configuration() {
        let sim = SimGroup::default();
        let mut porta = group(&sim);
        porta.set_pin_pull_mode(4, PullMode::Up);
        porta.set_pin_drive_strength(4, DriveStrength::Strong);
        porta.set_pin_function(4, 3);
        porta.set_direction(1 << 4, Direction::In);
        assert_eq!(porta.pull_mode(4), PullMode::Off);
        assert_eq!(porta.drive_strength(4), DriveStrength::Normal);
        assert_eq!(porta.pin_function(4), GPIO_PIN_FUNCTION_OFF);
    }

    #[test]
    fn levels_of_outputs_and_inputs() {
        let sim = SimGroup::default();
        let mut porta = group(&sim);
        porta.set_direction(0b0011, Direction::Out);
        porta.set_direction(0b1100, Direction::In);
        porta.set_level(0b0001, true);
        sim.drive_external(0b0100, true);
        assert_eq!(porta.get_level(), 0b0101);
        // Latch of an input pin is recorded, but not visible
        porta.set_level(0b1000, true);
        assert_eq!(porta.get_level(), 0b0101);
        assert_eq!(porta.output_latch(), 0b1001);
        porta.set_direction(0b1000, Direction::Out);
        assert_eq!(porta.get_level(), 0b1101);
    }

    #[test]
    fn toggle_only_touches_mask() {
        let sim = SimGroup::default();
        let mut porta = group(&sim);
        porta.set_direction(0xff, Direction::Out);
        porta.set_level(0b1010_1010, true);
        porta.toggle_level(0b0000_1111);
        assert_eq!(porta.get_level(), 0b1010_0101);
    }

    #[test]
    fn pull_modes() {
        let sim = SimGroup::default();
        let mut porta = group(&sim);
        porta.set_direction(1 << 7, Direction::Out);
        porta.set_pin_pull_mode(7, PullMode::Down);
        assert_eq!(porta.direction(7), Direction::In);
        assert_eq!(porta.pull_mode(7), PullMode::Down);
        assert_eq!(porta.get_level() & (1 << 7), 0);
        porta.set_pin_pull_mode(7, PullMode::Up);
        assert_eq!(porta.pull_mode(7), PullMode::Up);
        assert_eq!(porta.get_level() & (1 << 7), 1 << 7);
        // External drive overrides the weak pull
        sim.drive_external(1 << 7, false);
        assert_eq!(porta.get_level() & (1 << 7), 0);
        sim.release_external(1 << 7);
        porta.set_pin_pull_mode(7, PullMode::Off);
        assert_eq!(porta.pull_mode(7), PullMode::Off);
        assert_eq!(porta.direction(7), Direction::In);
    }

    #[test]
    fn function_select_even_and_odd_pins() {
        let sim = SimGroup::default();
        let mut porta = group(&sim);
        porta.set_pin_function(8, 0x0008_0003);
        porta.set_pin_function(9, 0x0009_000c);
        assert_eq!(sim.pmux_raw(4), 0xc3);
        assert_eq!(porta.pin_function(8), 0x3);
        assert_eq!(porta.pin_function(9), 0xc);
        porta.set_pin_function(8, GPIO_PIN_FUNCTION_OFF);
        assert_eq!(porta.pin_function(8), GPIO_PIN_FUNCTION_OFF);
        assert_eq!(porta.pin_function(9), 0xc);
    }

    #[test]
    fn function_select_keeps_gpio_state() {
        let sim = SimGroup::default();
        let mut porta = group(&sim);
        porta.set_direction(1 << 3, Direction::Out);
        porta.set_level(1 << 3, true);
        porta.set_pin_function(3, 0x2);
        assert_eq!(porta.direction(3), Direction::Out);
        assert_eq!(porta.output_latch(), 1 << 3);
        assert_eq!(porta.pull_mode(3), PullMode::Off);
    }

    #[test]
    fn input_sampling() {
        let sim = SimGroup::default();
        let mut porta = group(&sim);
        porta.set_input_sampling(0xff00, true);
        porta.set_input_sampling(0x0f00, false);
        assert_eq!(porta.input_sampling(), 0xf000);
    }
}
