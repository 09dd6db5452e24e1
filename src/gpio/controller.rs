//! # Port controller
//!
//! The [`PortController`] owns the handles of all port groups. It can only be created through
//! [`PortController::init`], which applies the static [`PinConfig`] table of the board before any
//! other operation can be used. On the device, [`PortController::take`] provides the controller
//! exactly once.
//!
//! ```no_run
//! use same5x_port_hal::gpio::{Direction, PinConfig, Port, PortController, PA10};
//!
//! static PINS: [PinConfig; 1] = [PinConfig::new(PA10).direction(Direction::Out)];
//!
//! let mut ports = PortController::take(&PINS).unwrap();
//! ports.toggle_level(Port::A, PA10.mask());
//! ```
//!
//! Use [`PortController::split`] to hand the groups to different owners.
use super::addr::{GpioId, Port, GPIO_PIN_FUNCTION_OFF};
use super::config::PinConfig;
use super::port::{Direction, DriveStrength, PortGroup, PullMode};
use super::reg::{GroupRegisters, MmioGroup};
use critical_section::Mutex;
use once_cell::unsync::OnceCell;

static INIT_TABLE: Mutex<OnceCell<&'static [PinConfig]>> = Mutex::new(OnceCell::new());

/// Owner of all port groups
pub struct PortController<R> {
    groups: [PortGroup<R>; Port::COUNT],
}

/// The individual groups of a [`PortController`]
pub struct Groups<R> {
    pub a: PortGroup<R>,
    pub b: PortGroup<R>,
    pub c: PortGroup<R>,
    pub d: PortGroup<R>,
    pub e: PortGroup<R>,
}

impl<R: GroupRegisters> PortController<R> {
    /// Take the register interfaces of all groups, given in [`Port`] index order, and apply the
    /// static pin configuration
    ///
    /// For every entry, the pin configuration is applied in this order: output level, direction,
    /// pull mode, drive strength, input sampling and finally the peripheral function, so the pin
    /// has its final GPIO state before a peripheral takes it over.
    ///
    /// Entries with a group index without a corresponding group are skipped.
    pub fn init(regs: [R; Port::COUNT], table: &[PinConfig]) -> Self {
        let mut groups = into_groups(regs);
        for cfg in table {
            match cfg.id.group() {
                Some(port) => apply(&mut groups[usize::from(port.index())], cfg),
                None => {
                    warn!("no port group for pin configuration {:?}", cfg.id);
                }
            }
        }
        debug!("applied {} pin configurations", table.len());
        PortController { groups }
    }

    #[inline]
    pub fn group(&self, port: Port) -> &PortGroup<R> {
        &self.groups[usize::from(port.index())]
    }

    #[inline]
    pub fn group_mut(&mut self, port: Port) -> &mut PortGroup<R> {
        &mut self.groups[usize::from(port.index())]
    }

    /// See [`PortGroup::set_direction`]
    #[inline]
    pub fn set_direction(&mut self, port: Port, mask: u32, direction: Direction) {
        self.group_mut(port).set_direction(mask, direction);
    }

    /// See [`PortGroup::set_level`]
    #[inline]
    pub fn set_level(&mut self, port: Port, mask: u32, level: bool) {
        self.group_mut(port).set_level(mask, level);
    }

    /// See [`PortGroup::toggle_level`]
    #[inline]
    pub fn toggle_level(&mut self, port: Port, mask: u32) {
        self.group_mut(port).toggle_level(mask);
    }

    /// See [`PortGroup::get_level`]
    #[inline]
    pub fn get_level(&self, port: Port) -> u32 {
        self.group(port).get_level()
    }

    /// See [`PortGroup::set_pin_pull_mode`]
    #[inline]
    pub fn set_pin_pull_mode(&mut self, port: Port, pin: u8, pull_mode: PullMode) {
        self.group_mut(port).set_pin_pull_mode(pin, pull_mode);
    }

    /// Select the function of the pin `gpio`. See [`PortGroup::set_pin_function`].
    ///
    /// Ids with a group index without a corresponding [`Port`] are ignored.
    pub fn set_pin_function(&mut self, gpio: GpioId, function: u32) {
        match gpio.group() {
            Some(port) => self.group_mut(port).set_pin_function(gpio.pin(), function),
            None => {
                warn!("no port group for pin {:?}", gpio);
            }
        }
    }

    /// Split the controller into the individual groups
    pub fn split(self) -> Groups<R> {
        let [a, b, c, d, e] = self.groups;
        Groups { a, b, c, d, e }
    }

    /// Consumes the controller and returns the register interfaces
    pub fn release(self) -> [R; Port::COUNT] {
        self.groups.map(PortGroup::release)
    }
}

/// Wrap register interfaces given in [`Port`] index order
fn into_groups<R: GroupRegisters>(regs: [R; Port::COUNT]) -> [PortGroup<R>; Port::COUNT] {
    let mut index = 0;
    regs.map(|regs| {
        let group = PortGroup::new(Port::ALL[index], regs);
        index += 1;
        group
    })
}

fn apply<R: GroupRegisters>(group: &mut PortGroup<R>, cfg: &PinConfig) {
    trace!("pin configuration {:?}", cfg);
    let pin = cfg.id.pin();
    let mask = cfg.id.mask();
    group.set_level(mask, cfg.level);
    group.set_direction(mask, cfg.direction);
    if cfg.pull != PullMode::Off {
        group.set_pin_pull_mode(pin, cfg.pull);
    }
    if cfg.drive != DriveStrength::Normal {
        group.set_pin_drive_strength(pin, cfg.drive);
    }
    if cfg.continuous_sampling {
        group.set_input_sampling(mask, true);
    }
    if cfg.function != GPIO_PIN_FUNCTION_OFF {
        group.set_pin_function(pin, cfg.function);
    }
}

impl PortController<MmioGroup> {
    /// Create the controller for the device registers and apply `table`
    ///
    /// Returns [`None`] if the controller was already taken.
    pub fn take(table: &'static [PinConfig]) -> Option<Self> {
        let first = critical_section::with(|cs| INIT_TABLE.borrow(cs).set(table).is_ok());
        if !first {
            warn!("port controller was already taken");
            return None;
        }
        // Safe because the init table can only be set once
        Some(Self::init(unsafe { MmioGroup::all() }, table))
    }

    /// Create the controller for the device registers without applying a configuration
    ///
    /// # Safety
    ///
    /// The controller must not be used while another controller or any [`PortGroup`] of the
    /// device registers exists.
    pub unsafe fn steal() -> Self {
        PortController {
            groups: into_groups(MmioGroup::all()),
        }
    }

    /// The table applied by [`PortController::take`], if the controller was taken
    pub fn init_table() -> Option<&'static [PinConfig]> {
        critical_section::with(|cs| INIT_TABLE.borrow(cs).get().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpio::addr::{mux, PB10};
    use crate::gpio::sim::SimPorts;

    #[test]
    fn take_succeeds_once() {
        // Only this test may take the device controller, the guard is process wide
        static EMPTY: [PinConfig; 0] = [];
        assert!(PortController::init_table().is_none());
        // An empty table does not touch the registers
        assert!(PortController::take(&EMPTY).is_some());
        assert!(PortController::take(&EMPTY).is_none());
        assert_eq!(PortController::init_table().map(|table| table.len()), Some(0));
    }

    #[test]
    fn function_for_missing_group_is_ignored() {
        let sim = SimPorts::default();
        let mut ports = PortController::init(sim.groups(), &[]);
        ports.set_pin_function(GpioId::from_parts(5, 10), mux::C);
        ports.set_pin_function(GpioId::from_parts(7, 10), GPIO_PIN_FUNCTION_OFF);
        for port in Port::ALL {
            assert_eq!(sim.group(port).pincfg_raw(10), 0);
            assert_eq!(sim.group(port).pmux_raw(5), 0);
        }
        ports.set_pin_function(PB10, mux::C);
        assert_eq!(ports.group(Port::B).pin_function(10), mux::C);
    }
}
