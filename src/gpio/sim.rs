//! # Register model of a port group
//!
//! [`SimGroup`] implements [`GroupRegisters`] on top of plain memory and reproduces the behaviour
//! of the hardware registers which the port operations rely on: the SET, CLR and TGL registers,
//! WRCONFIG, and an IN register which samples the pad level through the input buffer. This makes
//! it possible to run the port operations and board initialization code on the host.
//!
//! The pad level of a pin is resolved in this order:
//!
//! 1. A peripheral owns the pin (PMUXEN set) and drives it, see [`SimGroup::drive_peripheral`]
//! 2. The pin is an output: the output latch
//! 3. An external source drives the pin, see [`SimGroup::drive_external`]
//! 4. The pull resistor is enabled: the output latch selects the pull level
//! 5. Floating, read as low
//!
//! IN only reports the pad level for pins with an enabled input buffer.
//!
//! ```
//! use same5x_port_hal::gpio::{sim::SimGroup, Direction, Port, PortGroup};
//!
//! let sim = SimGroup::default();
//! let mut porta = PortGroup::new(Port::A, &sim);
//! porta.set_direction(0b1, Direction::In);
//! sim.drive_external(0b1, true);
//! assert_eq!(porta.get_level(), 0b1);
//! ```
use super::addr::Port;
use super::reg::{pincfg, wrconfig, GroupRegisters, PMUX_ODD_SHIFT};
use core::cell::Cell;

/// Host model of the registers of one port group
#[derive(Default)]
pub struct SimGroup {
    dir: Cell<u32>,
    out: Cell<u32>,
    ctrl: Cell<u32>,
    pincfg: [Cell<u8>; 32],
    pmux: [Cell<u8>; 16],
    external_mask: Cell<u32>,
    external_level: Cell<u32>,
    peripheral_mask: Cell<u32>,
    peripheral_level: Cell<u32>,
    wrconfig_writes: Cell<u32>,
}

impl SimGroup {
    /// Mask of pins with an enabled input buffer
    fn input_enabled(&self) -> u32 {
        self.pins_with(pincfg::INEN)
    }

    fn pins_with(&self, bit: u8) -> u32 {
        self.pincfg
            .iter()
            .enumerate()
            .filter(|(_, cfg)| cfg.get() & bit != 0)
            .fold(0, |mask, (pin, _)| mask | (1 << pin))
    }

    /// Level on the pads of all pins
    pub fn pad_level(&self) -> u32 {
        let dir = self.dir.get();
        let out = self.out.get();
        let peripheral = self.pins_with(pincfg::PMUXEN) & self.peripheral_mask.get();
        let external = self.external_mask.get() & !dir & !peripheral;
        let pulled = self.pins_with(pincfg::PULLEN) & !dir & !external & !peripheral;
        (self.peripheral_level.get() & peripheral)
            | (out & dir & !peripheral)
            | (self.external_level.get() & external)
            | (out & pulled)
    }

    /// Drive the pads in `mask` from outside the device. Output pins are not affected.
    pub fn drive_external(&self, mask: u32, level: bool) {
        self.external_mask.set(self.external_mask.get() | mask);
        update_bits(&self.external_level, mask, level);
    }

    /// Stop driving the pads in `mask` from outside the device
    pub fn release_external(&self, mask: u32) {
        self.external_mask.set(self.external_mask.get() & !mask);
    }

    /// Let the peripheral function drive the pads in `mask`. Only affects pins with a selected
    /// peripheral function.
    pub fn drive_peripheral(&self, mask: u32, level: bool) {
        self.peripheral_mask.set(self.peripheral_mask.get() | mask);
        update_bits(&self.peripheral_level, mask, level);
    }

    pub fn dir_raw(&self) -> u32 {
        self.dir.get()
    }

    pub fn out_raw(&self) -> u32 {
        self.out.get()
    }

    pub fn pincfg_raw(&self, pin: u8) -> u8 {
        self.pincfg[usize::from(pin & 0x1f)].get()
    }

    pub fn pmux_raw(&self, index: u8) -> u8 {
        self.pmux[usize::from(index & 0x0f)].get()
    }

    /// Number of WRCONFIG writes since creation
    pub fn wrconfig_writes(&self) -> u32 {
        self.wrconfig_writes.get()
    }
}

fn update_bits(cell: &Cell<u32>, mask: u32, level: bool) {
    if level {
        cell.set(cell.get() | mask);
    } else {
        cell.set(cell.get() & !mask);
    }
}

// The model has no hardware behind it. Aliasing handles only share the model state.
unsafe impl GroupRegisters for &SimGroup {
    fn dir(&self) -> u32 {
        self.dir.get()
    }

    fn set_dir(&self, mask: u32) {
        update_bits(&self.dir, mask, true);
    }

    fn clear_dir(&self, mask: u32) {
        update_bits(&self.dir, mask, false);
    }

    fn out(&self) -> u32 {
        self.out.get()
    }

    fn set_out(&self, mask: u32) {
        update_bits(&self.out, mask, true);
    }

    fn clear_out(&self, mask: u32) {
        update_bits(&self.out, mask, false);
    }

    fn toggle_out(&self, mask: u32) {
        self.out.set(self.out.get() ^ mask);
    }

    fn input(&self) -> u32 {
        self.pad_level() & self.input_enabled()
    }

    fn ctrl(&self) -> u32 {
        self.ctrl.get()
    }

    fn write_ctrl(&self, value: u32) {
        self.ctrl.set(value);
    }

    fn write_wrconfig(&self, value: u32) {
        self.wrconfig_writes.set(self.wrconfig_writes.get() + 1);
        let offset = if value & wrconfig::HWSEL != 0 { 16 } else { 0 };
        let mut cfg = 0;
        if value & wrconfig::PMUXEN != 0 {
            cfg |= pincfg::PMUXEN;
        }
        if value & wrconfig::INEN != 0 {
            cfg |= pincfg::INEN;
        }
        if value & wrconfig::PULLEN != 0 {
            cfg |= pincfg::PULLEN;
        }
        if value & wrconfig::DRVSTR != 0 {
            cfg |= pincfg::DRVSTR;
        }
        let mux = ((value & wrconfig::PMUX_MASK) >> wrconfig::PMUX_SHIFT) as u8;
        for bit in (0..16).filter(|bit| value & (1 << bit) != 0) {
            let pin = bit + offset;
            if value & wrconfig::WRPINCFG != 0 {
                self.write_pincfg(pin, cfg);
            }
            if value & wrconfig::WRPMUX != 0 {
                self.modify_pmux(pin >> 1, |pmux| {
                    if pin & 1 == 1 {
                        (pmux & 0x0f) | (mux << PMUX_ODD_SHIFT)
                    } else {
                        (pmux & 0xf0) | mux
                    }
                });
            }
        }
    }

    fn pincfg(&self, pin: u8) -> u8 {
        self.pincfg_raw(pin)
    }

    fn write_pincfg(&self, pin: u8, value: u8) {
        self.pincfg[usize::from(pin & 0x1f)].set(value);
    }

    fn pmux(&self, index: u8) -> u8 {
        self.pmux_raw(index)
    }

    fn write_pmux(&self, index: u8, value: u8) {
        self.pmux[usize::from(index & 0x0f)].set(value);
    }
}

/// Register models of all port groups
#[derive(Default)]
pub struct SimPorts {
    groups: [SimGroup; Port::COUNT],
}

impl SimPorts {
    pub fn group(&self, port: Port) -> &SimGroup {
        &self.groups[usize::from(port.index())]
    }

    /// Register interfaces of all groups, in [`Port`] index order
    pub fn groups(&self) -> [&SimGroup; Port::COUNT] {
        Port::ALL.map(|port| self.group(port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrconfig_writes_pincfg_and_pmux() {
        let sim = SimGroup::default();
        let regs = &sim;
        regs.write_wrconfig(
            wrconfig::HWSEL
                | wrconfig::WRPINCFG
                | wrconfig::WRPMUX
                | wrconfig::PMUXEN
                | (0x5 << wrconfig::PMUX_SHIFT)
                | 0b11,
        );
        assert_eq!(sim.pincfg_raw(16), pincfg::PMUXEN);
        assert_eq!(sim.pincfg_raw(17), pincfg::PMUXEN);
        assert_eq!(sim.pincfg_raw(0), 0);
        assert_eq!(sim.pmux_raw(8), 0x55);
    }

    #[test]
    fn input_buffer_gates_in_register() {
        let sim = SimGroup::default();
        let regs = &sim;
        sim.drive_external(0b11, true);
        regs.write_pincfg(0, pincfg::INEN);
        assert_eq!(regs.input(), 0b01);
    }

    #[test]
    fn peripheral_drives_only_muxed_pins() {
        let sim = SimGroup::default();
        let regs = &sim;
        regs.write_pincfg(0, pincfg::INEN | pincfg::PMUXEN);
        regs.write_pincfg(1, pincfg::INEN);
        sim.drive_peripheral(0b11, true);
        assert_eq!(regs.input(), 0b01);
    }
}
