use super::addr::Port;
use volatile_register::{RO, RW, WO};

/// Base address of the PORT peripheral
pub const PORT_BASE: usize = 0x4100_8000;
/// Address offset between two port groups
pub const GROUP_STRIDE: usize = 0x80;

//==================================================================================================
//  Register fields
//==================================================================================================

pub(super) mod pincfg {
    pub const PMUXEN: u8 = 1 << 0;
    pub const INEN: u8 = 1 << 1;
    pub const PULLEN: u8 = 1 << 2;
    pub const DRVSTR: u8 = 1 << 6;
}

pub(super) mod wrconfig {
    pub const PINMASK: u32 = 0xffff;
    pub const PMUXEN: u32 = 1 << 16;
    pub const INEN: u32 = 1 << 17;
    pub const PULLEN: u32 = 1 << 18;
    pub const DRVSTR: u32 = 1 << 22;
    pub const PMUX_SHIFT: u32 = 24;
    pub const PMUX_MASK: u32 = 0xf << PMUX_SHIFT;
    pub const WRPMUX: u32 = 1 << 28;
    pub const WRPINCFG: u32 = 1 << 30;
    pub const HWSEL: u32 = 1 << 31;
}

/// Even pins use the lower nibble of a PMUX register, odd pins the upper nibble
pub(super) const PMUX_ODD_SHIFT: u8 = 4;

//==================================================================================================
//  RegisterBlock
//==================================================================================================

/// Memory layout of a single PORT group
#[repr(C)]
pub struct RegisterBlock {
    pub dir: RW<u32>,
    pub dirclr: RW<u32>,
    pub dirset: RW<u32>,
    pub dirtgl: RW<u32>,
    pub out: RW<u32>,
    pub outclr: RW<u32>,
    pub outset: RW<u32>,
    pub outtgl: RW<u32>,
    pub in_: RO<u32>,
    pub ctrl: RW<u32>,
    pub wrconfig: WO<u32>,
    pub evctrl: RW<u32>,
    pub pmux: [RW<u8>; 16],
    pub pincfg: [RW<u8>; 32],
    _reserved: [u8; 32],
}

const _: () = assert!(core::mem::size_of::<RegisterBlock>() == GROUP_STRIDE);

//==================================================================================================
//  GroupRegisters
//==================================================================================================

/// Register interface of a single port group
///
/// All port operations are written against this trait. [`MmioGroup`] implements it for the
/// memory mapped registers of the device. [`SimGroup`](super::sim::SimGroup) implements it with a
/// register level model which runs on the host.
///
/// The functions take `&self` because registers have interior mutability. Exclusive access is
/// enforced one level higher: a [`PortGroup`](super::PortGroup) owns its register interface and
/// requires `&mut self` for every modification.
///
/// # Safety
///
/// The implementing type must have "control" over the register block of one group, i.e. for every
/// port group at most one implementor instance may be used to write to it at any given time.
/// The SET, CLR and TGL functions must only affect the bits set in `mask`.
pub unsafe trait GroupRegisters {
    /// Read DIR
    fn dir(&self) -> u32;
    /// Write DIRSET
    fn set_dir(&self, mask: u32);
    /// Write DIRCLR
    fn clear_dir(&self, mask: u32);
    /// Read OUT
    fn out(&self) -> u32;
    /// Write OUTSET
    fn set_out(&self, mask: u32);
    /// Write OUTCLR
    fn clear_out(&self, mask: u32);
    /// Write OUTTGL
    fn toggle_out(&self, mask: u32);
    /// Read IN
    fn input(&self) -> u32;
    /// Read CTRL
    fn ctrl(&self) -> u32;
    /// Write CTRL
    fn write_ctrl(&self, value: u32);
    /// Write WRCONFIG
    fn write_wrconfig(&self, value: u32);
    /// Read PINCFG of a pin. Only the lower 5 bits of `pin` are used.
    fn pincfg(&self, pin: u8) -> u8;
    /// Write PINCFG of a pin. Only the lower 5 bits of `pin` are used.
    fn write_pincfg(&self, pin: u8, value: u8);
    /// Read PMUX register `index`. Only the lower 4 bits of `index` are used.
    fn pmux(&self, index: u8) -> u8;
    /// Write PMUX register `index`. Only the lower 4 bits of `index` are used.
    fn write_pmux(&self, index: u8, value: u8);

    #[inline]
    fn modify_pincfg(&self, pin: u8, f: impl FnOnce(u8) -> u8) {
        self.write_pincfg(pin, f(self.pincfg(pin)));
    }

    #[inline]
    fn modify_pmux(&self, index: u8, f: impl FnOnce(u8) -> u8) {
        self.write_pmux(index, f(self.pmux(index)));
    }

    #[inline]
    fn modify_ctrl(&self, f: impl FnOnce(u32) -> u32) {
        self.write_ctrl(f(self.ctrl()));
    }
}

//==================================================================================================
//  MmioGroup
//==================================================================================================

/// Memory mapped register block of one port group
pub struct MmioGroup {
    regs: *const RegisterBlock,
}

// NOTE(unsafe) the pointer refers to a fixed peripheral address. [`MmioGroup`] is a singleton per
// group, so moving it to another context moves the access rights along with it.
unsafe impl Send for MmioGroup {}

impl MmioGroup {
    /// Create the register interface for a port group
    ///
    /// # Safety
    ///
    /// Users must never create two simultaneous instances of this `struct` for the same
    /// [`Port`]. Group [`Port::E`] is not implemented on every device; accessing it there is
    /// undefined behaviour.
    #[inline]
    pub const unsafe fn new(port: Port) -> Self {
        MmioGroup {
            regs: (PORT_BASE + port.index() as usize * GROUP_STRIDE) as *const RegisterBlock,
        }
    }

    /// Create the register interfaces for all port groups
    ///
    /// # Safety
    ///
    /// See [`MmioGroup::new`]
    pub unsafe fn all() -> [MmioGroup; Port::COUNT] {
        Port::ALL.map(|port| MmioGroup::new(port))
    }

    #[inline]
    fn regs(&self) -> &RegisterBlock {
        // Safety: Fixed peripheral address, valid for the whole program
        unsafe { &*self.regs }
    }
}

// [`MmioGroup`] is a singleton per group, so this implementation is safe.
unsafe impl GroupRegisters for MmioGroup {
    #[inline]
    fn dir(&self) -> u32 {
        self.regs().dir.read()
    }

    #[inline]
    fn set_dir(&self, mask: u32) {
        // Safety: DIRSET is a "mask" register, only the bits in mask are affected
        unsafe { self.regs().dirset.write(mask) }
    }

    #[inline]
    fn clear_dir(&self, mask: u32) {
        // Safety: DIRCLR is a "mask" register, only the bits in mask are affected
        unsafe { self.regs().dirclr.write(mask) }
    }

    #[inline]
    fn out(&self) -> u32 {
        self.regs().out.read()
    }

    #[inline]
    fn set_out(&self, mask: u32) {
        // Safety: OUTSET is a "mask" register, only the bits in mask are affected
        unsafe { self.regs().outset.write(mask) }
    }

    #[inline]
    fn clear_out(&self, mask: u32) {
        // Safety: OUTCLR is a "mask" register, only the bits in mask are affected
        unsafe { self.regs().outclr.write(mask) }
    }

    #[inline]
    fn toggle_out(&self, mask: u32) {
        // Safety: OUTTGL is a "mask" register, only the bits in mask are affected
        unsafe { self.regs().outtgl.write(mask) }
    }

    #[inline]
    fn input(&self) -> u32 {
        self.regs().in_.read()
    }

    #[inline]
    fn ctrl(&self) -> u32 {
        self.regs().ctrl.read()
    }

    #[inline]
    fn write_ctrl(&self, value: u32) {
        // Safety: Every bit pattern is a valid SAMPLING configuration
        unsafe { self.regs().ctrl.write(value) }
    }

    #[inline]
    fn write_wrconfig(&self, value: u32) {
        // Safety: Only the pins selected in the PINMASK field are affected
        unsafe { self.regs().wrconfig.write(value) }
    }

    #[inline]
    fn pincfg(&self, pin: u8) -> u8 {
        self.regs().pincfg[usize::from(pin & 0x1f)].read()
    }

    #[inline]
    fn write_pincfg(&self, pin: u8, value: u8) {
        // Safety: Only the register of this pin is written
        unsafe { self.regs().pincfg[usize::from(pin & 0x1f)].write(value) }
    }

    #[inline]
    fn pmux(&self, index: u8) -> u8 {
        self.regs().pmux[usize::from(index & 0x0f)].read()
    }

    #[inline]
    fn write_pmux(&self, index: u8, value: u8) {
        // Safety: Only the register of this pin pair is written
        unsafe { self.regs().pmux[usize::from(index & 0x0f)].write(value) }
    }
}
