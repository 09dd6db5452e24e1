//! # Pin and port group addressing
//!
//! A [`GpioId`] packs a port group and a pin number into a single byte. The lower 5 bits are the
//! pin number inside the group, the upper 3 bits are the port group.
//!
//! ```
//! use same5x_port_hal::gpio::{gpio, Port, PB05};
//!
//! let id = gpio(Port::B, 5);
//! assert_eq!(id, PB05);
//! assert_eq!(id.port(), 1);
//! assert_eq!(id.pin(), 5);
//! ```
//!
//! No validation is performed. Pin numbers of 32 and above and port indices of 8 and above are
//! truncated to their field width and alias into other pins and groups.
use paste::paste;

/// Sentinel function code which returns a pin to plain GPIO use.
pub const GPIO_PIN_FUNCTION_OFF: u32 = 0xffff_ffff;

/// Number of pins in one port group.
pub const PINS_PER_GROUP: u8 = 32;

const PIN_MASK: u8 = 0x1f;
const PORT_MASK: u8 = 0x07;
const PORT_SHIFT: u8 = 5;

//==================================================================================================
//  Port
//==================================================================================================

/// Port group, a bank of up to 32 pins sharing one register block
#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
}

impl Port {
    /// Number of port groups
    pub const COUNT: usize = 5;

    /// All port groups in index order
    pub const ALL: [Port; Port::COUNT] = [Port::A, Port::B, Port::C, Port::D, Port::E];

    /// Group index as used inside a [`GpioId`]
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Convert a group index back into a [`Port`]. Returns [`None`] for indices without a
    /// corresponding group.
    #[inline]
    pub const fn from_index(index: u8) -> Option<Port> {
        match index {
            0 => Some(Port::A),
            1 => Some(Port::B),
            2 => Some(Port::C),
            3 => Some(Port::D),
            4 => Some(Port::E),
            _ => None,
        }
    }
}

//==================================================================================================
//  GpioId
//==================================================================================================

/// Combined pin identifier: port group in bits 5..7, pin number in bits 0..4
#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GpioId(u8);

impl GpioId {
    /// Pack a port group and a pin number. The pin number is truncated to 5 bits.
    #[inline]
    pub const fn new(port: Port, pin: u8) -> Self {
        Self::from_parts(port.index(), pin)
    }

    /// Pack a raw group index and a pin number. Both values are truncated to their field width.
    #[inline]
    pub const fn from_parts(port: u8, pin: u8) -> Self {
        GpioId(((port & PORT_MASK) << PORT_SHIFT) | (pin & PIN_MASK))
    }

    #[inline]
    pub const fn from_raw(raw: u8) -> Self {
        GpioId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Raw group index (bits 5..7)
    #[inline]
    pub const fn port(self) -> u8 {
        self.0 >> PORT_SHIFT
    }

    /// Pin number inside the group (bits 0..4)
    #[inline]
    pub const fn pin(self) -> u8 {
        self.0 & PIN_MASK
    }

    /// The port group, if the group index names one
    #[inline]
    pub const fn group(self) -> Option<Port> {
        Port::from_index(self.port())
    }

    /// Single bit [`u32`] mask for this pin inside its group
    #[inline]
    pub const fn mask(self) -> u32 {
        1 << self.pin()
    }
}

impl From<GpioId> for u8 {
    #[inline]
    fn from(id: GpioId) -> Self {
        id.raw()
    }
}

impl From<GpioId> for u32 {
    #[inline]
    fn from(id: GpioId) -> Self {
        id.raw() as u32
    }
}

/// Pack a port group and pin number into a [`GpioId`]
#[inline]
pub const fn gpio(port: Port, pin: u8) -> GpioId {
    GpioId::new(port, pin)
}

//==================================================================================================
//  Function codes
//==================================================================================================

/// Peripheral function (multiplexer) indices A to N
pub mod mux {
    pub const A: u32 = 0x0;
    pub const B: u32 = 0x1;
    pub const C: u32 = 0x2;
    pub const D: u32 = 0x3;
    pub const E: u32 = 0x4;
    pub const F: u32 = 0x5;
    pub const G: u32 = 0x6;
    pub const H: u32 = 0x7;
    pub const I: u32 = 0x8;
    pub const J: u32 = 0x9;
    pub const K: u32 = 0xa;
    pub const L: u32 = 0xb;
    pub const M: u32 = 0xc;
    pub const N: u32 = 0xd;
    /// Highest multiplexer index implemented by the device
    pub const MAX: u32 = N;
}

/// Build a function code in the device `PINMUX_*` format: gpio id in bits 16..31, multiplexer
/// index in bits 0..15.
#[inline]
pub const fn pinmux(id: GpioId, mux: u32) -> u32 {
    ((id.raw() as u32) << 16) | (mux & 0xffff)
}

//==================================================================================================
//  Pin identifiers
//==================================================================================================

macro_rules! pin_ids {
    ($($Group:ident),+) => {
        $(
            pin_ids!(
                @group $Group,
                00 01 02 03 04 05 06 07 08 09 10 11 12 13 14 15
                16 17 18 19 20 21 22 23 24 25 26 27 28 29 30 31
            );
        )+
    };
    (@group $Group:ident, $($NUM:literal)+) => {
        // Need paste macro to use ident in doc attribute
        paste! {
            $(
                #[doc = "Identifier of pin P" $Group $NUM]
                pub const [<P $Group $NUM>]: GpioId = GpioId::new(Port::$Group, $NUM);
            )+
        }
    };
}

pin_ids!(A, B, C, D, E);
