//! Simple blinky example
//!
//! Written for the SAM E54 Xplained Pro board. LED0 is connected to PC18 and is active low, so
//! the pin starts out high. Pressing SW0 (PB31) pauses the blinking.
#![no_main]
#![no_std]

use cortex_m_rt::entry;
use panic_halt as _;
use same5x_port_hal::{
    gpio::{Direction, PinConfig, PortController, PullMode, PB31, PC18},
    prelude::*,
};

static PINS: [PinConfig; 2] = [
    PinConfig::new(PC18).direction(Direction::Out).level(true),
    PinConfig::new(PB31).pull(PullMode::Up),
];

#[entry]
fn main() -> ! {
    let ports = PortController::take(&PINS).unwrap();
    let mut groups = ports.split();
    for _ in 0..10 {
        groups.c.set_level(PC18.mask(), false);
        cortex_m::asm::delay(12_000_000);
        groups.c.set_level(PC18.mask(), true);
        cortex_m::asm::delay(12_000_000);
    }
    let mut led = groups.c.pin(PC18.pin());
    loop {
        let pressed = groups.b.get_level() & PB31.mask() == 0;
        if !pressed {
            led.toggle().ok();
        }
        cortex_m::asm::delay(12_000_000);
    }
}
