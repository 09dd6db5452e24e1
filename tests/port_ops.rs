//! Port operations and board initialization, run against the register model

use embedded_hal::digital::v2::InputPin;
use same5x_port_hal::gpio::{
    checked::{CheckedPorts, ImplementedPins, PortError},
    mux, pinmux,
    sim::SimPorts,
    Direction, DriveStrength, PinConfig, Port, PortController, PullMode, GPIO_PIN_FUNCTION_OFF,
    PA00, PA04, PA10, PB22, PB23, PC05, PD08,
};

#[test]
fn outputs_report_latch_inputs_report_pad() {
    let sim = SimPorts::default();
    let mut ports = PortController::init(sim.groups(), &[]);
    ports.set_direction(Port::A, 0b010, Direction::In);
    ports.set_direction(Port::A, 0b101, Direction::Out);
    ports.set_level(Port::A, 0b101, true);
    let level = ports.get_level(Port::A);
    assert_eq!(level & 0b101, 0b101);
    assert_eq!(level & 0b010, 0);
}

#[test]
fn direction_is_idempotent() {
    let sim = SimPorts::default();
    let mut ports = PortController::init(sim.groups(), &[]);
    let porta = sim.group(Port::A);
    ports.set_level(Port::A, 0x00ff_0000, true);
    ports.set_direction(Port::A, 0x00f0_00f0, Direction::Out);
    let once = (porta.dir_raw(), porta.out_raw(), ports.get_level(Port::A));
    let pincfg_once: Vec<u8> = (0..32).map(|pin| porta.pincfg_raw(pin)).collect();
    ports.set_direction(Port::A, 0x00f0_00f0, Direction::Out);
    let twice = (porta.dir_raw(), porta.out_raw(), ports.get_level(Port::A));
    let pincfg_twice: Vec<u8> = (0..32).map(|pin| porta.pincfg_raw(pin)).collect();
    assert_eq!(once, twice);
    assert_eq!(pincfg_once, pincfg_twice);
}

#[test]
fn groups_are_independent() {
    let sim = SimPorts::default();
    let mut ports = PortController::init(sim.groups(), &[]);
    ports.set_direction(Port::B, u32::MAX, Direction::Out);
    ports.set_level(Port::B, u32::MAX, true);
    for port in [Port::A, Port::C, Port::D, Port::E] {
        assert_eq!(sim.group(port).dir_raw(), 0);
        assert_eq!(ports.get_level(port), 0);
    }
    assert_eq!(ports.get_level(Port::B), u32::MAX);
}

#[test]
fn pull_up_turns_pin_into_input() {
    let sim = SimPorts::default();
    let mut ports = PortController::init(sim.groups(), &[]);
    ports.set_direction(Port::C, PC05.mask(), Direction::Out);
    ports.set_pin_pull_mode(Port::C, PC05.pin(), PullMode::Up);
    let portc = ports.group(Port::C);
    assert_eq!(portc.direction(PC05.pin()), Direction::In);
    assert_eq!(portc.get_level() & PC05.mask(), PC05.mask());
}

#[test]
fn function_off_returns_pin_to_gpio() {
    let sim = SimPorts::default();
    let mut ports = PortController::init(sim.groups(), &[]);
    let porta = sim.group(Port::A);
    ports.set_direction(Port::A, PA04.mask(), Direction::Out);
    ports.set_pin_function(PA04, pinmux(PA04, mux::D));
    // Peripheral drives the pad high while the latch stays low
    porta.drive_peripheral(PA04.mask(), true);
    assert_eq!(porta.pad_level() & PA04.mask(), PA04.mask());

    ports.set_pin_function(PA04, GPIO_PIN_FUNCTION_OFF);
    assert_eq!(porta.pad_level() & PA04.mask(), 0);
    assert_eq!(ports.get_level(Port::A) & PA04.mask(), 0);
    ports.set_level(Port::A, PA04.mask(), true);
    assert_eq!(porta.pad_level() & PA04.mask(), PA04.mask());
    assert_eq!(ports.get_level(Port::A) & PA04.mask(), PA04.mask());
}

#[test]
fn init_table_is_applied_in_order() {
    static PINS: [PinConfig; 4] = [
        PinConfig::new(PA10).direction(Direction::Out).level(true),
        PinConfig::new(PB22)
            .direction(Direction::In)
            .pull(PullMode::Down)
            .continuous_sampling(true),
        PinConfig::new(PA04)
            .direction(Direction::Out)
            .drive(DriveStrength::Strong)
            .function(pinmux(PA04, mux::D)),
        PinConfig::new(PD08).pull(PullMode::Up),
    ];
    let sim = SimPorts::default();
    let ports = PortController::init(sim.groups(), &PINS);

    let porta = ports.group(Port::A);
    assert_eq!(porta.direction(10), Direction::Out);
    assert_eq!(porta.get_level() & PA10.mask(), PA10.mask());
    // Drive strength survives because it is applied after the direction
    assert_eq!(porta.drive_strength(4), DriveStrength::Strong);
    assert_eq!(porta.pin_function(4), mux::D);
    assert_eq!(porta.direction(4), Direction::Out);

    let portb = ports.group(Port::B);
    assert_eq!(portb.pull_mode(22), PullMode::Down);
    assert_eq!(portb.input_sampling(), PB22.mask());

    let portd = ports.group(Port::D);
    assert_eq!(portd.direction(8), Direction::In);
    assert_eq!(portd.pull_mode(8), PullMode::Up);
    assert_eq!(portd.pin_function(8), GPIO_PIN_FUNCTION_OFF);
}

#[test]
fn loopback_between_two_pins() {
    // Model of a board where PB22 is tied to PB23
    let sim = SimPorts::default();
    let mut groups = PortController::init(sim.groups(), &[]).split();
    let portb_sim = sim.group(Port::B);
    groups.b.set_direction(PB22.mask(), Direction::Out);
    groups.b.set_direction(PB23.mask(), Direction::In);
    for level in [true, false, true] {
        groups.b.set_level(PB22.mask(), level);
        let pad = portb_sim.pad_level() & PB22.mask() != 0;
        portb_sim.drive_external(PB23.mask(), pad);
        assert_eq!(groups.b.pin(PB23.pin()).is_high().unwrap(), level);
    }
}

#[test]
fn checked_layer_on_a_four_group_device() {
    let implemented = ImplementedPins([u32::MAX, u32::MAX, u32::MAX, u32::MAX, 0]);
    let sim = SimPorts::default();
    let mut ports = CheckedPorts::init(sim.groups(), &[PinConfig::new(PA00)], implemented)
        .unwrap_or_else(|_| panic!("valid table was rejected"));
    assert_eq!(
        ports.set_direction(Port::E.index(), 1, Direction::Out),
        Err(PortError::InvalidPort(4))
    );
    ports.set_direction(0, 0b1, Direction::Out).unwrap();
    ports.set_level(0, 0b1, true).unwrap();
    assert_eq!(ports.get_level(0), Ok(0b1));
    assert_eq!(ImplementedPins::ALL.mask(Port::E), u32::MAX);
}
