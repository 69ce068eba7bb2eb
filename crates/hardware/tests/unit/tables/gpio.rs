//! # GPIO Table Tests

use jetmmio_core::tables::gpio::{CONTROLLER_STRIDE, PORTS};
use jetmmio_core::tables::{GpioPin, GpioRegister};
use jetmmio_core::{ConfigError, Field};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::harness::TestContext;

#[rstest]
#[case("PB4", 1, 4)]
#[case("B4", 1, 4)]
#[case("pb.04", 1, 4)]
#[case("PA0", 0, 0)]
#[case("P7", 15, 7)]
#[case("PZ7", 25, 7)]
#[case("AA0", 26, 0)]
#[case("PBB.1", 27, 1)]
#[case("pff7", 31, 7)]
fn parses_pin_names(#[case] name: &str, #[case] port: u8, #[case] pin: u8) {
    let parsed: GpioPin = name.parse().unwrap();
    assert_eq!((parsed.port(), parsed.pin()), (port, pin));
}

#[rstest]
#[case("")]
#[case("PB")]
#[case("PB8")]
#[case("GG0")]
#[case("AB1")]
#[case("P-1")]
#[case("4")]
fn rejects_bad_pin_names(#[case] name: &str) {
    assert!(matches!(
        name.parse::<GpioPin>(),
        Err(ConfigError::UnknownPin(n)) if n == name
    ));
}

#[test]
fn new_checks_ranges() {
    assert!(GpioPin::new(PORTS - 1, 7).is_some());
    assert!(GpioPin::new(PORTS, 0).is_none());
    assert!(GpioPin::new(0, 8).is_none());
}

#[rstest]
#[case(0, "PA.00")]
#[case(1, "PB.00")]
#[case(26, "PAA.00")]
#[case(31, "PFF.00")]
fn display_uses_port_letters(#[case] port: u8, #[case] expected: &str) {
    let pin = GpioPin::new(port, 0).unwrap();
    assert_eq!(pin.to_string(), expected);
    assert_eq!(expected.parse::<GpioPin>().unwrap(), pin);
}

#[rstest]
#[case("PB4", GpioRegister::Out, 0x24)]
#[case("PB4", GpioRegister::Cnf, 0x04)]
#[case("PA0", GpioRegister::In, 0x30)]
#[case("PE2", GpioRegister::Oe, 0x110)]
#[case("PH7", GpioRegister::MskOut, 0x1ac)]
#[case("PFF0", GpioRegister::IntEnb, 0x75c)]
fn register_offsets(#[case] name: &str, #[case] reg: GpioRegister, #[case] offset: u32) {
    let pin: GpioPin = name.parse().unwrap();
    assert_eq!(pin.register_offset(reg), offset);
}

#[test]
fn pin_field_is_one_bit() {
    let pin: GpioPin = "PB4".parse().unwrap();
    assert_eq!(pin.field(GpioRegister::Out), Field::new(0x24, 4, 1));
    assert_eq!(pin.controller(), 0);
    assert_eq!(
        "PE0".parse::<GpioPin>().unwrap().register_offset(GpioRegister::Cnf),
        CONTROLLER_STRIDE
    );
}

#[test]
fn masked_word_selects_one_pin() {
    let pin: GpioPin = "PB4".parse().unwrap();
    assert_eq!(pin.masked_word(true), 0x1010);
    assert_eq!(pin.masked_word(false), 0x1000);
}

#[test]
fn register_names_and_kinds() {
    assert_eq!(GpioRegister::IntSta.name(), "GPIO_INT_STA");
    assert_eq!(GpioRegister::ALL.iter().filter(|r| r.is_masked()).count(), 6);
    assert!(
        GpioRegister::ALL
            .windows(2)
            .all(|pair| pair[0].offset() < pair[1].offset())
    );
}

/// Configuring an LED pin touches exactly three bits of the controller.
#[test]
fn drive_pin_through_window() {
    let mut ctx = TestContext::new(jetmmio_core::tables::GPIO_BASE);
    let led: GpioPin = "PB4".parse().unwrap();

    for reg in [GpioRegister::Cnf, GpioRegister::Oe, GpioRegister::Out] {
        ctx.window.write(led.field(reg), 1).unwrap();
    }

    assert_eq!(ctx.peek(0x6000_d004), 1 << 4);
    assert_eq!(ctx.peek(0x6000_d014), 1 << 4);
    assert_eq!(ctx.peek(0x6000_d024), 1 << 4);
    assert_eq!(ctx.peek(0x6000_d020), 0);
}
