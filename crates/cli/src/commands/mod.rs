//! Command implementations.
//!
//! Every command is generic over the memory backend so the same code drives real
//! hardware through `/dev/mem` and simulated memory under `--simulate`.

mod blink;
mod field;
mod keys;
mod poll;

use std::str::FromStr;
use std::thread;
use std::time::Duration;

use jetmmio_core::config::Config;
use jetmmio_core::mem::PhysMemory;
use jetmmio_core::tables::{GPIO_BASE, GpioPin, GpioRegister};
use jetmmio_core::{FieldError, OpenError, RegisterWindow};

use crate::Command;
use crate::error::CliError;

/// Runs `command` against `memory`.
pub fn run<M: PhysMemory>(command: &Command, config: &Config, memory: &M) -> Result<(), CliError> {
    match command {
        Command::Get {
            base,
            offset,
            base_bit,
            width,
        } => field::get(memory, *base, *offset, *base_bit, *width),
        Command::Set {
            base,
            offset,
            value,
            base_bit,
            width,
        } => field::set(memory, *base, *offset, *value, *base_bit, *width),
        Command::Field { name, value } => field::named(memory, config, name, *value),
        Command::Blink {
            pin,
            interval_ms,
            count,
        } => blink::run(memory, &GpioPin::from_str(pin)?, *interval_ms, *count),
        Command::Poll {
            pins,
            interval_ms,
            iterations,
        } => {
            let pins = pins
                .iter()
                .map(|p| GpioPin::from_str(p))
                .collect::<Result<Vec<_>, _>>()?;
            let interval = interval_ms.unwrap_or(config.poll.interval_ms);
            poll::run(memory, &pins, interval, *iterations)
        }
        Command::Keys { iterations } => keys::run(memory, config, *iterations),
    }
}

/// Opens the GPIO controller window.
fn open_gpio<M: PhysMemory>(memory: &M) -> Result<RegisterWindow<M::Page>, OpenError> {
    RegisterWindow::open_in(memory, GPIO_BASE)
}

/// Puts `pin` in GPIO mode with its output driver on or off.
fn configure_pin<P: jetmmio_core::MappedPage>(
    gpio: &mut RegisterWindow<P>,
    pin: &GpioPin,
    output: bool,
) -> Result<(), FieldError> {
    gpio.write(pin.field(GpioRegister::Cnf), 1)?;
    gpio.write(pin.field(GpioRegister::Oe), u32::from(output))
}

/// Calls `step` `iterations` times (forever when `None`), sleeping `interval` in between.
fn repeat<F>(iterations: Option<u64>, interval: Duration, mut step: F) -> Result<(), CliError>
where
    F: FnMut(u64) -> Result<(), CliError>,
{
    let mut i = 0;
    while iterations.is_none_or(|n| i < n) {
        step(i)?;
        i += 1;
        if iterations.is_none_or(|n| i < n) {
            thread::sleep(interval);
        }
    }
    Ok(())
}
