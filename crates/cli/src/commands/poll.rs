//! Input pin sampling.

use std::time::Duration;

use jetmmio_core::mem::PhysMemory;
use jetmmio_core::tables::{GpioPin, GpioRegister};

use super::{configure_pin, open_gpio, repeat};
use crate::error::CliError;

pub fn run<M: PhysMemory>(
    memory: &M,
    pins: &[GpioPin],
    interval_ms: u64,
    iterations: Option<u64>,
) -> Result<(), CliError> {
    let mut gpio = open_gpio(memory)?;
    for pin in pins {
        configure_pin(&mut gpio, pin, false)?;
    }

    repeat(iterations, Duration::from_millis(interval_ms), |_| {
        let line = pins
            .iter()
            .map(|pin| {
                gpio.read(pin.field(GpioRegister::In))
                    .map(|level| format!("{pin}={level}"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        println!("{}", line.join(" "));
        Ok(())
    })?;

    gpio.close()?;
    Ok(())
}
