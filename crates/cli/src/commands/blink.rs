//! Output pin toggling.

use std::time::Duration;

use tracing::info;

use jetmmio_core::mem::PhysMemory;
use jetmmio_core::tables::{GpioPin, GpioRegister};

use super::{configure_pin, open_gpio, repeat};
use crate::error::CliError;

pub fn run<M: PhysMemory>(
    memory: &M,
    pin: &GpioPin,
    interval_ms: u64,
    count: Option<u64>,
) -> Result<(), CliError> {
    let mut gpio = open_gpio(memory)?;
    configure_pin(&mut gpio, pin, true)?;
    info!(%pin, interval_ms, "blinking");

    let out = pin.field(GpioRegister::Out);
    repeat(count, Duration::from_millis(interval_ms), |i| {
        let level = u32::from(i % 2 == 0);
        gpio.write(out, level)?;
        println!("{pin} -> {level}");
        Ok(())
    })?;

    gpio.write(out, 0)?;
    gpio.close()?;
    Ok(())
}
