//! GPIO-to-key forwarding.
//!
//! Samples every bound pin, and on a change of key state emits a press or release.
//! The first sample only establishes the baseline, so keys already held at start-up
//! do not produce a spurious press.

use std::io;
use std::time::Duration;

use tracing::{info, warn};

use jetmmio_core::config::{Config, KeyBinding};
use jetmmio_core::mem::PhysMemory;
use jetmmio_core::tables::{GpioPin, GpioRegister};

use super::{configure_pin, open_gpio, repeat};
use crate::error::CliError;
use crate::sink::{EventSink, JsonLinesSink, KeyEvent};

/// Edge detector over a fixed set of bindings.
#[derive(Debug)]
struct KeyScanner {
    bindings: Vec<(GpioPin, KeyBinding)>,
    pressed: Vec<Option<bool>>,
}

impl KeyScanner {
    fn new(bindings: Vec<(GpioPin, KeyBinding)>) -> Self {
        let pressed = vec![None; bindings.len()];
        Self { bindings, pressed }
    }

    fn pins(&self) -> impl Iterator<Item = &GpioPin> {
        self.bindings.iter().map(|(pin, _)| pin)
    }

    /// Feeds one sample (pin levels in binding order) and returns the resulting events.
    fn scan(&mut self, levels: &[bool]) -> Vec<KeyEvent> {
        let mut events = Vec::new();
        for (((pin, binding), last), &level) in self
            .bindings
            .iter()
            .zip(self.pressed.iter_mut())
            .zip(levels)
        {
            let now = binding.pressed(level);
            if last.is_some_and(|was| was != now) {
                events.push(KeyEvent {
                    pin: pin.to_string(),
                    key: binding.key.clone(),
                    pressed: now,
                });
            }
            *last = Some(now);
        }
        events
    }
}

pub fn run<M: PhysMemory>(
    memory: &M,
    config: &Config,
    iterations: Option<u64>,
) -> Result<(), CliError> {
    if config.keymap.is_empty() {
        warn!("no key bindings configured; nothing to forward");
        return Ok(());
    }
    let bindings = config
        .keymap
        .iter()
        .map(|binding| -> Result<_, CliError> { Ok((binding.gpio()?, binding.clone())) })
        .collect::<Result<Vec<_>, CliError>>()?;
    let mut scanner = KeyScanner::new(bindings);

    let mut gpio = open_gpio(memory)?;
    for pin in scanner.pins().copied().collect::<Vec<_>>() {
        configure_pin(&mut gpio, &pin, false)?;
    }
    info!(keys = config.keymap.len(), "forwarding key events");

    let mut sink = JsonLinesSink::new(io::stdout().lock());
    let inputs: Vec<_> = scanner.pins().map(|pin| pin.field(GpioRegister::In)).collect();
    repeat(
        iterations,
        Duration::from_millis(config.poll.interval_ms),
        |_| {
            let levels = inputs
                .iter()
                .map(|&field| gpio.read(field).map(|level| level != 0))
                .collect::<Result<Vec<_>, _>>()?;
            for event in scanner.scan(&levels) {
                sink.emit(&event)?;
            }
            Ok(())
        },
    )?;

    gpio.close()?;
    Ok(())
}
