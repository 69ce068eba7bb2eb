//! User-space register access for Tegra-class Jetson SoCs.
//!
//! This crate maps peripheral register pages through `/dev/mem` and reads and writes
//! individual bit-fields inside them. It provides:
//! 1. **Window:** [`RegisterWindow`], one mapped page with checked, volatile field access.
//! 2. **Memory:** The `/dev/mem` backend and an in-process simulated address space.
//! 3. **Fields:** [`Field`] descriptors and the mask arithmetic behind every access.
//! 4. **Tables:** GPIO, pinmux and pad-group register maps keyed by TRM names.
//! 5. **Registry:** An opt-in, lock-per-page layer for sharing windows across threads.
//! 6. **Configuration:** JSON configuration for devices, key bindings and extra fields.
//!
//! ```no_run
//! use jetmmio_core::RegisterWindow;
//! use jetmmio_core::tables::{GPIO_BASE, GpioPin, GpioRegister};
//!
//! # fn main() -> Result<(), jetmmio_core::Error> {
//! let led: GpioPin = "PB4".parse()?;
//! let mut gpio = RegisterWindow::open(GPIO_BASE)?;
//! gpio.write(led.field(GpioRegister::Cnf), 1)?;
//! gpio.write(led.field(GpioRegister::Oe), 1)?;
//! gpio.write(led.field(GpioRegister::Out), 1)?;
//! gpio.close()?;
//! # Ok(())
//! # }
//! ```

/// Common types (addresses, constants, errors).
pub mod common;
/// JSON configuration (device, polling, key bindings, named fields).
pub mod config;
/// Bit-field descriptors and mask arithmetic.
pub mod field;
/// Physical memory backends (`/dev/mem`, simulation).
pub mod mem;
/// Lock-per-page sharing of register windows.
pub mod registry;
/// GPIO, pinmux and pad-group register tables.
pub mod tables;
/// The register window.
pub mod window;

/// Physical address of a register or page.
pub use crate::common::PhysAddr;
/// Error types; [`Error`] wraps the others for `?` in binaries.
pub use crate::common::{ConfigError, Error, FieldError, OpenError};
/// Root configuration; use `Config::default()` or [`Config::load`].
pub use crate::config::Config;
/// Field descriptor `(offset, base_bit, width)`.
pub use crate::field::Field;
/// Backends and their page types.
pub use crate::mem::{DevMem, MappedPage, PhysMemory, SimulatedMemory};
/// Shared, thread-safe windows.
pub use crate::registry::{SharedWindow, WindowRegistry};
/// A mapped register page and its lifecycle state.
pub use crate::window::{RegisterWindow, WindowState};
