//! Configuration for register-access programs.
//!
//! This module defines the configuration consumed by the `jetmmio` binary and by any
//! program that wants named fields beyond the built-in tables. It provides:
//! 1. **Defaults:** Device path and poll interval constants.
//! 2. **Structures:** Device, polling, key-binding and field-descriptor sections.
//! 3. **Lookup:** Resolution of a field name against configuration, then the built-in tables.
//!
//! Configuration is JSON; every section may be omitted.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::common::error::ConfigError;
use crate::field::Field;
use crate::tables::{self, GpioPin, NamedField};

/// Default configuration constants.
mod defaults {
    /// Physical-memory device.
    pub const DEVICE_PATH: &str = crate::common::constants::DEV_MEM_PATH;

    /// Interval between input samples in polling programs (milliseconds).
    pub const POLL_INTERVAL_MS: u64 = 10;

    /// Buttons are normally wired to pull the pin to ground.
    pub const ACTIVE_LOW: bool = true;
}

/// Root configuration.
///
/// # Examples
///
/// ```
/// use jetmmio_core::config::Config;
///
/// let json = r#"{
///     "device": { "simulate": true },
///     "keymap": [ { "pin": "PB4", "key": "KEY_ENTER" } ],
///     "fields": [
///         { "name": "led", "base": 1610666000, "offset": 32, "base_bit": 5, "width": 1 }
///     ]
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert!(config.device.simulate);
/// assert!(config.keymap[0].active_low);
/// assert_eq!(config.field("led").unwrap().field.base_bit, 5);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Physical memory access
    #[serde(default)]
    pub device: DeviceConfig,
    /// Input polling
    #[serde(default)]
    pub poll: PollConfig,
    /// Pin-to-key bindings for key emulation
    #[serde(default)]
    pub keymap: Vec<KeyBinding>,
    /// Extra named fields
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl Config {
    /// Parses configuration from JSON text.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] on malformed JSON or mistyped values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read, otherwise as [`from_json`](Self::from_json).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Resolves `name` against the configured fields, then the built-in tables.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownField`] if neither knows the name.
    pub fn field(&self, name: &str) -> Result<NamedField, ConfigError> {
        self.fields
            .iter()
            .find(|d| d.name == name)
            .map(FieldDescriptor::named)
            .or_else(|| tables::resolve(name))
            .ok_or_else(|| ConfigError::UnknownField(name.to_string()))
    }
}

/// Physical memory access settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceConfig {
    /// Device mapped for register access
    #[serde(default = "DeviceConfig::default_path")]
    pub path: PathBuf,

    /// Use simulated memory instead of the device
    #[serde(default)]
    pub simulate: bool,
}

impl DeviceConfig {
    fn default_path() -> PathBuf {
        PathBuf::from(defaults::DEVICE_PATH)
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            path: Self::default_path(),
            simulate: false,
        }
    }
}

/// Input polling settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PollConfig {
    /// Interval between samples in milliseconds
    #[serde(default = "PollConfig::default_interval_ms")]
    pub interval_ms: u64,
}

impl PollConfig {
    const fn default_interval_ms() -> u64 {
        defaults::POLL_INTERVAL_MS
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: defaults::POLL_INTERVAL_MS,
        }
    }
}

/// One GPIO input forwarded as a key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KeyBinding {
    /// Pin name, e.g. `PB4` or `BB.01`
    pub pin: String,
    /// Key name reported to the event sink, e.g. `KEY_ENTER`
    pub key: String,
    /// Pressed when the pin reads 0
    #[serde(default = "KeyBinding::default_active_low")]
    pub active_low: bool,
}

impl KeyBinding {
    const fn default_active_low() -> bool {
        defaults::ACTIVE_LOW
    }

    /// Parsed pin.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownPin`] if the pin name does not parse.
    pub fn gpio(&self) -> Result<GpioPin, ConfigError> {
        GpioPin::from_str(&self.pin)
    }

    /// Key state for a sampled pin level.
    pub const fn pressed(&self, level: bool) -> bool {
        level != self.active_low
    }
}

/// A user-supplied named field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldDescriptor {
    /// Name used to look the field up
    pub name: String,
    /// Physical base the offset is relative to
    pub base: u32,
    /// Byte offset of the register
    pub offset: u32,
    /// Least significant bit
    pub base_bit: u32,
    /// Width in bits
    pub width: u32,
}

impl FieldDescriptor {
    /// Converts to a [`NamedField`].
    pub const fn named(&self) -> NamedField {
        NamedField {
            base: self.base,
            field: Field::new(self.offset, self.base_bit, self.width),
        }
    }
}
