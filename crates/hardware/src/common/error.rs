//! Error definitions.
//!
//! This module defines the error taxonomy of the library. It provides:
//! 1. **Open Errors:** Failures to obtain the privileged device or to map a page.
//! 2. **Field Errors:** Contract violations in field parameters and use after close.
//! 3. **Config Errors:** Failures to read or interpret a configuration file.
//!
//! Nothing here aborts the process; every failure is handed back to the caller.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::addr::PhysAddr;
use crate::window::WindowState;

/// Failure to establish a register window.
#[derive(Debug, Error)]
pub enum OpenError {
    /// The physical-memory device could not be opened, usually for lack of privilege.
    #[error("cannot open {}: {source}", path.display())]
    PermissionDenied {
        /// Device path that was attempted.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The kernel refused to map the requested page.
    #[error("failed to map page {page_base}: {source}")]
    MapFailed {
        /// Page-aligned physical address that was requested.
        page_base: PhysAddr,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// A mapping was requested on a window that is already open or closed.
    #[error("window cannot be mapped from state {0:?}")]
    InvalidState(WindowState),
}

/// Failure of a single field access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Offset, base bit or width do not describe a field inside one register of the window.
    #[error("field out of range: offset {offset:#x}, base bit {base_bit}, width {width}")]
    OutOfRange {
        /// Byte offset from the window origin.
        offset: u32,
        /// Position of the least significant bit of the field.
        base_bit: u32,
        /// Number of bits in the field.
        width: u32,
    },

    /// The window is not open.
    #[error("register window is not open")]
    Closed,
}

/// Failure to load or resolve configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// File that was attempted.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// Configuration text is not valid JSON for [`Config`](crate::config::Config).
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A GPIO pin name did not parse.
    #[error("unknown GPIO pin {0:?}")]
    UnknownPin(String),

    /// A named field is not present in any table or in the configuration.
    #[error("unknown field {0:?}")]
    UnknownField(String),
}

/// Any error produced by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// See [`OpenError`].
    #[error(transparent)]
    Open(#[from] OpenError),
    /// See [`FieldError`].
    #[error(transparent)]
    Field(#[from] FieldError),
    /// See [`ConfigError`].
    #[error(transparent)]
    Config(#[from] ConfigError),
}
