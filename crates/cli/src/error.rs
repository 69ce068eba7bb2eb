//! CLI error type.

use std::io;

use thiserror::Error;

use jetmmio_core::{ConfigError, FieldError, OpenError};

/// Anything that ends a command early.
#[derive(Debug, Error)]
pub enum CliError {
    /// Window could not be mapped.
    #[error(transparent)]
    Open(#[from] OpenError),
    /// Field access rejected.
    #[error(transparent)]
    Field(#[from] FieldError),
    /// Configuration problem.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Writing output failed.
    #[error("output: {0}")]
    Io(#[from] io::Error),
}
