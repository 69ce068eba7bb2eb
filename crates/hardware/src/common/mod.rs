//! Common types shared by every part of the register-access library.
//!
//! This module provides the fundamental building blocks used across the crate. It includes:
//! 1. **Address Types:** A strong type for 32-bit physical addresses and their page arithmetic.
//! 2. **Constants:** Page size, word size and the default physical-memory device path.
//! 3. **Error Handling:** Open, field-access and configuration error types.

/// Physical address type.
pub mod addr;

/// Platform constants (page size, register width).
pub mod constants;

/// Error types for mapping, field access and configuration.
pub mod error;

pub use addr::PhysAddr;
pub use constants::{PAGE_OFFSET_MASK, PAGE_SIZE, WORD_SIZE};
pub use error::{ConfigError, Error, FieldError, OpenError};
