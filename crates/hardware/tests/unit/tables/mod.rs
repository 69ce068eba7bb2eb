//! # Register Table Tests

/// GPIO pin parsing and register offsets.
pub mod gpio;
