//! # Memory Backends
//!
//! Tests for the physical-memory backends behind a register window.


/// Simulated address space.
pub mod sim;
