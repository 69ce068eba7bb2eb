//! Platform Constants.
//!
//! This module defines the constants the register window is built around. It includes:
//! 1. **Memory Constants:** Page size and the mask used to split an address into page and offset.
//! 2. **Register Constants:** Width of a hardware register in bytes and bits.
//! 3. **Device Constants:** The default path of the privileged physical-memory device.

/// Page size in bytes (4KB). Every mapping covers exactly one page.
pub const PAGE_SIZE: u32 = 4096;

/// Mask for extracting the in-page offset from an address.
pub const PAGE_OFFSET_MASK: u32 = PAGE_SIZE - 1;

/// Size of one hardware register in bytes.
pub const WORD_SIZE: u32 = 4;

/// Width of one hardware register in bits.
pub const REGISTER_BITS: u32 = 32;

/// Number of 32-bit words in one page.
pub const WORDS_PER_PAGE: usize = (PAGE_SIZE / WORD_SIZE) as usize;

/// Character device exposing physical memory on Linux.
pub const DEV_MEM_PATH: &str = "/dev/mem";
