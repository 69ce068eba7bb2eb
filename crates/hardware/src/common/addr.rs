//! Physical Address type.
//!
//! Register bases on the Tegra SoC are 32-bit physical addresses. Wrapping them in a
//! strong type keeps them apart from byte offsets and bit positions, which are also
//! plain `u32`s at every call site.

use std::fmt;

use super::constants::{PAGE_OFFSET_MASK, WORD_SIZE};

/// A physical address in the SoC's 32-bit address space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PhysAddr(pub u32);

impl PhysAddr {
    /// Creates a new physical address from a raw 32-bit value.
    #[inline(always)]
    pub const fn new(addr: u32) -> Self {
        Self(addr)
    }

    /// Returns the raw 32-bit address value.
    #[inline(always)]
    pub const fn val(&self) -> u32 {
        self.0
    }

    /// Returns the address rounded down to its 4KB page.
    pub const fn page_base(&self) -> Self {
        Self(self.0 & !PAGE_OFFSET_MASK)
    }

    /// Extracts the byte offset of the address within its page (0-4095).
    pub const fn page_offset(&self) -> u32 {
        self.0 & PAGE_OFFSET_MASK
    }

    /// Index of the 32-bit word containing this address within its page.
    pub const fn word_offset(&self) -> u32 {
        self.page_offset() / WORD_SIZE
    }

    /// Returns `true` if the address sits on a 32-bit register boundary.
    pub const fn is_word_aligned(&self) -> bool {
        self.0 % WORD_SIZE == 0
    }
}

impl From<u32> for PhysAddr {
    fn from(addr: u32) -> Self {
        Self(addr)
    }
}

impl fmt::Display for PhysAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}
