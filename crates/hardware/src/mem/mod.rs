//! Physical memory backends.
//!
//! A register window never talks to the OS directly; it asks a [`PhysMemory`] for
//! one page and keeps the returned [`MappedPage`] alive for as long as it is open.
//! This module provides:
//! 1. **Traits:** The mapping interface shared by every backend.
//! 2. **`/dev/mem`:** The real backend, mapping hardware pages shared with the SoC.
//! 3. **Simulation:** Anonymous memory standing in for physical pages, for tests and dry runs.

use crate::common::addr::PhysAddr;
use crate::common::error::OpenError;

/// Backend mapping through the Linux physical-memory device.
pub mod devmem;

/// In-process simulated physical memory.
pub mod sim;

pub use devmem::{DevMem, MmapPage};
pub use sim::{SimPage, SimulatedMemory};

/// One mapped page of physical memory.
///
/// The mapping stays valid until the value is dropped.
pub trait MappedPage: Send {
    /// Pointer to the first 32-bit word of the page. Valid for `PAGE_SIZE` bytes.
    fn as_ptr(&self) -> *mut u32;
    /// Physical address the page was mapped from.
    fn page_base(&self) -> PhysAddr;
}

/// Source of page mappings for physical addresses.
pub trait PhysMemory {
    /// Mapping type produced by this backend.
    type Page: MappedPage;

    /// Maps the page starting at `page_base` read-write.
    ///
    /// `page_base` must be page-aligned.
    ///
    /// # Errors
    ///
    /// [`OpenError::PermissionDenied`] if the backing device cannot be opened and
    /// [`OpenError::MapFailed`] if the mapping itself is refused. No mapping is left
    /// behind on failure.
    fn map_page(&self, page_base: PhysAddr) -> Result<Self::Page, OpenError>;
}

impl<M: PhysMemory + ?Sized> PhysMemory for &M {
    type Page = M::Page;

    fn map_page(&self, page_base: PhysAddr) -> Result<Self::Page, OpenError> {
        (**self).map_page(page_base)
    }
}
