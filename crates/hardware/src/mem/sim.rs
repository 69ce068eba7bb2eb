//! Simulated physical memory.
//!
//! Stands in for `/dev/mem` when no hardware is present. Each physical page is a
//! zero-initialised heap buffer created on first use and kept for the lifetime of
//! the [`SimulatedMemory`]. Every window mapping the same page base receives the same
//! buffer, so aliasing windows observe each other's stores just as two real mappings
//! of one peripheral page would.

use std::cell::UnsafeCell;
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use super::{MappedPage, PhysMemory};
use crate::common::addr::PhysAddr;
use crate::common::constants::WORDS_PER_PAGE;
use crate::common::error::OpenError;

/// Backing storage for one simulated page.
struct PageBuffer {
    words: Box<[UnsafeCell<u32>]>,
}

// SAFETY: all access goes through volatile loads and stores of whole words; racing
// writers model the same lost-update hazard real hardware pages have.
unsafe impl Send for PageBuffer {}
unsafe impl Sync for PageBuffer {}

impl PageBuffer {
    fn new() -> Self {
        Self {
            words: (0..WORDS_PER_PAGE).map(|_| UnsafeCell::new(0)).collect(),
        }
    }

    fn as_ptr(&self) -> *mut u32 {
        // `UnsafeCell<u32>` has the same layout as `u32`.
        self.words.as_ptr() as *mut u32
    }

    fn read_u32(&self, index: usize) -> u32 {
        assert!(index < WORDS_PER_PAGE, "simulated page read out of bounds");
        // SAFETY: index is within the page.
        unsafe { self.words[index].get().read_volatile() }
    }

    fn write_u32(&self, index: usize, val: u32) {
        assert!(index < WORDS_PER_PAGE, "simulated page write out of bounds");
        // SAFETY: index is within the page.
        unsafe { self.words[index].get().write_volatile(val) }
    }
}

/// A mapping of one simulated page.
pub struct SimPage {
    buffer: Arc<PageBuffer>,
    page_base: PhysAddr,
}

impl std::fmt::Debug for SimPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimPage")
            .field("page_base", &self.page_base)
            .finish_non_exhaustive()
    }
}

impl MappedPage for SimPage {
    fn as_ptr(&self) -> *mut u32 {
        self.buffer.as_ptr()
    }

    fn page_base(&self) -> PhysAddr {
        self.page_base
    }
}

/// In-process physical address space made of lazily created pages.
#[derive(Default)]
pub struct SimulatedMemory {
    pages: Mutex<HashMap<PhysAddr, Arc<PageBuffer>>>,
    deny_access: AtomicBool,
    fail_mappings: AtomicBool,
}

impl std::fmt::Debug for SimulatedMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedMemory")
            .field("pages", &self.page_count())
            .field("deny_access", &self.deny_access.load(Ordering::Relaxed))
            .field("fail_mappings", &self.fail_mappings.load(Ordering::Relaxed))
            .finish()
    }
}

impl SimulatedMemory {
    /// Creates an empty address space.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent maps fail as if the device could not be opened.
    pub fn deny_access(&self) {
        self.deny_access.store(true, Ordering::SeqCst);
    }

    /// Makes subsequent maps fail as if `mmap` had refused the page.
    pub fn fail_mappings(&self) {
        self.fail_mappings.store(true, Ordering::SeqCst);
    }

    /// Clears any injected failure.
    pub fn allow_access(&self) {
        self.deny_access.store(false, Ordering::SeqCst);
        self.fail_mappings.store(false, Ordering::SeqCst);
    }

    /// Reads the word containing physical address `addr`.
    pub fn peek_word(&self, addr: PhysAddr) -> u32 {
        self.page(addr.page_base())
            .read_u32(addr.word_offset() as usize)
    }

    /// Writes the word containing physical address `addr`.
    pub fn poke_word(&self, addr: PhysAddr, val: u32) {
        self.page(addr.page_base())
            .write_u32(addr.word_offset() as usize, val);
    }

    /// Number of pages ever touched.
    pub fn page_count(&self) -> usize {
        self.pages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Number of live mappings across all pages.
    pub fn mapped_pages(&self) -> usize {
        self.pages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(|page| Arc::strong_count(page) - 1)
            .sum()
    }

    fn page(&self, page_base: PhysAddr) -> Arc<PageBuffer> {
        let mut pages = self.pages.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            pages
                .entry(page_base)
                .or_insert_with(|| Arc::new(PageBuffer::new())),
        )
    }
}

impl PhysMemory for SimulatedMemory {
    type Page = SimPage;

    fn map_page(&self, page_base: PhysAddr) -> Result<SimPage, OpenError> {
        if self.deny_access.load(Ordering::SeqCst) {
            return Err(OpenError::PermissionDenied {
                path: PathBuf::from("<simulated>"),
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            });
        }
        if self.fail_mappings.load(Ordering::SeqCst) {
            return Err(OpenError::MapFailed {
                page_base,
                source: io::Error::from(io::ErrorKind::OutOfMemory),
            });
        }

        debug!(%page_base, "mapped simulated page");
        Ok(SimPage {
            buffer: self.page(page_base),
            page_base,
        })
    }
}
