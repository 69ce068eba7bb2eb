//! Register window.
//!
//! A [`RegisterWindow`] owns one page-aligned mapping of physical memory and exposes
//! bit-field reads and read-modify-writes relative to the physical base it was opened
//! at. Offsets passed by callers are measured from that base, not from the page start:
//! opening at `0x6000_d004` and accessing offset 0 touches the same word as opening at
//! `0x6000_d000` and accessing offset 4.
//!
//! # Lifecycle
//!
//! `Unopened --map()--> Open --close()--> Closed`. There is no way back to `Open`;
//! construct a new window to remap. Accessors on a window that is not open return
//! [`FieldError::Closed`].
//!
//! # Concurrency
//!
//! [`RegisterWindow::set_field`] is a load followed by a store. Two writers of the same
//! word, in this process or another, can lose an update. Callers either keep one owner
//! per register bank or go through [`WindowRegistry`](crate::registry::WindowRegistry).

use std::sync::atomic::{Ordering, compiler_fence};

use tracing::{debug, trace, warn};

use crate::common::addr::PhysAddr;
use crate::common::constants::{PAGE_SIZE, REGISTER_BITS, WORD_SIZE};
use crate::common::error::{FieldError, OpenError};
use crate::field::Field;
use crate::mem::{DevMem, MappedPage, MmapPage, PhysMemory};

/// Lifecycle state of a [`RegisterWindow`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowState {
    /// Constructed, nothing mapped yet.
    Unopened,
    /// Page mapped; accessors are usable.
    Open,
    /// Page released; the window is spent.
    Closed,
}

/// One mapped page of registers, addressed relative to a physical base.
#[derive(Debug)]
pub struct RegisterWindow<P: MappedPage = MmapPage> {
    physical_base: PhysAddr,
    page: Option<P>,
    state: WindowState,
}

impl RegisterWindow<MmapPage> {
    /// Maps the page containing `physical_base` through `/dev/mem`.
    ///
    /// # Errors
    ///
    /// [`OpenError::PermissionDenied`] without access to `/dev/mem`,
    /// [`OpenError::MapFailed`] if the kernel refuses the mapping.
    pub fn open(physical_base: u32) -> Result<Self, OpenError> {
        Self::open_in(&DevMem::default(), physical_base)
    }
}

impl<P: MappedPage> RegisterWindow<P> {
    /// Creates an unopened window for `physical_base`.
    pub fn new(physical_base: u32) -> Self {
        let physical_base = PhysAddr::new(physical_base);
        if !physical_base.is_word_aligned() {
            warn!(%physical_base, "window base is not word-aligned; origin truncated to its word");
        }
        Self {
            physical_base,
            page: None,
            state: WindowState::Unopened,
        }
    }

    /// Creates a window for `physical_base` and maps it through `memory`.
    ///
    /// # Errors
    ///
    /// Whatever `memory` reports; see [`PhysMemory::map_page`].
    pub fn open_in<M>(memory: &M, physical_base: u32) -> Result<Self, OpenError>
    where
        M: PhysMemory<Page = P> + ?Sized,
    {
        let mut window = Self::new(physical_base);
        window.map(memory)?;
        Ok(window)
    }

    /// Maps the window's page, moving it from `Unopened` to `Open`.
    ///
    /// # Errors
    ///
    /// [`OpenError::InvalidState`] if the window has already been opened, otherwise
    /// whatever `memory` reports. The window stays `Unopened` on failure.
    pub fn map<M>(&mut self, memory: &M) -> Result<(), OpenError>
    where
        M: PhysMemory<Page = P> + ?Sized,
    {
        if self.state != WindowState::Unopened {
            return Err(OpenError::InvalidState(self.state));
        }
        let page = memory.map_page(self.physical_base.page_base())?;
        debug!(physical_base = %self.physical_base, page_base = %page.page_base(), "window open");
        self.page = Some(page);
        self.state = WindowState::Open;
        Ok(())
    }

    /// Releases the mapping, moving the window from `Open` to `Closed`.
    ///
    /// # Errors
    ///
    /// [`FieldError::Closed`] if the window is not open, including a second close.
    pub fn close(&mut self) -> Result<(), FieldError> {
        if self.state != WindowState::Open {
            return Err(FieldError::Closed);
        }
        drop(self.page.take());
        self.state = WindowState::Closed;
        debug!(physical_base = %self.physical_base, "window closed");
        Ok(())
    }

    /// Physical address offset 0 refers to.
    pub const fn physical_base(&self) -> PhysAddr {
        self.physical_base
    }

    /// Page-aligned address actually mapped.
    pub const fn page_base(&self) -> PhysAddr {
        self.physical_base.page_base()
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> WindowState {
        self.state
    }

    /// Returns `true` while accessors are usable.
    pub fn is_open(&self) -> bool {
        self.state == WindowState::Open
    }

    /// Bytes addressable from the window origin to the end of its page.
    pub const fn span(&self) -> u32 {
        PAGE_SIZE - self.physical_base.word_offset() * WORD_SIZE
    }

    /// Replaces `width` bits starting at `base_bit` of the register at `offset` with `value`.
    ///
    /// `value` is truncated to `width` bits; no other bit of the register changes.
    ///
    /// # Errors
    ///
    /// [`FieldError::Closed`] if the window is not open, [`FieldError::OutOfRange`] if the
    /// parameters do not describe a field of one register inside the page.
    pub fn set_field(
        &mut self,
        offset: u32,
        value: u32,
        base_bit: u32,
        width: u32,
    ) -> Result<(), FieldError> {
        self.write(Field::new(offset, base_bit, width), value)
    }

    /// Reads `width` bits starting at `base_bit` of the register at `offset`, shifted to bit 0.
    ///
    /// # Errors
    ///
    /// As for [`set_field`](Self::set_field).
    pub fn get_field(&self, offset: u32, base_bit: u32, width: u32) -> Result<u32, FieldError> {
        self.read(Field::new(offset, base_bit, width))
    }

    /// Read-modify-write of `field`.
    ///
    /// # Errors
    ///
    /// As for [`set_field`](Self::set_field).
    pub fn write(&mut self, field: Field, value: u32) -> Result<(), FieldError> {
        let reg = self.register(field)?;
        // SAFETY: `register` checked the word lies inside the live mapping.
        let old = unsafe { load(reg) };
        let new = field.insert(old, value);
        // SAFETY: as above.
        unsafe { store(reg, new) };
        trace!(
            addr = %self.addr_of(field.offset),
            base_bit = field.base_bit,
            width = field.width,
            old,
            new,
            "set field"
        );
        Ok(())
    }

    /// Reads `field`, shifted to bit 0.
    ///
    /// # Errors
    ///
    /// As for [`set_field`](Self::set_field).
    pub fn read(&self, field: Field) -> Result<u32, FieldError> {
        let reg = self.register(field)?;
        // SAFETY: `register` checked the word lies inside the live mapping.
        let word = unsafe { load(reg) };
        let value = field.extract(word);
        trace!(
            addr = %self.addr_of(field.offset),
            base_bit = field.base_bit,
            width = field.width,
            value,
            "get field"
        );
        Ok(value)
    }

    /// Reads the whole register at `offset`.
    ///
    /// # Errors
    ///
    /// As for [`set_field`](Self::set_field).
    pub fn read_word(&self, offset: u32) -> Result<u32, FieldError> {
        self.read(Field::new(offset, 0, REGISTER_BITS))
    }

    /// Stores `value` to the register at `offset` without reading it first.
    ///
    /// Intended for write-only registers such as the GPIO `MSK_*` set, where the
    /// hardware applies only the bits selected in the upper byte.
    ///
    /// # Errors
    ///
    /// As for [`set_field`](Self::set_field).
    pub fn write_word(&mut self, offset: u32, value: u32) -> Result<(), FieldError> {
        let reg = self.register(Field::new(offset, 0, REGISTER_BITS))?;
        // SAFETY: `register` checked the word lies inside the live mapping.
        unsafe { store(reg, value) };
        trace!(addr = %self.addr_of(offset), value, "write word");
        Ok(())
    }

    /// Resolves `field` to a pointer into the mapped page.
    fn register(&self, field: Field) -> Result<*mut u32, FieldError> {
        let page = match (&self.page, self.state) {
            (Some(page), WindowState::Open) => page,
            _ => return Err(FieldError::Closed),
        };
        field.validate(self.span())?;
        let index = (self.physical_base.word_offset() + field.offset / WORD_SIZE) as usize;
        // SAFETY: `validate` bounds `origin + offset + 4` by the page size, so `index`
        // addresses a word inside the page.
        Ok(unsafe { page.as_ptr().add(index) })
    }

    fn addr_of(&self, offset: u32) -> PhysAddr {
        PhysAddr::new(
            self.page_base().val() + self.physical_base.word_offset() * WORD_SIZE + offset,
        )
    }
}

/// Volatile load of one register.
///
/// # Safety
///
/// `reg` must point to a word inside a live mapping.
#[inline(always)]
unsafe fn load(reg: *mut u32) -> u32 {
    compiler_fence(Ordering::SeqCst);
    // SAFETY: guaranteed by the caller.
    unsafe { reg.read_volatile() }
}

/// Volatile store of one register.
///
/// # Safety
///
/// `reg` must point to a word inside a live mapping.
#[inline(always)]
unsafe fn store(reg: *mut u32, value: u32) {
    // SAFETY: guaranteed by the caller.
    unsafe { reg.write_volatile(value) };
    compiler_fence(Ordering::SeqCst);
}
