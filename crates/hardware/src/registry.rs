//! Shared window registry.
//!
//! [`RegisterWindow`] does no locking: its read-modify-write races with any other writer
//! of the same word. When several threads need the same register banks, they share a
//! [`WindowRegistry`] instead. The registry hands out one [`SharedWindow`] per physical
//! base and one lock per page; every field write holds the page lock across its load
//! and store, so windows that alias the same page serialise against each other too.
//!
//! Other processes mapping the same page are outside its reach.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::common::addr::PhysAddr;
use crate::common::error::{FieldError, OpenError};
use crate::field::Field;
use crate::mem::{MappedPage, PhysMemory};
use crate::window::RegisterWindow;

/// A register window guarded by the lock of its page.
#[derive(Debug)]
pub struct SharedWindow<P: MappedPage> {
    window: Mutex<RegisterWindow<P>>,
    page_lock: Arc<Mutex<()>>,
}

impl<P: MappedPage> SharedWindow<P> {
    fn locked(&self) -> (MutexGuard<'_, ()>, MutexGuard<'_, RegisterWindow<P>>) {
        // Page lock first, always.
        let page = self.page_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let window = self.window.lock().unwrap_or_else(PoisonError::into_inner);
        (page, window)
    }

    /// Physical base of the underlying window.
    pub fn physical_base(&self) -> PhysAddr {
        self.locked().1.physical_base()
    }

    /// See [`RegisterWindow::set_field`]; atomic with respect to the registry.
    ///
    /// # Errors
    ///
    /// As for [`RegisterWindow::set_field`].
    pub fn set_field(
        &self,
        offset: u32,
        value: u32,
        base_bit: u32,
        width: u32,
    ) -> Result<(), FieldError> {
        self.write(Field::new(offset, base_bit, width), value)
    }

    /// See [`RegisterWindow::get_field`].
    ///
    /// # Errors
    ///
    /// As for [`RegisterWindow::get_field`].
    pub fn get_field(&self, offset: u32, base_bit: u32, width: u32) -> Result<u32, FieldError> {
        self.read(Field::new(offset, base_bit, width))
    }

    /// Writes `field` under the page lock.
    ///
    /// # Errors
    ///
    /// As for [`RegisterWindow::write`].
    pub fn write(&self, field: Field, value: u32) -> Result<(), FieldError> {
        let (_page, mut window) = self.locked();
        window.write(field, value)
    }

    /// Reads `field` under the page lock.
    ///
    /// # Errors
    ///
    /// As for [`RegisterWindow::read`].
    pub fn read(&self, field: Field) -> Result<u32, FieldError> {
        let (_page, window) = self.locked();
        window.read(field)
    }

    /// Replaces `field` with `f(current)` without letting another registry user in
    /// between, returning the value written (truncated to the field width).
    ///
    /// # Errors
    ///
    /// As for [`RegisterWindow::write`].
    pub fn update<F>(&self, field: Field, f: F) -> Result<u32, FieldError>
    where
        F: FnOnce(u32) -> u32,
    {
        let (_page, mut window) = self.locked();
        let next = f(window.read(field)?) & field.value_mask();
        window.write(field, next)?;
        Ok(next)
    }

    fn close(&self) -> Result<(), FieldError> {
        let (_page, mut window) = self.locked();
        window.close()
    }
}

/// Process-wide cache of shared register windows over one physical memory backend.
pub struct WindowRegistry<M: PhysMemory> {
    memory: M,
    windows: Mutex<HashMap<PhysAddr, Arc<SharedWindow<M::Page>>>>,
    page_locks: Mutex<HashMap<PhysAddr, Arc<Mutex<()>>>>,
}

impl<M: PhysMemory + fmt::Debug> fmt::Debug for WindowRegistry<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowRegistry")
            .field("memory", &self.memory)
            .field("windows", &self.len())
            .finish_non_exhaustive()
    }
}

impl<M: PhysMemory> WindowRegistry<M> {
    /// Creates an empty registry mapping through `memory`.
    pub fn new(memory: M) -> Self {
        Self {
            memory,
            windows: Mutex::new(HashMap::new()),
            page_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Backend the registry maps through.
    pub const fn memory(&self) -> &M {
        &self.memory
    }

    /// Returns the shared window for `physical_base`, opening it on first use.
    ///
    /// # Errors
    ///
    /// Whatever the backend reports when the window is first mapped. Nothing is
    /// cached on failure.
    pub fn window(&self, physical_base: u32) -> Result<Arc<SharedWindow<M::Page>>, OpenError> {
        let key = PhysAddr::new(physical_base);
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(shared) = windows.get(&key) {
            return Ok(Arc::clone(shared));
        }

        let window = RegisterWindow::open_in(&self.memory, physical_base)?;
        let shared = Arc::new(SharedWindow {
            window: Mutex::new(window),
            page_lock: self.page_lock(key.page_base()),
        });
        debug!(physical_base = %key, "registered shared window");
        let _previous = windows.insert(key, Arc::clone(&shared));
        Ok(shared)
    }

    /// Number of windows currently registered.
    pub fn len(&self) -> usize {
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if no window is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Closes every registered window and forgets it. Handles still held elsewhere
    /// report [`FieldError::Closed`] from then on.
    pub fn close_all(&self) -> usize {
        let drained: Vec<_> = self
            .windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain()
            .map(|(_, shared)| shared)
            .collect();
        drained
            .iter()
            .filter(|shared| shared.close().is_ok())
            .count()
    }

    fn page_lock(&self, page_base: PhysAddr) -> Arc<Mutex<()>> {
        let mut locks = self.page_locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(page_base).or_default())
    }
}
