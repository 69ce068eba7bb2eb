//! `/dev/mem` backend.
//!
//! Maps one page of physical address space through the kernel's physical-memory
//! character device. The mapping is `MAP_SHARED` so stores reach the peripheral and
//! loads observe it; the device is opened with `O_SYNC` so the kernel maps the page
//! uncached.

use std::fs::OpenOptions;
use std::io;
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use std::ptr::{self, NonNull};

use tracing::debug;

use super::{MappedPage, PhysMemory};
use crate::common::addr::PhysAddr;
use crate::common::constants::{DEV_MEM_PATH, PAGE_SIZE};
use crate::common::error::OpenError;

/// Physical memory reached through a character device (normally `/dev/mem`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DevMem {
    path: PathBuf,
}

impl Default for DevMem {
    fn default() -> Self {
        Self::new(DEV_MEM_PATH)
    }
}

impl DevMem {
    /// Uses the device (or any mappable file) at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the device this backend opens.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PhysMemory for DevMem {
    type Page = MmapPage;

    fn map_page(&self, page_base: PhysAddr) -> Result<MmapPage, OpenError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_SYNC)
            .open(&self.path)
            .map_err(|source| OpenError::PermissionDenied {
                path: self.path.clone(),
                source,
            })?;

        let offset = libc::off_t::try_from(page_base.val()).map_err(|_| OpenError::MapFailed {
            page_base,
            source: io::Error::from(io::ErrorKind::InvalidInput),
        })?;

        // SAFETY: requests a fresh shared mapping of one page from a descriptor that is
        // open for the duration of the call. The result is checked before use.
        let raw = unsafe {
            libc::mmap(
                ptr::null_mut(),
                PAGE_SIZE as usize,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED,
                file.as_raw_fd(),
                offset,
            )
        };
        if raw == libc::MAP_FAILED {
            return Err(OpenError::MapFailed {
                page_base,
                source: io::Error::last_os_error(),
            });
        }
        let ptr = NonNull::new(raw.cast::<u32>()).ok_or_else(|| OpenError::MapFailed {
            page_base,
            source: io::Error::from(io::ErrorKind::AddrNotAvailable),
        })?;

        debug!(path = %self.path.display(), %page_base, "mapped page");
        // The descriptor closes here; the mapping holds its own reference.
        Ok(MmapPage { ptr, page_base })
    }
}

/// A page mapped with `mmap`, unmapped on drop.
#[derive(Debug)]
pub struct MmapPage {
    ptr: NonNull<u32>,
    page_base: PhysAddr,
}

// SAFETY: the mapping is process-wide; the pointer may be used from any thread.
unsafe impl Send for MmapPage {}

impl MappedPage for MmapPage {
    fn as_ptr(&self) -> *mut u32 {
        self.ptr.as_ptr()
    }

    fn page_base(&self) -> PhysAddr {
        self.page_base
    }
}

impl Drop for MmapPage {
    fn drop(&mut self) {
        // SAFETY: `ptr` came from a successful one-page mmap and is unmapped only here.
        let rc = unsafe { libc::munmap(self.ptr.as_ptr().cast(), PAGE_SIZE as usize) };
        if rc == 0 {
            debug!(page_base = %self.page_base, "unmapped page");
        } else {
            debug!(page_base = %self.page_base, error = %io::Error::last_os_error(), "munmap failed");
        }
    }
}
