//! Page toucher.
//!
//! Faulting pages in is done by writing a single byte per page. Reading would be enough
//! for file-backed memory but anonymous private pages would then map the shared zero page
//! instead of getting a frame of their own.

use std::ptr::NonNull;

use libc::c_void;
use log::trace;

use crate::util::page_size;

/// Writes one byte into every page overlapping `[ptr, ptr + len)`.
///
/// Advances in page-size strides starting at the exact base address, so every page the
/// range touches is faulted in before the function returns. `len == 0` writes nothing.
///
/// # Safety
///
/// The whole range must be mapped writable. Touching a reserved-only or read-only range
/// raises `SIGSEGV`; this is not guarded against.
pub unsafe fn touch(ptr: NonNull<u8>, len: usize) {
    trace!("Touching {} bytes at {:p}", len, ptr);
    for offset in (0..len).step_by(page_size()) {
        unsafe { ptr.as_ptr().add(offset).write_volatile(b'a') };
    }
}

/// Counts the pages of `[ptr, ptr + len)` that are currently resident in RAM.
///
/// `ptr` must be page aligned.
///
/// # Errors
///
/// Returns the `mincore(2)` error, e.g. `ENOMEM` if part of the range is unmapped.
pub fn resident_pages(ptr: NonNull<u8>, len: usize) -> std::io::Result<usize> {
    let mut residency = vec![0u8; len.div_ceil(page_size())];
    let r = unsafe { libc::mincore(ptr.as_ptr() as *mut c_void, len, residency.as_mut_ptr()) };
    if r != 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(residency.iter().filter(|page| *page & 1 == 1).count())
}
