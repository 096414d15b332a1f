use std::io;
use std::ptr::{NonNull, null_mut};

use libc::{MAP_ANONYMOUS, MAP_NORESERVE, MAP_PRIVATE, PROT_NONE, PROT_READ, PROT_WRITE};
use log::trace;
use mempress_core::util::ALLOCATION_GRANULARITY;

/// Primitive address-space operations the strategies in this crate are built from.
///
/// None of the operations has a counterpart that releases memory.
pub trait AddressSpace {
    /// Reserves `len` bytes of address space without access rights or backing.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the reservation is refused.
    fn reserve(&self, len: usize) -> io::Result<NonNull<u8>>;

    /// Reserves and commits `len` bytes of read/write memory. Pages are not faulted in.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the commit is refused, e.g. under strict overcommit.
    fn commit(&self, len: usize) -> io::Result<NonNull<u8>>;

    /// Reserves a single page. The rest of its allocation granule is lost.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the reservation is refused.
    fn reserve_page(&self) -> io::Result<NonNull<u8>>;
}

/// [`AddressSpace`] backed by anonymous `mmap(2)` mappings of the current process.
#[derive(Debug, Default, Clone, Copy)]
pub struct Mmap;

impl Mmap {
    fn map(len: usize, prot: libc::c_int, flags: libc::c_int) -> io::Result<NonNull<u8>> {
        let p = unsafe { libc::mmap(null_mut(), len, prot, flags, -1, 0) };
        if p == libc::MAP_FAILED {
            return Err(io::Error::last_os_error());
        }
        trace!("mmap({}, prot={:#x}, flags={:#x}) = {:p}", len, prot, flags, p);
        NonNull::new(p as *mut u8).ok_or_else(|| io::Error::from(io::ErrorKind::AddrNotAvailable))
    }
}

impl AddressSpace for Mmap {
    fn reserve(&self, len: usize) -> io::Result<NonNull<u8>> {
        Mmap::map(len, PROT_NONE, MAP_PRIVATE | MAP_ANONYMOUS | MAP_NORESERVE)
    }

    fn commit(&self, len: usize) -> io::Result<NonNull<u8>> {
        Mmap::map(len, PROT_READ | PROT_WRITE, MAP_PRIVATE | MAP_ANONYMOUS)
    }

    // Linux hands out address space page by page, so the granule is reserved in full.
    // Its first page is the reservation, the remainder is slack nothing else can map.
    fn reserve_page(&self) -> io::Result<NonNull<u8>> {
        self.reserve(ALLOCATION_GRANULARITY)
    }
}
