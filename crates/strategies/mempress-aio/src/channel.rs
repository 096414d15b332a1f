//! Minimal bindings to the Linux AIO system calls (`linux/aio_abi.h`).

use std::io;
use std::os::fd::RawFd;
use std::time::Duration;

use libc::{c_long, syscall};
use log::trace;

#[allow(non_camel_case_types)]
type aio_context_t = libc::c_ulong;

const IOCB_CMD_PREAD: u16 = 0;

#[repr(C)]
#[derive(Debug, Default)]
struct Iocb {
    aio_data: u64,
    #[cfg(target_endian = "little")]
    aio_key: u32,
    aio_rw_flags: i32,
    #[cfg(target_endian = "big")]
    aio_key: u32,
    aio_lio_opcode: u16,
    aio_reqprio: i16,
    aio_fildes: u32,
    aio_buf: u64,
    aio_nbytes: u64,
    aio_offset: i64,
    aio_reserved2: u64,
    aio_flags: u32,
    aio_resfd: u32,
}

#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
struct IoEvent {
    data: u64,
    obj: u64,
    res: i64,
    res2: i64,
}

/// A kernel AIO context: the channel completion notifications are queued on.
///
/// There is no `Drop` implementation. Once opened the context lives until the process exits,
/// together with every completion nobody collected.
#[derive(Debug)]
pub struct CompletionChannel {
    ctx: aio_context_t,
    capacity: usize,
}

impl CompletionChannel {
    /// Opens a context able to queue at least `capacity` completions.
    ///
    /// # Errors
    ///
    /// Returns the `io_setup(2)` error, `EAGAIN` if `capacity` exceeds what
    /// `/proc/sys/fs/aio-max-nr` still allows. The kernel charges about twice `capacity`
    /// against that limit.
    pub fn open(capacity: usize) -> io::Result<Self> {
        let capacity = capacity.max(1);
        let mut ctx: aio_context_t = 0;
        let r = unsafe {
            syscall(
                libc::SYS_io_setup,
                capacity as c_long,
                &mut ctx as *mut aio_context_t,
            )
        };
        if r < 0 {
            return Err(io::Error::last_os_error());
        }
        trace!("io_setup({}) = {:#x}", capacity, ctx);
        Ok(CompletionChannel { ctx, capacity })
    }

    /// Number of completions the channel was opened for.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Queues an asynchronous read of `len` bytes at `offset` of `fd` into `buf`.
    ///
    /// # Safety
    ///
    /// `fd` must stay open and `buf` must stay valid for `len` bytes until the request
    /// completes. Several requests may share the same buffer.
    ///
    /// # Errors
    ///
    /// Returns the `io_submit(2)` error.
    pub unsafe fn submit_read(
        &self,
        fd: RawFd,
        buf: *mut u8,
        len: usize,
        offset: i64,
    ) -> io::Result<()> {
        let mut iocb = Iocb {
            aio_lio_opcode: IOCB_CMD_PREAD,
            aio_fildes: fd as u32,
            aio_buf: buf as u64,
            aio_nbytes: len as u64,
            aio_offset: offset,
            ..Default::default()
        };
        let mut iocbs = [&mut iocb as *mut Iocb];
        let r = unsafe {
            syscall(
                libc::SYS_io_submit,
                self.ctx,
                1 as c_long,
                iocbs.as_mut_ptr(),
            )
        };
        match r {
            1 => Ok(()),
            r if r < 0 => Err(io::Error::last_os_error()),
            _ => Err(io::Error::from(io::ErrorKind::WouldBlock)),
        }
    }

    /// Collects queued completions, waiting up to `timeout` for the channel to fill up.
    ///
    /// Returns the number of completions collected, at most [`capacity`](Self::capacity).
    ///
    /// # Errors
    ///
    /// Returns the `io_getevents(2)` error.
    pub fn reap(&self, timeout: Duration) -> io::Result<usize> {
        let mut events = vec![IoEvent::default(); self.capacity];
        let mut timeout = libc::timespec {
            tv_sec: timeout.as_secs() as libc::time_t,
            tv_nsec: timeout.subsec_nanos() as c_long,
        };
        let r = unsafe {
            syscall(
                libc::SYS_io_getevents,
                self.ctx,
                self.capacity as c_long,
                self.capacity as c_long,
                events.as_mut_ptr(),
                &mut timeout as *mut libc::timespec,
            )
        };
        if r < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(r as usize)
    }
}
