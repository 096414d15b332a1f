use std::fs::File;
use std::io;
use std::os::fd::IntoRawFd;
use std::path::{Path, PathBuf};

use indicatif::MultiProgress;
use log::{debug, info};
use mempress_core::util::pressure_bar;
use mempress_core::{Allocation, PressureStrategy, Unit};
use thiserror::Error;

use crate::CompletionChannel;

/// File read by default: the running executable.
pub const READ_TARGET: &str = "/proc/self/exe";

/// Length of every leaked read. Irrelevant to the leak, kept small.
pub const READ_LEN: usize = 100;

/// Errors returned by [`NpPool`].
#[derive(Debug, Error)]
pub enum Error {
    /// The completion channel could not be opened.
    #[error("failed to open completion channel for {capacity} requests: {source}")]
    Channel {
        /// Requested number of completions
        capacity: usize,
        /// `io_setup` error
        source: io::Error,
    },
    /// The file to read from could not be opened.
    #[error("failed to open read target {}: {source}", .path.display())]
    Target {
        /// Path of the read target
        path: PathBuf,
        /// `open` error
        source: io::Error,
    },
    /// The kernel refused a request. Requests submitted before stay leaked.
    #[error("read request refused after {submitted} requests: {source}")]
    Submit {
        /// Number of requests queued before the refusal
        submitted: usize,
        /// `io_submit` error
        source: io::Error,
    },
}

/// Leaks kernel tracking objects through never-collected asynchronous reads.
///
/// The parameter is an object count: `count` reads are queued on a fresh
/// [`CompletionChannel`] and their completions are never retrieved. The channel, the read
/// target's descriptor and the read buffer are leaked along with them.
///
/// The count is bounded by `/proc/sys/fs/aio-max-nr`. The kernel charges roughly twice the
/// requested capacity against it, so with the default limit of 65536 counts above about 32000
/// fail with [`Error::Channel`] before anything is leaked.
pub struct NpPool {
    target: PathBuf,
    progress: Option<MultiProgress>,
}

impl NpPool {
    /// Creates the strategy reading from `target`. `progress` displays a bar while submitting.
    pub fn new(target: impl Into<PathBuf>, progress: Option<MultiProgress>) -> Self {
        NpPool {
            target: target.into(),
            progress,
        }
    }

    /// The file the leaked reads target.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Queues `count` reads and hands back the channel holding their uncollected completions.
    ///
    /// # Errors
    ///
    /// See [`Error`].
    pub fn leak_reads(&self, count: usize) -> Result<CompletionChannel, Error> {
        let channel = CompletionChannel::open(count).map_err(|source| Error::Channel {
            capacity: count,
            source,
        })?;
        let fd = File::open(&self.target)
            .map_err(|source| Error::Target {
                path: self.target.clone(),
                source,
            })?
            .into_raw_fd();
        let buffer: &'static mut [u8; READ_LEN] = Box::leak(Box::new([0; READ_LEN]));
        debug!(
            "Submitting {} reads of {} on fd {}",
            count,
            self.target.display(),
            fd
        );

        let bar = pressure_bar(self.progress.as_ref(), "nppool", count as u64);
        for submitted in 0..count {
            // fd and buffer are leaked, both outlive every request
            unsafe { channel.submit_read(fd, buffer.as_mut_ptr(), READ_LEN, 0) }
                .map_err(|source| Error::Submit { submitted, source })?;
            if let Some(bar) = &bar {
                bar.inc(1);
            }
        }
        if let Some(bar) = bar {
            bar.finish();
        }
        Ok(channel)
    }
}

impl Default for NpPool {
    fn default() -> Self {
        NpPool::new(READ_TARGET, None)
    }
}

impl PressureStrategy for NpPool {
    type Error = Error;

    fn unit(&self) -> Unit {
        Unit::Count
    }

    fn run(&self, amount: usize) -> Result<Allocation, Self::Error> {
        let channel = self.leak_reads(amount)?;
        info!(
            "Left {} completions uncollected on channel of {}",
            amount,
            channel.capacity()
        );
        Ok(Allocation::Scattered)
    }
}
