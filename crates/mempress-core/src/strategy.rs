//! Memory-pressure strategies.
//!
//! This module defines the [`PressureStrategy`] trait implemented by every strategy crate,
//! the [`Allocation`] value a successful run produces and the [`apply_pressure`] entry point.

use std::fmt;
use std::ptr::NonNull;

use log::{debug, info};

use crate::util::{SCATTERED_ADDR, Size};

/// Unit of the single parameter a strategy accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unit {
    /// Number of bytes of address space or memory to consume.
    Bytes,
    /// Number of kernel objects to consume.
    Count,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Bytes => write!(f, "bytes"),
            Unit::Count => write!(f, "objects"),
        }
    }
}

/// Outcome of a successful strategy run.
///
/// Allocations are never released. There is deliberately no `Drop` implementation and no
/// way to free the underlying resource: it stays consumed until the process exits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Allocation {
    /// A single region of `len` bytes starting at `ptr`.
    Mapped {
        /// Base address of the region
        ptr: NonNull<u8>,
        /// Region length in bytes
        len: usize,
    },
    /// The strategy succeeded but consumed resources that have no single base address.
    Scattered,
}

impl Allocation {
    /// Creates a mapped allocation from a raw base pointer.
    ///
    /// Returns `None` if `ptr` is null.
    pub fn mapped(ptr: *mut u8, len: usize) -> Option<Self> {
        NonNull::new(ptr).map(|ptr| Allocation::Mapped { ptr, len })
    }

    /// Address to report for this allocation.
    ///
    /// [`Allocation::Scattered`] reports [`SCATTERED_ADDR`], which must never be dereferenced.
    pub fn addr(&self) -> usize {
        match self {
            Allocation::Mapped { ptr, .. } => ptr.as_ptr() as usize,
            Allocation::Scattered => SCATTERED_ADDR,
        }
    }

    /// Base pointer and length of a mapped allocation.
    pub fn region(&self) -> Option<(NonNull<u8>, usize)> {
        match self {
            Allocation::Mapped { ptr, len } => Some((*ptr, *len)),
            Allocation::Scattered => None,
        }
    }
}

impl fmt::Display for Allocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.addr())
    }
}

/// A technique for consuming memory or kernel resources in a characteristic, named way.
///
/// Every call to [`run`](PressureStrategy::run) allocates fresh resources. Implementors
/// must not cache, reuse, retry or release anything.
pub trait PressureStrategy {
    /// The error type returned when the platform refuses the allocation.
    type Error: std::error::Error;

    /// The unit in which [`run`](PressureStrategy::run) interprets its parameter.
    fn unit(&self) -> Unit;

    /// Consumes `amount` [`unit`](PressureStrategy::unit)s of the strategy's resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses the reservation, commit, mapping or
    /// kernel object the strategy needs. Resources consumed before the failure stay
    /// consumed.
    fn run(&self, amount: usize) -> Result<Allocation, Self::Error>;
}

/// Runs `strategy` once with `amount`.
///
/// This is the entry point the driver uses; it only adds logging around
/// [`PressureStrategy::run`].
///
/// # Errors
///
/// Propagates the strategy's error unchanged.
pub fn apply_pressure<S: PressureStrategy + ?Sized>(
    strategy: &S,
    amount: usize,
) -> Result<Allocation, S::Error> {
    match strategy.unit() {
        Unit::Bytes => info!("Consuming {} ({} bytes)", Size::B(amount), amount),
        Unit::Count => info!("Consuming {} {}", amount, strategy.unit()),
    }
    let allocation = strategy.run(amount);
    match &allocation {
        Ok(allocation) => debug!("Strategy returned {}", allocation),
        Err(e) => debug!("Strategy failed: {}", e),
    }
    allocation
}
