use indicatif::MultiProgress;
use log::{debug, info};
use mempress_core::util::{ALLOCATION_GRANULARITY, PAGE_SIZE, pressure_bar};
use mempress_core::{Allocation, PressureStrategy, Unit};

use crate::{AddressSpace, Mmap};

/// Kilobytes stranded by every single-page reservation.
const STRANDED_KB: usize = (ALLOCATION_GRANULARITY - PAGE_SIZE) / 1024;

/// Wastes address space by fragmenting it.
///
/// Reservations are handed out in [`ALLOCATION_GRANULARITY`] units. Reserving exactly one page
/// per granule strands the other 60 KB, which can never be reserved by anyone else. One
/// reservation is made per 60 KB requested and every returned address is discarded.
pub struct Unusable<A: AddressSpace = Mmap> {
    space: A,
    progress: Option<MultiProgress>,
}

impl Unusable {
    /// Creates the strategy. `progress` displays a bar while reserving.
    pub fn new(progress: Option<MultiProgress>) -> Self {
        Unusable {
            space: Mmap,
            progress,
        }
    }
}

impl<A: AddressSpace> Unusable<A> {
    /// Creates the strategy reserving through `space`.
    pub fn with_space(space: A, progress: Option<MultiProgress>) -> Self {
        Unusable { space, progress }
    }

    /// Number of single-page reservations issued for `bytes`.
    pub fn repetitions(bytes: usize) -> usize {
        (bytes / 1024) / STRANDED_KB
    }
}

impl<A: AddressSpace> PressureStrategy for Unusable<A> {
    type Error = std::io::Error;

    fn unit(&self) -> Unit {
        Unit::Bytes
    }

    fn run(&self, amount: usize) -> Result<Allocation, Self::Error> {
        let reps = Self::repetitions(amount);
        info!(
            "Reserving {} single pages, stranding {} KB",
            reps,
            reps * STRANDED_KB
        );
        let bar = pressure_bar(self.progress.as_ref(), "unusable", reps as u64);
        let mut refused = 0usize;
        for _ in 0..reps {
            if let Err(e) = self.space.reserve_page() {
                debug!("Single-page reservation refused: {}", e);
                refused += 1;
            }
            if let Some(bar) = &bar {
                bar.inc(1);
            }
        }
        if let Some(bar) = bar {
            bar.finish();
        }
        if refused > 0 {
            debug!("{} of {} reservations refused", refused, reps);
        }
        Ok(Allocation::Scattered)
    }
}
