use log::debug;
use mempress_core::{Allocation, PressureStrategy, Unit};

use crate::{AddressSpace, Mmap};

/// Reserves address space without access rights and without physical backing.
///
/// The reservation shows up as virtual size only. Writing to it faults.
#[derive(Debug, Default, Clone)]
pub struct Reserve<A: AddressSpace = Mmap> {
    space: A,
}

impl Reserve {
    /// Creates a strategy reserving from the process address space.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<A: AddressSpace> Reserve<A> {
    /// Creates a strategy reserving through `space`.
    pub fn with_space(space: A) -> Self {
        Reserve { space }
    }
}

impl<A: AddressSpace> PressureStrategy for Reserve<A> {
    type Error = std::io::Error;

    fn unit(&self) -> Unit {
        Unit::Bytes
    }

    fn run(&self, amount: usize) -> Result<Allocation, Self::Error> {
        let ptr = self.space.reserve(amount)?;
        debug!("Reserved {} bytes at {:p}", amount, ptr);
        Ok(Allocation::Mapped { ptr, len: amount })
    }
}
