use log::debug;
use mempress_core::{Allocation, PressureStrategy, Unit, touch};

use crate::{AddressSpace, Mmap};

/// Commits read/write memory.
///
/// A lazy commit only charges the commit limit; physical pages are assigned on first touch
/// by whoever accesses them. A touched commit faults every page in before returning.
#[derive(Debug, Default, Clone)]
pub struct Commit<A: AddressSpace = Mmap> {
    space: A,
    touch: bool,
}

impl Commit {
    /// Commit without faulting pages in (`commit`).
    pub fn lazy() -> Self {
        Commit {
            space: Mmap,
            touch: false,
        }
    }

    /// Commit and fault every page in (`commit_touch`).
    pub fn touched() -> Self {
        Commit {
            space: Mmap,
            touch: true,
        }
    }
}

impl<A: AddressSpace> Commit<A> {
    /// Creates a commit strategy using `space`.
    pub fn with_space(space: A, touch: bool) -> Self {
        Commit { space, touch }
    }
}

impl<A: AddressSpace> PressureStrategy for Commit<A> {
    type Error = std::io::Error;

    fn unit(&self) -> Unit {
        Unit::Bytes
    }

    fn run(&self, amount: usize) -> Result<Allocation, Self::Error> {
        let ptr = self.space.commit(amount)?;
        debug!("Committed {} bytes at {:p}", amount, ptr);
        if self.touch {
            // freshly committed read/write range of `amount` bytes
            unsafe { touch(ptr, amount) };
            debug!("Faulted in {} bytes at {:p}", amount, ptr);
        }
        Ok(Allocation::Mapped { ptr, len: amount })
    }
}
