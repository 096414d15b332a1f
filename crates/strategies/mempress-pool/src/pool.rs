use log::warn;
use mempress_core::{Allocation, PressureStrategy, Unit};
use thiserror::Error;

/// Placeholder for the object-pool strategy. Always fails.
#[derive(Debug, Default, Copy, Clone)]
pub struct Pool {}

/// Errors returned by [`Pool`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The strategy has no implementation.
    #[error("pool allocator is not currently implemented")]
    Unimplemented,
}

impl PressureStrategy for Pool {
    type Error = Error;

    fn unit(&self) -> Unit {
        Unit::Count
    }

    fn run(&self, _amount: usize) -> Result<Allocation, Self::Error> {
        warn!("*** {}", Error::Unimplemented);
        Err(Error::Unimplemented)
    }
}
