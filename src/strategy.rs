//! The closed set of memory-pressure strategies.
//!
//! To add a strategy, implement [`PressureStrategy`] in a strategy crate, add a variant to
//! [`Strategy`] and register it in [`StrategyRegistry::new`](crate::StrategyRegistry::new).

use mempress_aio::NpPool;
use mempress_core::{Allocation, PressureStrategy, Unit};
use mempress_pool::Pool;
use mempress_shm::Shareable;
use mempress_vm::{Commit, Reserve, Unusable};
use thiserror::Error;

/// One named strategy.
pub enum Strategy {
    /// `reserve`: address space without access or backing
    Reserve(Reserve),
    /// `commit`: committed read/write memory, not faulted in
    Commit(Commit),
    /// `commit_touch`: committed memory, every page faulted in
    CommitTouch(Commit),
    /// `unusable`: address space stranded by single-page reservations
    Unusable(Unusable),
    /// `shareable`: named shared memory mapped, not faulted in
    Shareable(Shareable),
    /// `shareable_touch`: named shared memory, every page faulted in
    ShareableTouch(Shareable),
    /// `pool`: unimplemented, always fails
    Pool(Pool),
    /// `nppool`: leaked asynchronous read completions
    NpPool(NpPool),
}

/// Error of any strategy run.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error(transparent)]
    Os(#[from] std::io::Error),
    #[error(transparent)]
    Pool(#[from] mempress_pool::Error),
    #[error(transparent)]
    Aio(#[from] mempress_aio::Error),
}

impl Strategy {
    /// Registry key of this strategy.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Reserve(_) => "reserve",
            Strategy::Commit(_) => "commit",
            Strategy::CommitTouch(_) => "commit_touch",
            Strategy::Unusable(_) => "unusable",
            Strategy::Shareable(_) => "shareable",
            Strategy::ShareableTouch(_) => "shareable_touch",
            Strategy::Pool(_) => "pool",
            Strategy::NpPool(_) => "nppool",
        }
    }
}

impl PressureStrategy for Strategy {
    type Error = StrategyError;

    fn unit(&self) -> Unit {
        match self {
            Strategy::Reserve(s) => s.unit(),
            Strategy::Commit(s) | Strategy::CommitTouch(s) => s.unit(),
            Strategy::Unusable(s) => s.unit(),
            Strategy::Shareable(s) | Strategy::ShareableTouch(s) => s.unit(),
            Strategy::Pool(s) => s.unit(),
            Strategy::NpPool(s) => s.unit(),
        }
    }

    fn run(&self, amount: usize) -> Result<Allocation, Self::Error> {
        Ok(match self {
            Strategy::Reserve(s) => s.run(amount)?,
            Strategy::Commit(s) | Strategy::CommitTouch(s) => s.run(amount)?,
            Strategy::Unusable(s) => s.run(amount)?,
            Strategy::Shareable(s) | Strategy::ShareableTouch(s) => s.run(amount)?,
            Strategy::Pool(s) => s.run(amount)?,
            Strategy::NpPool(s) => s.run(amount)?,
        })
    }
}

impl std::fmt::Debug for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Strategy({})", self.name())
    }
}
