//! Anonymous address-space strategies.
//!
//! This crate provides the strategies that consume private address space and memory:
//!
//! - [`Reserve`] - address space with no access rights and no backing
//! - [`Commit`] - committed read/write memory, optionally faulted in right away
//! - [`Unusable`] - address space stranded by reserving single pages in coarse granules
//!
//! All of them go through the [`AddressSpace`] trait; [`Mmap`] is the Linux implementation.
//!
//! Implements the [`mempress_core::PressureStrategy`] trait.

#![warn(missing_docs)]

mod commit;
mod reserve;
mod space;
mod unusable;

pub use commit::Commit;
pub use reserve::Reserve;
pub use space::{AddressSpace, Mmap};
pub use unusable::Unusable;
