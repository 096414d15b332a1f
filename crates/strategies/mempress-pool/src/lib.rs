//! Object-pool strategy.
//!
//! A generic object-pool allocator was planned but never built. [`Pool`] keeps its place in the
//! strategy set: it tells the operator that it is unavailable and fails without touching any
//! resource.
//!
//! Implements the [`mempress_core::PressureStrategy`] trait.

#![warn(missing_docs)]

mod pool;

pub use pool::{Error, Pool};
