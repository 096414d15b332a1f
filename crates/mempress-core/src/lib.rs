//! # mempress core
//!
//! `mempress-core` holds the pieces shared by every memory-pressure strategy:
//! the [`strategy::PressureStrategy`] trait, the [`strategy::Allocation`] result type,
//! the page toucher in [`touch`] and a handful of utilities.
//!
//! ## Architecture Overview
//!
//! A strategy consumes one kind of operating-system resource in a characteristic,
//! reproducible way. Strategies never release what they allocate: the resulting
//! state is meant to be inspected by external diagnostic tools until the process exits.
//!
//! - [`strategy::PressureStrategy`] - a single `run(amount)` capability whose parameter
//!   unit ([`strategy::Unit`]) is declared by the strategy itself.
//! - [`strategy::apply_pressure`] - logging entry point used by the driver.
//! - [`touch::touch`] - faults every page of a range in.
//! - [`util`] - [`util::Size`], page constants and progress helpers.
//!
//! ## Platform Support
//!
//! Linux only. Residency checks rely on `mincore(2)`.

#![warn(missing_docs)]

pub mod strategy;
pub mod touch;
pub mod util;

pub use strategy::{Allocation, PressureStrategy, Unit, apply_pressure};
pub use touch::{resident_pages, touch};
