//! Named shared-memory strategies.
//!
//! This crate provides [`Shareable`], which maps a named POSIX shared-memory object into the
//! process. The pages are shared, not private: every process mapping the same name observes the
//! same content, and the memory is accounted as `Shmem` rather than anonymous memory.
//!
//! The process that created an object removes its name on exit (see
//! [`unlink_created_sections`]), so the memory is reclaimed once the last view is gone.
//!
//! Implements the [`mempress_core::PressureStrategy`] trait.
//!
//! # Platform Requirements
//!
//! - Linux with `/dev/shm` (tmpfs) mounted

#![warn(missing_docs)]

mod shareable;

pub use shareable::{SECTION_NAME, Shareable, unlink_created_sections};
