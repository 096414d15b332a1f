//! Kernel tracking-object strategy.
//!
//! This crate provides [`NpPool`], which consumes unswappable kernel memory instead of process
//! memory. It opens a Linux AIO completion context, issues asynchronous reads against a file and
//! never collects their completions. Every uncollected request keeps kernel bookkeeping alive for
//! the rest of the process lifetime.
//!
//! Implements the [`mempress_core::PressureStrategy`] trait.
//!
//! # Platform Requirements
//!
//! - Linux with `CONFIG_AIO`
//! - `/proc/sys/fs/aio-max-nr` must leave room for the requested number of events

#![warn(missing_docs)]

mod channel;
mod nppool;

pub use channel::CompletionChannel;
pub use nppool::{Error, NpPool, READ_LEN, READ_TARGET};
