//! # mempress
//!
//! mempress is a controlled memory-pressure generator. On command it leaves a specific,
//! reproducible pattern of memory consumption behind (reserved address space, committed and
//! faulted pages, stranded reservations, shared-memory pages, leaked kernel tracking objects)
//! so that resource monitors, leak detectors and page-fault analyzers can be checked against
//! known ground truth.
//!
//! ## Modules
//!
//! - [`strategy`]: the closed set of strategies, one [`Strategy`] variant each.
//! - [`config`]: [`PressureConfig`], built once at startup.
//! - [`registry`]: [`StrategyRegistry`], the ordered name to strategy mapping.
//! - [`driver`]: argument scaling, invocation and console reporting.
//!
//! ## Strategy crates
//!
//! - `mempress-vm`: `reserve`, `commit`, `commit_touch`, `unusable`
//! - `mempress-shm`: `shareable`, `shareable_touch`
//! - `mempress-pool`: `pool`
//! - `mempress-aio`: `nppool`
//!
//! Nothing any strategy allocates is ever released.
//!
//! ```no_run
//! use mempress::{PressureConfig, StrategyRegistry, driver};
//!
//! let registry = StrategyRegistry::new(&PressureConfig::default());
//! let invocation = driver::resolve(&registry, "commit_touch", 64).expect("valid arguments");
//! let outcome = invocation.run();
//! driver::report(&outcome, &mut std::io::stdout(), &mut std::io::stderr()).expect("report");
//! ```

pub mod config;
pub mod driver;
pub mod registry;
pub mod strategy;

pub use config::PressureConfig;
pub use registry::{StrategyRegistry, UnknownStrategy};
pub use strategy::{Strategy, StrategyError};

pub use mempress_core::{Allocation, PressureStrategy, Unit, util};
