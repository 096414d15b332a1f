//! Process-wide configuration.

use std::path::PathBuf;

use indicatif::MultiProgress;

pub use mempress_aio::READ_TARGET;
pub use mempress_shm::SECTION_NAME;

/// Settings the strategies are built from.
///
/// Constructed once at startup and consumed by [`StrategyRegistry::new`](crate::StrategyRegistry::new).
#[derive(Clone, Debug)]
pub struct PressureConfig {
    /// Name of the shared-memory object used by `shareable` and `shareable_touch`
    pub section_name: String,
    /// File the `nppool` reads are issued against
    pub read_target: PathBuf,
    /// Progress display for long-running strategies (None = no progress bars)
    pub progress: Option<MultiProgress>,
}

impl Default for PressureConfig {
    fn default() -> Self {
        Self {
            section_name: SECTION_NAME.to_string(),
            read_target: PathBuf::from(READ_TARGET),
            progress: None,
        }
    }
}
