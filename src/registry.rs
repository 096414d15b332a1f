//! Name-based strategy lookup.

use mempress_aio::NpPool;
use mempress_pool::Pool;
use mempress_shm::Shareable;
use mempress_vm::{Commit, Reserve, Unusable};
use thiserror::Error;

use crate::{PressureConfig, Strategy};

/// Lookup of a name no strategy is registered under.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown strategy `{0}`")]
pub struct UnknownStrategy(pub String);

/// Ordered, immutable mapping from strategy name to [`Strategy`].
///
/// Built once from a [`PressureConfig`]; there is no way to add or remove strategies afterwards.
#[derive(Debug)]
pub struct StrategyRegistry {
    strategies: Vec<Strategy>,
}

impl StrategyRegistry {
    /// Builds the full strategy set.
    pub fn new(config: &PressureConfig) -> Self {
        let strategies = vec![
            Strategy::Reserve(Reserve::new()),
            Strategy::Commit(Commit::lazy()),
            Strategy::CommitTouch(Commit::touched()),
            Strategy::Unusable(Unusable::new(config.progress.clone())),
            Strategy::Shareable(Shareable::lazy(config.section_name.clone())),
            Strategy::ShareableTouch(Shareable::touched(config.section_name.clone())),
            Strategy::Pool(Pool::default()),
            Strategy::NpPool(NpPool::new(
                config.read_target.clone(),
                config.progress.clone(),
            )),
        ];
        StrategyRegistry { strategies }
    }

    /// Looks up a strategy by its exact, case-sensitive name.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownStrategy`] if no strategy has that name.
    pub fn get(&self, name: &str) -> Result<&Strategy, UnknownStrategy> {
        self.strategies
            .iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| UnknownStrategy(name.to_string()))
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.strategies.iter().map(Strategy::name)
    }

    /// Registered strategies in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Strategy> {
        self.strategies.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_unique() {
        let registry = StrategyRegistry::new(&PressureConfig::default());
        let mut names: Vec<_> = registry.names().collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let registry = StrategyRegistry::new(&PressureConfig::default());
        assert!(registry.get("commit").is_ok());
        assert_eq!(
            registry.get("Commit").unwrap_err(),
            UnknownStrategy("Commit".to_string())
        );
        assert!(registry.get("").is_err());
    }
}
