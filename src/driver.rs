//! Resolves a strategy name and amount into a single invocation and reports its outcome.
//!
//! Usage errors are detected in [`resolve`], before any resource is touched. Allocation
//! failures are only reported; the cause is logged at debug level, not printed.

use std::io::{self, Write};

use log::debug;
use mempress_core::util::Size;
use mempress_core::{Allocation, PressureStrategy, Unit, apply_pressure};
use thiserror::Error;

use crate::{Strategy, StrategyError, StrategyRegistry, UnknownStrategy};

/// Errors in the command-line arguments.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error(transparent)]
    UnknownStrategy(#[from] UnknownStrategy),
    #[error("amount must be greater than zero")]
    ZeroAmount,
    #[error("amount {amount} is too large for `{strategy}`")]
    TooLarge { strategy: &'static str, amount: u64 },
}

/// A strategy together with its scaled parameter, ready to run.
#[derive(Debug)]
pub struct Invocation<'r> {
    strategy: &'r Strategy,
    amount: usize,
}

impl Invocation<'_> {
    /// The resolved strategy.
    pub fn strategy(&self) -> &Strategy {
        self.strategy
    }

    /// Parameter in the strategy's own [`Unit`].
    pub fn amount(&self) -> usize {
        self.amount
    }

    /// Runs the strategy once.
    pub fn run(&self) -> Result<Allocation, StrategyError> {
        apply_pressure(self.strategy, self.amount)
    }
}

/// Resolves `name` and scales `amount`.
///
/// For [`Unit::Bytes`] strategies `amount` is in megabytes and is converted to bytes; for
/// [`Unit::Count`] strategies it is passed through.
///
/// # Errors
///
/// Returns a [`UsageError`] for an unknown name, a zero amount or an amount that overflows.
pub fn resolve<'r>(
    registry: &'r StrategyRegistry,
    name: &str,
    amount: u64,
) -> Result<Invocation<'r>, UsageError> {
    let strategy = registry.get(name)?;
    if amount == 0 {
        return Err(UsageError::ZeroAmount);
    }
    let too_large = || UsageError::TooLarge {
        strategy: strategy.name(),
        amount,
    };
    let count = usize::try_from(amount).map_err(|_| too_large())?;
    let amount = match strategy.unit() {
        Unit::Bytes => Size::MB(count).checked_bytes().ok_or_else(too_large)?,
        Unit::Count => count,
    };
    debug!("Resolved {} with {} {}", strategy.name(), amount, strategy.unit());
    Ok(Invocation { strategy, amount })
}

/// Writes the advisory outcome line: the address on `out`, or a failure notice on `err`.
///
/// # Errors
///
/// Returns any error writing to `out` or `err`.
pub fn report(
    outcome: &Result<Allocation, StrategyError>,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<()> {
    match outcome {
        Ok(allocation) => writeln!(out, "Allocated at address {}", allocation),
        Err(e) => {
            debug!("Allocation failed: {:?}", e);
            writeln!(err, "*** Allocation failed")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PressureConfig;

    fn registry() -> StrategyRegistry {
        StrategyRegistry::new(&PressureConfig::default())
    }

    #[test]
    fn test_megabytes_are_scaled() {
        let registry = registry();
        for name in ["reserve", "commit", "commit_touch", "unusable", "shareable", "shareable_touch"] {
            let invocation = resolve(&registry, name, 3).expect("valid");
            assert_eq!(invocation.amount(), 3 * 1024 * 1024);
            assert_eq!(invocation.strategy().name(), name);
        }
    }

    #[test]
    fn test_counts_pass_through() {
        let registry = registry();
        for name in ["pool", "nppool"] {
            assert_eq!(resolve(&registry, name, 3).expect("valid").amount(), 3);
        }
    }

    #[test]
    fn test_usage_errors() {
        let registry = registry();
        assert_eq!(
            resolve(&registry, "reserve", 0).unwrap_err(),
            UsageError::ZeroAmount
        );
        assert_eq!(
            resolve(&registry, "bogus", 1).unwrap_err(),
            UsageError::UnknownStrategy(UnknownStrategy("bogus".to_string()))
        );
        assert_eq!(
            resolve(&registry, "commit", u64::MAX).unwrap_err(),
            UsageError::TooLarge {
                strategy: "commit",
                amount: u64::MAX
            }
        );
    }

    #[test]
    fn test_report_success() -> anyhow::Result<()> {
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let allocation = Allocation::mapped(0xdead_0000 as *mut u8, 1).expect("non-null");
        report(&Ok(allocation), &mut out, &mut err)?;
        assert_eq!(String::from_utf8(out)?, "Allocated at address 0xdead0000\n");
        assert!(err.is_empty());
        Ok(())
    }

    #[test]
    fn test_report_sentinel() -> anyhow::Result<()> {
        let (mut out, mut err) = (Vec::new(), Vec::new());
        report(&Ok(Allocation::Scattered), &mut out, &mut err)?;
        assert_eq!(String::from_utf8(out)?, "Allocated at address 0x1\n");
        Ok(())
    }

    #[test]
    fn test_report_failure_hides_cause() -> anyhow::Result<()> {
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let outcome = Err(StrategyError::Pool(mempress_pool::Error::Unimplemented));
        report(&outcome, &mut out, &mut err)?;
        assert!(out.is_empty());
        assert_eq!(String::from_utf8(err)?, "*** Allocation failed\n");
        Ok(())
    }
}
