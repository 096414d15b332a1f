//! Utility types and functions used throughout mempress.
//!
//! - [`Size`] - memory size representation
//! - page and granularity constants ([`PAGE_SIZE`], [`ALLOCATION_GRANULARITY`], ...)
//! - [`page_size`] - the page size reported by the running kernel
//! - progress reporting helpers ([`NamedProgress`], [`pressure_bar`])

mod constants;
mod named_progress;
mod size;

pub use self::constants::*;
pub use self::named_progress::{NamedProgress, pressure_bar};
pub use self::size::Size;

use lazy_static::lazy_static;

lazy_static! {
    static ref RUNTIME_PAGE_SIZE: usize = {
        let page_size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
        if page_size > 0 {
            page_size as usize
        } else {
            PAGE_SIZE
        }
    };
}

/// Returns the page size of the running kernel.
///
/// Queried once via `sysconf(_SC_PAGESIZE)`. Falls back to [`PAGE_SIZE`] if the
/// query fails.
pub fn page_size() -> usize {
    *RUNTIME_PAGE_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_is_power_of_two() {
        assert!(page_size().is_power_of_two());
        assert!(page_size() >= PAGE_SIZE);
    }

    #[test]
    fn test_granularity_strands_slack() {
        assert_eq!(ALLOCATION_GRANULARITY % PAGE_SIZE, 0);
        assert_eq!(ALLOCATION_GRANULARITY - PAGE_SIZE, Size::KB(60).bytes());
    }
}
