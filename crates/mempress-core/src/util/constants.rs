/// Page shift value (12 bits) for 4KB pages
pub const PAGE_SHIFT: usize = 12;
/// Standard page size (4096 bytes)
pub const PAGE_SIZE: usize = 1 << PAGE_SHIFT;

/// Granularity in which address space reservations are handed out (64 KiB).
///
/// A single-page reservation occupies a whole granule; the remaining
/// `ALLOCATION_GRANULARITY - PAGE_SIZE` bytes become unusable.
pub const ALLOCATION_GRANULARITY: usize = 1 << 16;

/// Address reported for allocations that have no single meaningful base address.
///
/// Never dereferenced.
pub const SCATTERED_ADDR: usize = 1;
