/// Memory size representation supporting common units.
///
/// All units use binary (base-2) multipliers (1 KB = 1024 bytes).
///
/// # Examples
///
/// ```
/// use mempress_core::util::Size;
///
/// let size = Size::MB(4);
/// assert_eq!(size.bytes(), 4 * 1024 * 1024);
///
/// let small = Size::KB(60);
/// assert_eq!(small.bytes(), 61440);
/// ```
#[derive(Clone, Copy, Debug)]
pub enum Size {
    /// Size in bytes
    B(usize),
    /// Size in kilobytes (1 KB = 1024 bytes)
    KB(usize),
    /// Size in megabytes (1 MB = 1024 KB)
    MB(usize),
    /// Size in gigabytes (1 GB = 1024 MB)
    GB(usize),
}

impl Size {
    const fn shift(&self) -> (usize, u32) {
        match self {
            Size::B(bytes) => (*bytes, 0),
            Size::KB(kb) => (*kb, 10),
            Size::MB(mb) => (*mb, 20),
            Size::GB(gb) => (*gb, 30),
        }
    }

    /// Converts this size to bytes.
    ///
    /// Panics on overflow in debug builds. Use [`Size::checked_bytes`] for
    /// user-supplied quantities.
    ///
    /// ```
    /// use mempress_core::util::Size;
    ///
    /// assert_eq!(Size::B(100).bytes(), 100);
    /// assert_eq!(Size::MB(1).bytes(), 1048576);
    /// ```
    pub const fn bytes(&self) -> usize {
        let (value, shift) = self.shift();
        value * (1 << shift)
    }

    /// Converts this size to bytes, returning `None` if the result does not fit
    /// into `usize`.
    pub const fn checked_bytes(&self) -> Option<usize> {
        let (value, shift) = self.shift();
        value.checked_mul(1 << shift)
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Size::B(bytes) => write!(f, "{} B", bytes),
            Size::KB(kb) => write!(f, "{} KB", kb),
            Size::MB(mb) => write!(f, "{} MB", mb),
            Size::GB(gb) => write!(f, "{} GB", gb),
        }
    }
}
