//! Validated page sizes.

/// Errors raised when a requested page size is out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageLimitError {
    /// A page must hold at least one item.
    #[error("page size must be at least 1")]
    Zero,
    /// The request exceeds the largest page the store is asked for.
    #[error("page size {requested} exceeds the maximum of {max}")]
    TooLarge {
        /// Requested size.
        requested: u32,
        /// Largest accepted size.
        max: u32,
    },
}

/// Number of items requested for one page.
///
/// # Examples
///
/// ```
/// use pagination::PageLimit;
///
/// assert_eq!(PageLimit::default().get(), 10);
/// assert!(PageLimit::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageLimit(u32);

impl PageLimit {
    /// Page size used when the caller does not ask for one.
    pub const DEFAULT: Self = Self(10);

    /// Largest accepted page size.
    pub const MAX: u32 = 100;

    /// Validate a requested page size.
    ///
    /// # Errors
    ///
    /// Returns [`PageLimitError`] when `value` is zero or above [`Self::MAX`].
    pub const fn new(value: u32) -> Result<Self, PageLimitError> {
        if value == 0 {
            return Err(PageLimitError::Zero);
        }
        if value > Self::MAX {
            return Err(PageLimitError::TooLarge {
                requested: value,
                max: Self::MAX,
            });
        }
        Ok(Self(value))
    }

    /// Resolve an optional request, falling back to `fallback`.
    ///
    /// # Errors
    ///
    /// Propagates [`PageLimit::new`] failures for explicit requests.
    pub fn resolve(requested: Option<u32>, fallback: Self) -> Result<Self, PageLimitError> {
        requested.map_or(Ok(fallback), Self::new)
    }

    /// Page size as a plain integer.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Page size as a collection length.
    pub fn as_usize(self) -> usize {
        usize::try_from(self.0).unwrap_or(usize::MAX)
    }
}

impl Default for PageLimit {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for PageLimit {
    type Error = PageLimitError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
