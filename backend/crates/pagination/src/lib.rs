//! Limit/offset page requests and the page envelope shared by listing
//! endpoints.
//!
//! Inbound adapters build a [`PageRequest`] from whatever the caller sent;
//! missing values fall back to defaults and out-of-range values are clamped
//! rather than rejected. Outbound adapters return a [`Page`] carrying the
//! requested slice alongside the total number of matching rows.

use serde::{Deserialize, Serialize};

/// Page size used when the caller does not supply one.
pub const DEFAULT_LIMIT: u32 = 20;

/// Largest page size an adapter will ever be asked for.
pub const MAX_LIMIT: u32 = 100;

/// Zero-indexed limit/offset window over an ordered result set.
///
/// ## Invariants
/// - `1 <= limit <= MAX_LIMIT`.
/// - `offset` counts skipped rows, so `0` is the first page.
///
/// # Examples
/// ```
/// use pagination::{PageRequest, DEFAULT_LIMIT, MAX_LIMIT};
///
/// let page = PageRequest::clamped(None, None);
/// assert_eq!(page.limit(), DEFAULT_LIMIT);
/// assert_eq!(page.offset(), 0);
///
/// let page = PageRequest::clamped(Some(5_000), Some(-3));
/// assert_eq!(page.limit(), MAX_LIMIT);
/// assert_eq!(page.offset(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    limit: u32,
    offset: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl PageRequest {
    /// Build a request from caller-supplied values, applying defaults and
    /// clamping into the valid range.
    #[must_use]
    pub fn clamped(limit: Option<i64>, offset: Option<i64>) -> Self {
        let limit = limit.map_or(DEFAULT_LIMIT, |raw| {
            let bounded = raw.clamp(1, i64::from(MAX_LIMIT));
            u32::try_from(bounded).unwrap_or(DEFAULT_LIMIT)
        });
        let offset = offset.map_or(0, |raw| u64::try_from(raw).unwrap_or(0));
        Self { limit, offset }
    }

    /// Maximum number of rows in the page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows skipped before the page starts.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// Select this page's window from an already ordered iterator.
    ///
    /// # Examples
    /// ```
    /// use pagination::PageRequest;
    ///
    /// let page = PageRequest::clamped(Some(2), Some(1));
    /// let rows: Vec<_> = page.window(1..=5).collect();
    /// assert_eq!(rows, vec![2, 3]);
    /// ```
    pub fn window<I>(&self, rows: I) -> impl Iterator<Item = I::Item>
    where
        I: IntoIterator,
    {
        let skip = usize::try_from(self.offset).unwrap_or(usize::MAX);
        let take = usize::try_from(self.limit).unwrap_or(usize::MAX);
        rows.into_iter().skip(skip).take(take)
    }
}

/// One page of results plus the total number of matching rows.
///
/// Serialises as `{"result": [...], "total": N}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Rows inside the requested window.
    pub result: Vec<T>,
    /// Total rows matching the query, ignoring the window.
    pub total: u64,
}

impl<T> Page<T> {
    /// Construct a page from its rows and total.
    #[must_use]
    pub const fn new(result: Vec<T>, total: u64) -> Self {
        Self { result, total }
    }

    /// An empty page reporting no matches.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            result: Vec::new(),
            total: 0,
        }
    }
}
