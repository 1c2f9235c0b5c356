//! Offset pagination primitives shared by the booking backend.
//!
//! Collection endpoints accept `page` and `limit` query parameters and reply
//! with the envelope `{"data": [...], "total": N, "page": P, "limit": L}`.
//! [`PageRequest`] normalises the raw parameters and [`Page`] is the envelope.

use serde::{Deserialize, Serialize};

/// Page number used when the client omits `page`.
pub const DEFAULT_PAGE: u32 = 1;
/// Page size used when the client omits `limit` or sends zero.
pub const DEFAULT_LIMIT: u32 = 10;
/// Largest page size a client may request.
pub const MAX_LIMIT: u32 = 100;

/// Errors raised while parsing raw pagination parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageParamError {
    /// The named parameter was not an integer.
    #[error("{name} must be an integer, got '{value}'")]
    NotANumber {
        /// Query parameter name.
        name: &'static str,
        /// Raw value received.
        value: String,
    },
}

/// Normalised page selection.
///
/// ## Invariants
/// - `page >= 1`
/// - `1 <= limit <= MAX_LIMIT`
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::new(Some(3), Some(20));
/// assert_eq!(request.offset(), 40);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Build a request from optional values, clamping out-of-range input.
    ///
    /// A missing or zero page becomes [`DEFAULT_PAGE`]. A missing or zero
    /// limit becomes [`DEFAULT_LIMIT`] and limits above [`MAX_LIMIT`] are
    /// clamped.
    #[must_use]
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        let page = page.filter(|value| *value >= 1).unwrap_or(DEFAULT_PAGE);
        let limit = match limit {
            None | Some(0) => DEFAULT_LIMIT,
            Some(value) => value.min(MAX_LIMIT),
        };
        Self { page, limit }
    }

    /// Parse raw query-string values.
    ///
    /// Empty strings are treated as absent and negative values clamp like
    /// zero.
    ///
    /// # Errors
    /// Returns [`PageParamError::NotANumber`] when a value is present but is
    /// not an integer.
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Result<Self, PageParamError> {
        Ok(Self::new(
            parse_param("page", page)?,
            parse_param("limit", limit)?,
        ))
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of items to skip before the page starts.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.page.saturating_sub(1) as u64 * self.limit as u64
    }
}

fn parse_param(name: &'static str, raw: Option<&str>) -> Result<Option<u32>, PageParamError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<i64>()
            .map(|parsed| Some(u32::try_from(parsed.max(0)).unwrap_or(u32::MAX)))
            .map_err(|_| PageParamError::NotANumber {
                name,
                value: value.to_owned(),
            }),
    }
}

/// One page of a collection together with the total item count.
///
/// # Examples
/// ```
/// use pagination::{Page, PageRequest};
///
/// let page = Page::new(vec![1, 2], 7, PageRequest::new(Some(1), Some(2)));
/// let doubled = page.map(|value| value * 2);
/// assert_eq!(doubled.data, vec![2, 4]);
/// assert_eq!(doubled.total, 7);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page.
    pub data: Vec<T>,
    /// Number of items across all pages.
    pub total: u64,
    /// One-based page number.
    pub page: u32,
    /// Requested page size.
    pub limit: u32,
}

impl<T> Page<T> {
    /// Assemble a page from loaded items and the request that selected them.
    #[must_use]
    pub fn new(data: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            data,
            total,
            page: request.page,
            limit: request.limit,
        }
    }

    /// Convert every item while keeping the paging metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
        }
    }

    /// Fallible variant of [`Page::map`].
    ///
    /// # Errors
    /// Returns the first error produced by `f`.
    pub fn try_map<U, E, F>(self, f: F) -> Result<Page<U>, E>
    where
        F: FnMut(T) -> Result<U, E>,
    {
        Ok(Page {
            data: self.data.into_iter().map(f).collect::<Result<_, _>>()?,
            total: self.total,
            page: self.page,
            limit: self.limit,
        })
    }
}
