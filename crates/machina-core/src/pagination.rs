//! Result windows and page-numbered access.

use crate::{DaoError, DaoResult};
use serde::{Deserialize, Serialize};

/// A validated `(first_result, max_results)` pair.
///
/// `first_result` is a zero-based offset and `max_results` bounds the number
/// of returned items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResultWindow {
    first_result: usize,
    max_results: usize,
}

impl ResultWindow {
    /// Creates a window, rejecting a negative offset or a non-positive size.
    pub fn new(first_result: i64, max_results: i64) -> DaoResult<Self> {
        let first = usize::try_from(first_result).map_err(|_| {
            DaoError::invalid_argument(format!(
                "firstResult must be zero or positive, got {first_result}"
            ))
        })?;
        let max = usize::try_from(max_results)
            .ok()
            .filter(|max| *max > 0)
            .ok_or_else(|| {
                DaoError::invalid_argument(format!(
                    "maxResults must be positive, got {max_results}"
                ))
            })?;

        Ok(Self {
            first_result: first,
            max_results: max,
        })
    }

    /// Returns the zero-based offset.
    #[must_use]
    pub const fn first_result(&self) -> usize {
        self.first_result
    }

    /// Returns the maximum number of items.
    #[must_use]
    pub const fn max_results(&self) -> usize {
        self.max_results
    }

    /// Returns the items of `items` that fall inside this window.
    #[must_use]
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.first_result.min(items.len());
        let end = start.saturating_add(self.max_results).min(items.len());
        &items[start..end]
    }

    /// Consumes `items`, keeping only those inside this window.
    #[must_use]
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.first_result)
            .take(self.max_results)
            .collect()
    }
}

/// Zero-based page number plus page size.
///
/// Sizes are taken as given; a zero size is rejected when the request is
/// turned into a [`ResultWindow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: usize,
    pub size: usize,
}

impl PageRequest {
    #[must_use]
    pub const fn new(page: usize, size: usize) -> Self {
        Self { page, size }
    }

    /// Returns a copy whose size is at most `max_size`.
    #[must_use]
    pub fn capped(self, max_size: usize) -> Self {
        Self::new(self.page, self.size.min(max_size))
    }

    /// Translates the page into an offset window.
    ///
    /// Fails with `InvalidArgument` for a zero size or when the page starts
    /// beyond the addressable range.
    pub fn window(&self) -> DaoResult<ResultWindow> {
        let out_of_range = || {
            DaoError::invalid_argument(format!(
                "Page {} of size {} starts beyond the addressable range",
                self.page, self.size
            ))
        };
        let first = self
            .page
            .checked_mul(self.size)
            .and_then(|offset| i64::try_from(offset).ok())
            .ok_or_else(out_of_range)?;
        let max = i64::try_from(self.size).map_err(|_| out_of_range())?;
        ResultWindow::new(first, max)
    }
}

/// One page of results plus the total row count it was cut from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    request: PageRequest,
    total_elements: u64,
}

impl<T> Page<T> {
    #[must_use]
    pub const fn new(content: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        Self {
            content,
            request,
            total_elements,
        }
    }

    /// The request this page answers, after any size cap was applied.
    #[must_use]
    pub const fn request(&self) -> PageRequest {
        self.request
    }

    #[must_use]
    pub const fn total_elements(&self) -> u64 {
        self.total_elements
    }

    /// Number of pages of this size needed for every row; zero when empty.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        match self.request.size {
            0 => 0,
            size => self.total_elements.div_ceil(size as u64),
        }
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        (self.request.page as u64).saturating_add(1) < self.total_pages()
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.request.page > 0
    }
}
