//! Pagination arithmetic
//!
//! All functions are pure over `(page_index, total_rows, page_size)`.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Allowed page sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct PageSize(usize);

impl PageSize {
    pub const OPTIONS: [PageSize; 5] = [
        PageSize(10),
        PageSize(20),
        PageSize(30),
        PageSize(40),
        PageSize(50),
    ];

    pub fn new(size: usize) -> Result<Self, CoreError> {
        Self::OPTIONS
            .iter()
            .copied()
            .find(|p| p.0 == size)
            .ok_or(CoreError::InvalidPageSize { size })
    }

    pub fn get(&self) -> usize {
        self.0
    }

    /// Next option, wrapping to the smallest
    pub fn next_option(&self) -> PageSize {
        Self::OPTIONS
            .iter()
            .copied()
            .find(|p| p.0 > self.0)
            .unwrap_or(Self::OPTIONS[0])
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize(10)
    }
}

impl TryFrom<usize> for PageSize {
    type Error = CoreError;

    fn try_from(size: usize) -> Result<Self, Self::Error> {
        Self::new(size)
    }
}

impl From<PageSize> for usize {
    fn from(size: PageSize) -> Self {
        size.0
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number of pages; an empty result still has one (empty) page
pub fn page_count(total_rows: usize, page_size: PageSize) -> usize {
    total_rows.div_ceil(page_size.get()).max(1)
}

/// Clamp an index to the last valid page
pub fn clamp_page(page_index: usize, total_rows: usize, page_size: PageSize) -> usize {
    page_index.min(page_count(total_rows, page_size) - 1)
}

pub fn can_next(page_index: usize, total_rows: usize, page_size: PageSize) -> bool {
    page_index + 1 < page_count(total_rows, page_size)
}

pub fn can_previous(page_index: usize) -> bool {
    page_index > 0
}

/// Next page index; no-op on the last page
pub fn next_page(page_index: usize, total_rows: usize, page_size: PageSize) -> usize {
    if can_next(page_index, total_rows, page_size) {
        page_index + 1
    } else {
        clamp_page(page_index, total_rows, page_size)
    }
}

/// Previous page index; no-op on page 0
pub fn previous_page(page_index: usize) -> usize {
    page_index.saturating_sub(1)
}

/// Page index after switching page size
///
/// Keeps the first row of the current page visible, then clamps to the last
/// valid page of the new page count.
pub fn resize_page(
    page_index: usize,
    total_rows: usize,
    old_size: PageSize,
    new_size: PageSize,
) -> usize {
    let first_row = page_index * old_size.get();
    clamp_page(first_row / new_size.get(), total_rows, new_size)
}

/// Half-open row range `[start, end)` of a page
pub fn page_bounds(page_index: usize, total_rows: usize, page_size: PageSize) -> (usize, usize) {
    let start = (page_index * page_size.get()).min(total_rows);
    let end = (start + page_size.get()).min(total_rows);
    (start, end)
}

/// Pagination footer data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationSummary {
    pub page_index: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub total_rows: usize,
    /// 1-based first row on the page (0 when empty)
    pub first_row: usize,
    /// 1-based last row on the page (0 when empty)
    pub last_row: usize,
    pub can_previous: bool,
    pub can_next: bool,
}

impl PaginationSummary {
    pub fn new(page_index: usize, total_rows: usize, page_size: PageSize) -> Self {
        let (start, end) = page_bounds(page_index, total_rows, page_size);
        Self {
            page_index,
            page_count: page_count(total_rows, page_size),
            page_size: page_size.get(),
            total_rows,
            first_row: if end > start { start + 1 } else { 0 },
            last_row: end,
            can_previous: can_previous(page_index),
            can_next: can_next(page_index, total_rows, page_size),
        }
    }
}

impl fmt::Display for PaginationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "第 {} / {} 页 · {}-{} / 共 {} 条",
            self.page_index + 1,
            self.page_count,
            self.first_row,
            self.last_row,
            self.total_rows
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> PageSize {
        PageSize::new(n).unwrap()
    }

    #[test]
    fn test_page_size_options() {
        assert!(PageSize::new(25).is_err());
        assert_eq!(size(50).next_option(), size(10));
        assert_eq!(size(20).next_option(), size(30));
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(25, size(10)), 3);
        assert_eq!(page_count(30, size(10)), 3);
        assert_eq!(page_count(31, size(10)), 4);
        assert_eq!(page_count(0, size(10)), 1);
    }

    #[test]
    fn test_next_page_noop_only_at_last_page() {
        let p = size(10);
        assert_eq!(next_page(0, 25, p), 1);
        assert_eq!(next_page(1, 25, p), 2);
        // Index 2 is the last page of 3
        assert_eq!(next_page(2, 25, p), 2);
        assert!(!can_next(2, 25, p));
    }

    #[test]
    fn test_previous_page_noop_at_zero() {
        assert_eq!(previous_page(0), 0);
        assert_eq!(previous_page(2), 1);
    }

    #[test]
    fn test_resize_clamps_to_last_valid_page() {
        // 45 rows, size 10, on page 4 (rows 41-45) -> size 50 has 1 page
        assert_eq!(resize_page(4, 45, size(10), size(50)), 0);
        // 45 rows, size 10, page 3 (rows 31-40) -> size 20 keeps row 31 on page 1
        assert_eq!(resize_page(3, 45, size(10), size(20)), 1);
        // Shrinking page size moves deeper, still in bounds
        assert_eq!(resize_page(1, 45, size(20), size(10)), 2);
    }

    #[test]
    fn test_resize_never_past_last_page_exhaustive() {
        for total in 0..120 {
            for old in PageSize::OPTIONS {
                for new in PageSize::OPTIONS {
                    for idx in 0..page_count(total, old) {
                        let resized = resize_page(idx, total, old, new);
                        assert!(resized < page_count(total, new));
                    }
                }
            }
        }
    }

    #[test]
    fn test_summary() {
        let summary = PaginationSummary::new(2, 25, size(10));
        assert_eq!(summary.first_row, 21);
        assert_eq!(summary.last_row, 25);
        assert_eq!(summary.page_count, 3);
        assert!(summary.can_previous);
        assert!(!summary.can_next);

        let empty = PaginationSummary::new(0, 0, size(10));
        assert_eq!(empty.first_row, 0);
        assert_eq!(empty.last_row, 0);
    }
}
