//! Fixed-size pagination over an in-memory list.

use serde::Serialize;

/// One page of a list plus the numbers a pager needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number, clamped into range.
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total: usize,
    /// 1-based index of the first item shown; 0 when empty.
    pub first: usize,
    /// 1-based index of the last item shown; 0 when empty.
    pub last: usize,
}

/// Cut page `page` (1-based) out of `items`.
///
/// Pages below 1 read as 1 and pages past the end clamp to the last page.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(page_size);
    let page = page.clamp(1, total_pages.max(1));

    let start = (page - 1) * page_size;
    let end = (start + page_size).min(total);
    let items = items.get(start..end).map(<[T]>::to_vec).unwrap_or_default();

    let (first, last) = if items.is_empty() {
        (0, 0)
    } else {
        (start + 1, end)
    };

    Page {
        items,
        page,
        page_size,
        total_pages,
        total,
        first,
        last,
    }
}
