//! Fixed-size paging over a result list.

/// One page of results.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1-based page number actually served.
    pub page: usize,
    pub per_page: usize,
    /// Length of the full list.
    pub total: usize,
    pub page_count: usize,
    /// More items follow this page.
    pub has_more: bool,
}

/// Slice page `page` (1-based; 0 is read as 1) out of `items`.
///
/// A page past the end is empty. A `per_page` of 0 serves everything as
/// one page.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> Page<'_, T> {
    let total = items.len();
    let page = page.max(1);
    let per_page = if per_page == 0 { total.max(1) } else { per_page };
    let page_count = total.div_ceil(per_page).max(1);

    let start = (page - 1).saturating_mul(per_page).min(total);
    let end = start.saturating_add(per_page).min(total);

    Page {
        items: &items[start..end],
        page,
        per_page,
        total,
        page_count,
        has_more: end < total,
    }
}
