//! Pagination bookkeeping for list screens.
//!
//! The backend reports paging metadata in an envelope that is not always
//! present or self-consistent; [`PaginationEnvelope::reconcile`] turns
//! whatever arrived into an envelope the templates can trust.

use serde::{Deserialize, Serialize};

/// Paging metadata for one fetched page.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginationEnvelope {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationEnvelope {
    /// Builds a consistent envelope from page, limit and total.
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let page = page.max(1);
        let total_pages = if limit == 0 { 0 } else { total.div_ceil(limit) };
        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }

    /// Envelope used when the server did not send one.
    ///
    /// Only the current page is known, so there is never a next page. This is
    /// a degraded view of the result set, not a full count.
    pub fn synthesize(page: usize, limit: usize, records: usize) -> Self {
        let page = page.max(1);
        let total_pages = if limit == 0 { 0 } else { records.div_ceil(limit) };
        Self {
            page,
            limit,
            total: records,
            total_pages,
            has_next: false,
            has_prev: page > 1,
        }
    }

    /// Reconciles the server envelope (if any) with the requested page.
    ///
    /// Server flags are recomputed from `total` so that
    /// `has_next == (page < total_pages)` and `has_prev == (page > 1)` hold.
    pub fn reconcile(
        server: Option<WirePagination>,
        requested_page: usize,
        limit: usize,
        records: usize,
    ) -> Self {
        match server {
            Some(wire) => {
                let limit = wire.limit.filter(|l| *l > 0).unwrap_or(limit);
                let page = wire.page.filter(|p| *p > 0).unwrap_or(requested_page);
                let total = match (wire.total, wire.total_pages) {
                    (Some(total), _) => total,
                    // Without a total the page count is the best available bound.
                    (None, Some(pages)) => pages.saturating_mul(limit),
                    (None, None) => records,
                };
                Self::new(page, limit, total)
            }
            None => Self::synthesize(requested_page, limit, records),
        }
    }

    /// Compact list of page numbers to render, `None` marking an ellipsis.
    pub fn window(&self) -> Vec<Option<usize>> {
        get_pages(self.total_pages, self.page, 1, 1, 1, 1)
    }
}

/// Pagination object as the backend sends it. Every field is optional.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct WirePagination {
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub total: Option<usize>,
    #[serde(default, alias = "totalPages")]
    pub total_pages: Option<usize>,
}

fn get_pages(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let current_page = current_page.clamp(1, last_page);
    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = (current_page + right_current + 1).min(last_page + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// Page of display items together with everything the pager needs.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pages: Vec<Option<usize>>,
    pub page: usize,
    pub total: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, envelope: &PaginationEnvelope) -> Self {
        Self {
            items,
            pages: envelope.window(),
            page: envelope.page,
            total: envelope.total,
            has_next: envelope.has_next,
            has_prev: envelope.has_prev,
        }
    }
}
