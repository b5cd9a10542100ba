//! Stateless page windowing over a conversation.

use std::num::NonZeroUsize;

use serde::Serialize;

/// A bounded window of items plus page-count metadata. Pages are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// Number of pages needed for `len` items. An empty list still has one page.
pub fn total_pages(len: usize, page_size: NonZeroUsize) -> usize {
    len.div_ceil(page_size.get()).max(1)
}

/// Select page `requested` of `items`.
///
/// Out-of-range requests (zero, negative, or past the end) are clamped into
/// `[1, total_pages]` rather than rejected.
pub fn paginate<T: Clone>(items: &[T], page_size: NonZeroUsize, requested: i64) -> Page<T> {
    let total_pages = total_pages(items.len(), page_size);
    let current_page = clamp_page(requested, total_pages);

    let size = page_size.get();
    let start = (current_page - 1).saturating_mul(size).min(items.len());
    let end = start.saturating_add(size).min(items.len());

    Page {
        items: items[start..end].to_vec(),
        current_page,
        total_pages,
        total_items: items.len(),
    }
}

/// Everything as a single page, for sessions without pagination.
pub fn single_page<T: Clone>(items: &[T]) -> Page<T> {
    Page {
        items: items.to_vec(),
        current_page: 1,
        total_pages: 1,
        total_items: items.len(),
    }
}

fn clamp_page(requested: i64, total_pages: usize) -> usize {
    if requested < 1 {
        return 1;
    }
    usize::try_from(requested)
        .unwrap_or(usize::MAX)
        .min(total_pages)
}
