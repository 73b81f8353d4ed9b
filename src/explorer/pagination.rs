use std::collections::HashMap;
use std::ops::Range;

use tracing::warn;

pub const PAGE_SIZE: usize = 50;

pub fn total_pages(item_count: usize) -> usize {
    item_count.div_ceil(PAGE_SIZE)
}

/// Item index range covered by `page` for a list of `item_count` items.
pub fn page_range(item_count: usize, page: usize) -> Range<usize> {
    let start = page.saturating_mul(PAGE_SIZE).min(item_count);
    let end = start.saturating_add(PAGE_SIZE).min(item_count);
    start..end
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaginationControls {
    pub current_page: usize,
    pub total_pages: usize,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

impl PaginationControls {
    /// Controls are only shown when there is more than one page.
    pub fn for_page(current_page: usize, total_pages: usize) -> Option<Self> {
        (total_pages > 1).then(|| Self {
            current_page,
            total_pages,
            prev_enabled: current_page > 0,
            next_enabled: current_page + 1 < total_pages,
        })
    }

    pub fn label(&self) -> String {
        format!("Page {} of {}", self.current_page + 1, self.total_pages)
    }
}

/// Zero-based page per category id, kept across collapse/expand.
#[derive(Clone, Debug, Default)]
pub struct PaginationState {
    pages: HashMap<String, usize>,
}

impl PaginationState {
    pub fn current(&self, category_id: &str) -> usize {
        self.pages.get(category_id).copied().unwrap_or(0)
    }

    /// Stores `page` clamped into `[0, total_pages - 1]` and returns the
    /// stored value.
    pub fn set(&mut self, category_id: &str, page: usize, item_count: usize) -> usize {
        let last = total_pages(item_count).saturating_sub(1);
        let clamped = page.min(last);
        if clamped != page {
            warn!(
                category = category_id,
                requested = page,
                clamped,
                "page request outside range"
            );
        }
        self.pages.insert(category_id.to_owned(), clamped);
        clamped
    }

    /// Current page for `category_id`, clamped against the present count.
    pub fn resolve(&self, category_id: &str, item_count: usize) -> usize {
        self.current(category_id)
            .min(total_pages(item_count).saturating_sub(1))
    }

    pub fn clear(&mut self) {
        self.pages.clear();
    }
}
