//! Page slicing and the compact page-number control.

use std::fmt;

use serde::{Serialize, Serializer};

/// Page counts at or below this are listed in full, without ellipses.
const FULL_LIST_LIMIT: usize = 7;
/// Leading/trailing run length shown when the current page sits near an edge.
const EDGE_RUN: usize = 5;

/// One slot of the page-number control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageIndicator {
    Page(usize),
    Ellipsis,
}

impl PageIndicator {
    pub const ELLIPSIS_LABEL: &'static str = "…";

    pub fn page(self) -> Option<usize> {
        match self {
            PageIndicator::Page(page) => Some(page),
            PageIndicator::Ellipsis => None,
        }
    }
}

impl fmt::Display for PageIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageIndicator::Page(page) => write!(f, "{page}"),
            PageIndicator::Ellipsis => f.write_str(Self::ELLIPSIS_LABEL),
        }
    }
}

impl Serialize for PageIndicator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageIndicator::Page(page) => serializer.serialize_u64(*page as u64),
            PageIndicator::Ellipsis => serializer.serialize_str(Self::ELLIPSIS_LABEL),
        }
    }
}

/// Derived paging state handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationDescriptor {
    pub current_page: usize,
    pub total_pages: usize,
    pub indicators: Vec<PageIndicator>,
}

impl PaginationDescriptor {
    /// Build a descriptor for an already clamped page.
    pub fn new(current_page: usize, total_pages: usize) -> Self {
        Self {
            current_page,
            total_pages,
            indicators: plan(current_page, total_pages),
        }
    }

    pub fn previous_page(&self) -> Option<usize> {
        (self.current_page > 1).then(|| self.current_page - 1)
    }

    pub fn next_page(&self) -> Option<usize> {
        (self.current_page < self.total_pages).then(|| self.current_page + 1)
    }
}

/// Slice out the 1-based `page` of `items`.
///
/// Pages past the end yield an empty slice; page 0 is read as page 1.
pub fn paginate<T>(items: &[T], page_size: usize, page: usize) -> &[T] {
    if page_size == 0 {
        return &[];
    }
    let start = page.saturating_sub(1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Number of pages needed for `count` items, never less than one.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    count.div_ceil(page_size).max(1)
}

pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Compact page-number sequence for `current_page` out of `total_pages`.
///
/// At most seven numbers and two ellipses are produced; the first and last
/// pages are always present once ellipses appear.
pub fn plan(current_page: usize, total_pages: usize) -> Vec<PageIndicator> {
    use PageIndicator::{Ellipsis, Page};

    if total_pages <= FULL_LIST_LIMIT {
        return (1..=total_pages).map(Page).collect();
    }

    let mut indicators = Vec::with_capacity(FULL_LIST_LIMIT + 2);
    if current_page <= 4 {
        indicators.extend((1..=EDGE_RUN).map(Page));
        indicators.push(Ellipsis);
        indicators.push(Page(total_pages));
    } else if current_page >= total_pages - 3 {
        indicators.push(Page(1));
        indicators.push(Ellipsis);
        indicators.extend((total_pages + 1 - EDGE_RUN..=total_pages).map(Page));
    } else {
        indicators.push(Page(1));
        indicators.push(Ellipsis);
        indicators.extend((current_page - 1..=current_page + 1).map(Page));
        indicators.push(Ellipsis);
        indicators.push(Page(total_pages));
    }
    indicators
}
