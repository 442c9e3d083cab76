//! List-view controller shared by every list surface.
//!
//! [`render`] is a pure function of `(posts, config)`: it filters, clamps the
//! requested page against the recomputed page count, slices, and plans the
//! page-number control. It never writes the configuration back; callers that
//! want the location to follow a clamped page go through the navigation
//! binder.

use crate::application::matcher::SearchQuery;
use crate::application::pagination::{self, PaginationDescriptor};
use crate::domain::posts::Post;
use crate::domain::types::PageSize;

/// Query, page size and page of a list view.
///
/// `page` is 1-based. A stale `page` is tolerated here; the controller
/// clamps it on every render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListConfig {
    pub query: String,
    pub page_size: PageSize,
    pub page: usize,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            query: String::new(),
            page_size: PageSize::default(),
            page: 1,
        }
    }
}

impl ListConfig {
    pub fn with_query(self, query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..self
        }
    }

    pub fn with_page_size(self, page_size: PageSize) -> Self {
        Self { page_size, ..self }
    }

    pub fn with_page(self, page: usize) -> Self {
        Self {
            page: page.max(1),
            ..self
        }
    }
}

/// Render-ready result of one controller pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView<'a> {
    pub posts: Vec<&'a Post>,
    pub matched: usize,
    pub page_size: PageSize,
    pub pagination: PaginationDescriptor,
}

impl ListView<'_> {
    /// No post survived the filter ("no posts found", not "loading").
    pub fn is_empty(&self) -> bool {
        self.matched == 0
    }

    /// Whether the page-number control should be drawn at all.
    pub fn show_pagination(&self) -> bool {
        !self.is_empty() && self.pagination.total_pages > 1
    }

    pub fn current_page(&self) -> usize {
        self.pagination.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.pagination.total_pages
    }

    /// True when `config.page` had to be clamped to produce this view.
    pub fn was_clamped(&self, config: &ListConfig) -> bool {
        config.page != self.pagination.current_page
    }

    /// 1-based position of the first visible post within the filtered set.
    pub fn first_position(&self) -> usize {
        if self.posts.is_empty() {
            0
        } else {
            (self.current_page() - 1) * self.page_size.get() + 1
        }
    }
}

pub fn render<'a, I>(posts: I, config: &ListConfig) -> ListView<'a>
where
    I: IntoIterator<Item = &'a Post>,
{
    let query = SearchQuery::new(&config.query);
    let filtered: Vec<&'a Post> = posts
        .into_iter()
        .filter(|post| query.matches(post))
        .collect();

    let page_size = config.page_size.get();
    let total_pages = pagination::total_pages(filtered.len(), page_size);
    let current_page = pagination::clamp_page(config.page, total_pages);
    let visible = pagination::paginate(&filtered, page_size, current_page).to_vec();

    ListView {
        posts: visible,
        matched: filtered.len(),
        page_size: config.page_size,
        pagination: PaginationDescriptor::new(current_page, total_pages),
    }
}
