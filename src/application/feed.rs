use std::sync::Arc;

use metrics::counter;
use thiserror::Error;
use tracing::debug;

use crate::application::listing::{self, ListConfig};
use crate::application::navigation::{
    ListRoute, Location, MemoryLocation, NavigationBinder, PAGE_SIZE_PARAM,
    QUERY_PARAM,
};
use crate::application::pagination::{PageIndicator, PaginationDescriptor};
use crate::application::repos::{PostsRepo, RepoError};
use crate::domain::posts::{self, Post};
use crate::domain::slug::tag_slug;
use crate::domain::types::PageSize;
use crate::presentation::views::{
    ListPageContext, PageLinkView, PageSizeOption, PaginationView, PostCard, PostDetailContext,
    SearchFormView, TagBadge, build_tag_badges,
};

pub const METRIC_LIST_RENDER: &str = "quire_list_render_total";
pub const METRIC_LIST_CLAMPED: &str = "quire_list_clamped_total";

/// A list-rendering surface of the site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListSurface {
    Home,
    Blog,
    /// Posts carrying the tag whose slug is held here.
    Tag(String),
    Api,
}

impl ListSurface {
    pub fn route(&self) -> ListRoute {
        match self {
            ListSurface::Home => ListRoute::new("/"),
            ListSurface::Blog => ListRoute::new("/blog"),
            ListSurface::Tag(slug) => ListRoute::new(&format!("/tags/{slug}")),
            ListSurface::Api => ListRoute::new("/api/posts"),
        }
    }

    pub fn metric_label(&self) -> &'static str {
        match self {
            ListSurface::Home => "home",
            ListSurface::Blog => "blog",
            ListSurface::Tag(_) => "tag",
            ListSurface::Api => "api",
        }
    }

    fn default_heading(&self) -> &'static str {
        match self {
            ListSurface::Home => "Latest Articles",
            ListSurface::Blog | ListSurface::Api => "All Articles",
            ListSurface::Tag(_) => "Tagged",
        }
    }
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("unknown tag `{0}`")]
    UnknownTag(String),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Result of resolving a request location against a list surface.
pub enum ListOutcome {
    View(Box<ResolvedList>),
    /// The location was not canonical; the corrected href.
    Redirect(String),
}

/// One rendered list, with links derived through the navigation binder.
#[derive(Debug, Clone)]
pub struct ResolvedList {
    pub surface: ListSurface,
    pub heading: String,
    pub config: ListConfig,
    pub posts: Vec<Post>,
    pub matched: usize,
    pub total: usize,
    pub pagination: PaginationDescriptor,
    binder: NavigationBinder<MemoryLocation>,
    relocated: bool,
}

impl ResolvedList {
    pub fn is_empty(&self) -> bool {
        self.matched == 0
    }

    pub fn show_pagination(&self) -> bool {
        !self.is_empty() && self.pagination.total_pages > 1
    }

    pub fn href(&self) -> String {
        self.binder.location().href()
    }

    pub fn base_path(&self) -> &str {
        self.binder.route().base_path()
    }

    pub fn page_href(&self, page: usize) -> String {
        self.binder.href_for(&self.config.clone().with_page(page))
    }

    /// Link back to the unfiltered list, when a query is active.
    pub fn reset_href(&self) -> Option<String> {
        if self.config.query.is_empty() {
            return None;
        }
        let mut binder = self.binder.clone();
        binder.set_query("");
        Some(binder.location().href())
    }

    /// 1-based positions of the first and last visible post.
    pub fn visible_range(&self) -> Option<(usize, usize)> {
        if self.posts.is_empty() {
            return None;
        }
        let first = (self.pagination.current_page - 1) * self.config.page_size.get() + 1;
        Some((first, first + self.posts.len() - 1))
    }
}

#[derive(Clone)]
pub struct FeedService {
    posts: Arc<dyn PostsRepo>,
}

impl FeedService {
    pub fn new(posts: Arc<dyn PostsRepo>) -> Self {
        Self { posts }
    }

    /// Render the list a request location asks for, or the canonical
    /// location to redirect to when the request is stale or malformed.
    pub async fn resolve_list(
        &self,
        surface: ListSurface,
        location: Location,
    ) -> Result<ListOutcome, FeedError> {
        let list = self.resolve(surface, location).await?;
        if list.relocated {
            Ok(ListOutcome::Redirect(list.href()))
        } else {
            Ok(ListOutcome::View(Box::new(list)))
        }
    }

    /// Render `config` directly, clamping the page instead of redirecting.
    pub async fn list(
        &self,
        surface: ListSurface,
        config: &ListConfig,
    ) -> Result<ResolvedList, FeedError> {
        let location = surface.route().encode(config);
        self.resolve(surface, location).await
    }

    pub async fn post_detail(&self, slug: &str) -> Result<Option<Post>, FeedError> {
        Ok(self.posts.find_by_slug(slug).await?)
    }

    async fn resolve(
        &self,
        surface: ListSurface,
        location: Location,
    ) -> Result<ResolvedList, FeedError> {
        let posts = self.posts.list_posts().await?;
        let (heading, scoped) = scope_posts(&posts, &surface)?;

        let mut binder = NavigationBinder::new(surface.route(), MemoryLocation::new(location));
        let requested = binder.config();
        let view = listing::render(scoped.iter().copied(), &requested);
        counter!(METRIC_LIST_RENDER, "surface" => surface.metric_label()).increment(1);

        if view.was_clamped(&requested) {
            counter!(METRIC_LIST_CLAMPED, "surface" => surface.metric_label()).increment(1);
            binder.set_page(view.current_page());
        }
        binder.canonicalize();
        let relocated = !binder.store().history().is_empty();

        debug!(
            target = "quire::application::feed",
            surface = surface.metric_label(),
            query = %requested.query,
            page_size = requested.page_size.get(),
            requested_page = requested.page,
            current_page = view.current_page(),
            total_pages = view.total_pages(),
            matched = view.matched,
            relocated,
            "list resolved"
        );

        Ok(ResolvedList {
            heading,
            config: binder.config(),
            posts: view.posts.iter().map(|post| (*post).clone()).collect(),
            matched: view.matched,
            total: scoped.len(),
            pagination: view.pagination,
            binder,
            relocated,
            surface,
        })
    }
}

fn scope_posts<'a>(
    posts: &'a [Post],
    surface: &ListSurface,
) -> Result<(String, Vec<&'a Post>), FeedError> {
    match surface {
        ListSurface::Tag(slug) => {
            let scoped: Vec<&Post> = posts.iter().filter(|post| post.has_tag(slug)).collect();
            let label = scoped
                .first()
                .and_then(|post| post.tag_label(slug))
                .ok_or_else(|| FeedError::UnknownTag(slug.clone()))?;
            Ok((label.to_string(), scoped))
        }
        _ => Ok((surface.default_heading().to_string(), posts.iter().collect())),
    }
}

pub fn build_list_context(list: &ResolvedList, intro: Option<String>) -> ListPageContext {
    let posts = list
        .posts
        .iter()
        .map(post_card)
        .collect::<Vec<_>>();

    let range_label = list
        .visible_range()
        .map(|(first, last)| format!("Showing {first}-{last} of {}", list.matched));

    let options = PageSize::ALL
        .iter()
        .map(|size| PageSizeOption {
            value: size.get(),
            selected: *size == list.config.page_size,
        })
        .collect();

    let search = SearchFormView {
        action: list.base_path().to_string(),
        query: list.config.query.clone(),
        query_param: QUERY_PARAM,
        page_size_param: PAGE_SIZE_PARAM,
        options,
        reset_href: list.reset_href(),
    };

    let pagination = list.show_pagination().then(|| build_pagination_view(list));

    ListPageContext {
        heading: list.heading.clone(),
        intro,
        has_results: !list.is_empty(),
        posts,
        matched: list.matched,
        total: list.total,
        range_label,
        search,
        pagination,
    }
}

fn build_pagination_view(list: &ResolvedList) -> PaginationView {
    let descriptor = &list.pagination;
    let links = descriptor
        .indicators
        .iter()
        .map(|indicator| match indicator {
            PageIndicator::Page(page) => PageLinkView {
                label: page.to_string(),
                href: Some(list.page_href(*page)),
                is_current: *page == descriptor.current_page,
                is_gap: false,
            },
            PageIndicator::Ellipsis => PageLinkView {
                label: PageIndicator::ELLIPSIS_LABEL.to_string(),
                href: None,
                is_current: false,
                is_gap: true,
            },
        })
        .collect();

    PaginationView {
        current_page: descriptor.current_page,
        total_pages: descriptor.total_pages,
        previous_href: descriptor.previous_page().map(|page| list.page_href(page)),
        next_href: descriptor.next_page().map(|page| list.page_href(page)),
        links,
    }
}

pub fn post_card(post: &Post) -> PostCard {
    PostCard {
        slug: post.slug.clone(),
        href: format!("/blog/{}", post.slug),
        title: post.title.clone(),
        summary: post.summary.clone(),
        iso_date: posts::format_iso_date(post.date),
        published: posts::format_human_date(post.date),
        reading_time: post.reading_time.clone(),
        badges: tag_badges(post),
    }
}

pub fn build_post_context(post: Post) -> PostDetailContext {
    PostDetailContext {
        tags: tag_badges(&post),
        published: posts::format_human_date(post.date),
        iso_date: posts::format_iso_date(post.date),
        back_href: "/blog".to_string(),
        slug: post.slug,
        title: post.title,
        summary: post.summary,
        reading_time: post.reading_time,
        images: post.images,
    }
}

fn tag_badges(post: &Post) -> Vec<TagBadge> {
    let slugs: Vec<String> = post.tags.iter().map(|tag| tag_slug(tag)).collect();
    build_tag_badges(
        slugs
            .iter()
            .zip(post.tags.iter())
            .map(|(slug, tag)| (slug.as_str(), tag.as_str())),
    )
}
