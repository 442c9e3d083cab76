use crate::application::error::{ErrorReport, HttpError};
use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_not_found_response(chrome: LayoutChrome) -> Response {
    let content = ErrorPageView::not_found();
    let view = LayoutContext::new(chrome, content);
    let mut response = render_template_response(ErrorTemplate { view }, StatusCode::NOT_FOUND);
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "Resource not found",
    )
    .attach(&mut response);
    response
}

#[derive(Clone)]
pub struct NavigationView {
    pub entries: Vec<NavigationLinkView>,
}

#[derive(Clone)]
pub struct FooterView {
    pub copy: String,
}

#[derive(Clone)]
pub struct BrandView {
    pub title: String,
    pub href: String,
}

#[derive(Clone)]
pub struct NavigationLinkView {
    pub label: String,
    pub href: String,
    pub is_active: bool,
}

#[derive(Clone)]
pub struct LayoutChrome {
    pub brand: BrandView,
    pub navigation: NavigationView,
    pub footer: FooterView,
    pub meta: PageMetaView,
}

impl LayoutChrome {
    pub fn with_meta(self, meta: PageMetaView) -> Self {
        Self { meta, ..self }
    }

    /// Mark the navigation entry whose href prefixes `path` as active.
    pub fn with_active_path(mut self, path: &str) -> Self {
        for entry in &mut self.navigation.entries {
            entry.is_active = if entry.href == "/" {
                path == "/" || path.starts_with("/page/")
            } else {
                path == entry.href || path.starts_with(&format!("{}/", entry.href))
            };
        }
        self
    }
}

#[derive(Clone)]
pub struct LayoutContext<T> {
    pub brand: BrandView,
    pub navigation: NavigationView,
    pub footer: FooterView,
    pub meta: PageMetaView,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(chrome: LayoutChrome, content: T) -> Self {
        Self {
            brand: chrome.brand,
            navigation: chrome.navigation,
            footer: chrome.footer,
            meta: chrome.meta,
            content,
        }
    }
}

/// Head metadata: document title, description, canonical link, OpenGraph
/// and Twitter card fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageMetaView {
    pub title: String,
    pub description: String,
    pub canonical: String,
    pub og_type: &'static str,
    pub og_image: String,
    pub og_image_width: u32,
    pub og_image_height: u32,
    pub twitter_card: &'static str,
    pub published_time: Option<String>,
}

impl PageMetaView {
    pub fn with_canonical(self, canonical: String) -> Self {
        Self { canonical, ..self }
    }
}

#[derive(Clone, Debug)]
pub struct TagBadge {
    pub value: String,
    pub label: String,
    pub href: String,
}

#[derive(Clone, Debug)]
pub struct PostCard {
    pub slug: String,
    pub href: String,
    pub title: String,
    pub summary: String,
    pub iso_date: String,
    pub published: String,
    pub reading_time: Option<String>,
    pub badges: Vec<TagBadge>,
}

pub struct PageSizeOption {
    pub value: usize,
    pub selected: bool,
}

/// The search box and page-size selector, submitted as a plain GET form.
pub struct SearchFormView {
    pub action: String,
    pub query: String,
    pub query_param: &'static str,
    pub page_size_param: &'static str,
    pub options: Vec<PageSizeOption>,
    pub reset_href: Option<String>,
}

pub struct PageLinkView {
    pub label: String,
    pub href: Option<String>,
    pub is_current: bool,
    pub is_gap: bool,
}

pub struct PaginationView {
    pub current_page: usize,
    pub total_pages: usize,
    pub previous_href: Option<String>,
    pub next_href: Option<String>,
    pub links: Vec<PageLinkView>,
}

pub struct ListPageContext {
    pub heading: String,
    pub intro: Option<String>,
    pub posts: Vec<PostCard>,
    pub has_results: bool,
    pub matched: usize,
    pub total: usize,
    pub range_label: Option<String>,
    pub search: SearchFormView,
    pub pagination: Option<PaginationView>,
}

#[derive(Template)]
#[template(path = "list.html")]
pub struct ListTemplate {
    pub view: LayoutContext<ListPageContext>,
}

pub struct PostDetailContext {
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub published: String,
    pub iso_date: String,
    pub reading_time: Option<String>,
    pub tags: Vec<TagBadge>,
    pub images: Vec<String>,
    pub back_href: String,
}

#[derive(Template)]
#[template(path = "post.html")]
pub struct PostTemplate {
    pub view: LayoutContext<PostDetailContext>,
}

pub struct ErrorPageView {
    pub title: String,
    pub message: String,
    pub primary_action: Option<ErrorAction>,
}

impl ErrorPageView {
    pub fn not_found() -> Self {
        Self {
            title: "Page Not Found".to_string(),
            message: "The page you requested does not exist. Try returning to the homepage to continue exploring.".to_string(),
            primary_action: Some(ErrorAction::home()),
        }
    }
}

pub struct ErrorAction {
    pub href: String,
    pub label: String,
}

impl ErrorAction {
    pub fn home() -> Self {
        Self {
            href: "/".to_string(),
            label: "Back to home".to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: LayoutContext<ErrorPageView>,
}

/// One pre-wrapped line of text on the preview card.
#[derive(Debug)]
pub struct CardLine {
    pub y: u32,
    pub text: String,
}

#[derive(Debug)]
pub struct PreviewCardView {
    pub width: u32,
    pub height: u32,
    pub brand: String,
    pub tagline: String,
    pub title_font_size: u32,
    pub title_lines: Vec<CardLine>,
    pub summary_lines: Vec<CardLine>,
    pub image: Option<String>,
}

#[derive(Template)]
#[template(path = "og_card.svg", escape = "html")]
pub struct PreviewCardTemplate {
    pub card: PreviewCardView,
}

pub fn build_tag_badges<'a, T>(tags: T) -> Vec<TagBadge>
where
    T: IntoIterator<Item = (&'a str, &'a str)>,
{
    tags.into_iter()
        .map(|(value, name)| TagBadge {
            value: value.to_string(),
            label: name.to_string(),
            href: format!("/tags/{value}"),
        })
        .collect()
}
