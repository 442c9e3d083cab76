//! JSON rendering of the article list.

use axum::{
    Json,
    extract::State,
    http::Uri,
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;

use crate::{
    application::{
        error::HttpError,
        feed::{ListOutcome, ListSurface, ResolvedList},
        pagination::PaginationDescriptor,
    },
    domain::{
        posts::{Post, format_iso_date},
        types::PageSize,
    },
};

use super::public::{HttpState, request_location};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub query: String,
    pub page_size: PageSize,
    pub matched: usize,
    pub total: usize,
    pub pagination: PaginationDescriptor,
    pub links: ListLinks,
    pub posts: Vec<PostSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLinks {
    #[serde(rename = "self")]
    pub current: String,
    pub previous: Option<String>,
    pub next: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub tags: Vec<String>,
    pub date: String,
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading_time: Option<String>,
    pub url: String,
}

impl From<&Post> for PostSummary {
    fn from(post: &Post) -> Self {
        Self {
            slug: post.slug.clone(),
            title: post.title.clone(),
            summary: post.summary.clone(),
            tags: post.tags.clone(),
            date: format_iso_date(post.date),
            images: post.images.clone(),
            reading_time: post.reading_time.clone(),
            url: format!("/blog/{}", post.slug),
        }
    }
}

impl From<&ResolvedList> for ListResponse {
    fn from(list: &ResolvedList) -> Self {
        let links = ListLinks {
            current: list.href(),
            previous: list
                .pagination
                .previous_page()
                .map(|page| list.page_href(page)),
            next: list.pagination.next_page().map(|page| list.page_href(page)),
        };

        Self {
            query: list.config.query.clone(),
            page_size: list.config.page_size,
            matched: list.matched,
            total: list.total,
            pagination: list.pagination.clone(),
            links,
            posts: list.posts.iter().map(PostSummary::from).collect(),
        }
    }
}

pub(super) async fn list_posts(State(state): State<HttpState>, uri: Uri) -> Response {
    match state
        .feed
        .resolve_list(ListSurface::Api, request_location(&uri))
        .await
    {
        Ok(ListOutcome::View(list)) => Json(ListResponse::from(list.as_ref())).into_response(),
        Ok(ListOutcome::Redirect(target)) => Redirect::to(&target).into_response(),
        Err(err) => HttpError::from(err).into_response(),
    }
}
