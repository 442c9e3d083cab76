use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::{
        StatusCode, Uri,
        header::{CACHE_CONTROL, CONTENT_TYPE},
    },
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use metrics::counter;
use serde::Deserialize;
use tracing::debug;

use crate::{
    application::{
        chrome::ChromeService,
        error::{ErrorReport, HttpError, PREVIEW_FAILURE_MESSAGE},
        feed::{self, FeedError, FeedService, ListOutcome, ListSurface},
        metadata,
        navigation::Location,
        preview::{METRIC_PREVIEW_FAILURE, METRIC_PREVIEW_RENDER, PreviewParams, PreviewService},
    },
    presentation::views::{
        LayoutChrome, LayoutContext, ListTemplate, PostTemplate, render_not_found_response,
        render_template_response,
    },
};

use super::{
    api,
    middleware::{log_responses, set_request_context},
};

#[derive(Clone)]
pub struct HttpState {
    pub feed: Arc<FeedService>,
    pub chrome: Arc<ChromeService>,
    pub preview: Arc<PreviewService>,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/page/{page}", get(home))
        .route("/blog", get(blog))
        .route("/blog/page/{page}", get(blog))
        .route("/blog/{slug}", get(post_detail))
        .route("/tags/{tag}", get(tag_list))
        .route("/tags/{tag}/page/{page}", get(tag_list))
        .route("/api/posts", get(api::list_posts))
        .route("/api/posts/page/{page}", get(api::list_posts))
        .route("/api/og", get(preview_card))
        .route("/_health", get(health))
        .fallback(fallback)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

#[derive(Debug, Deserialize)]
struct TagPath {
    tag: String,
}

async fn home(State(state): State<HttpState>, uri: Uri) -> Response {
    render_list(&state, ListSurface::Home, &uri).await
}

async fn blog(State(state): State<HttpState>, uri: Uri) -> Response {
    render_list(&state, ListSurface::Blog, &uri).await
}

async fn tag_list(
    State(state): State<HttpState>,
    Path(TagPath { tag }): Path<TagPath>,
    uri: Uri,
) -> Response {
    render_list(&state, ListSurface::Tag(tag), &uri).await
}

pub(super) fn request_location(uri: &Uri) -> Location {
    Location::new(uri.path(), uri.query().map(str::to_string))
}

async fn render_list(state: &HttpState, surface: ListSurface, uri: &Uri) -> Response {
    let chrome = state.chrome.for_path(uri.path());

    let list = match state.feed.resolve_list(surface, request_location(uri)).await {
        Ok(ListOutcome::View(list)) => list,
        Ok(ListOutcome::Redirect(target)) => {
            debug!(
                target = "quire::http::public",
                from = %uri,
                to = %target,
                "redirecting to canonical list location"
            );
            return Redirect::to(&target).into_response();
        }
        Err(err) => return feed_error_to_response(err, chrome),
    };

    let site = state.chrome.site();
    let (meta_heading, intro) = match list.surface {
        ListSurface::Home => (site.title.as_str(), Some(site.description.clone())),
        _ => (list.heading.as_str(), None),
    };
    let meta = metadata::list_meta(site, meta_heading, list.base_path());
    let meta = meta.with_canonical(site.absolute_url(&list.href()));

    let content = feed::build_list_context(&list, intro);
    let view = LayoutContext::new(chrome.with_meta(meta), content);
    render_template_response(ListTemplate { view }, StatusCode::OK)
}

async fn post_detail(State(state): State<HttpState>, Path(slug): Path<String>, uri: Uri) -> Response {
    let chrome = state.chrome.for_path(uri.path());

    match state.feed.post_detail(&slug).await {
        Ok(Some(post)) => {
            let meta = metadata::post_meta(state.chrome.site(), &post);
            let content = feed::build_post_context(post);
            let view = LayoutContext::new(chrome.with_meta(meta), content);
            render_template_response(PostTemplate { view }, StatusCode::OK)
        }
        Ok(None) => render_not_found_response(chrome),
        Err(err) => feed_error_to_response(err, chrome),
    }
}

async fn preview_card(
    State(state): State<HttpState>,
    params: Result<Query<PreviewParams>, QueryRejection>,
) -> Response {
    let result = match params {
        Ok(Query(params)) => state.preview.render(&params).map_err(HttpError::from),
        Err(rejection) => Err(HttpError::from_error(
            "infra::http::public::preview_card",
            StatusCode::INTERNAL_SERVER_ERROR,
            PREVIEW_FAILURE_MESSAGE,
            &rejection,
        )),
    };

    match result {
        Ok(svg) => {
            counter!(METRIC_PREVIEW_RENDER).increment(1);
            (
                [
                    (CONTENT_TYPE, "image/svg+xml; charset=utf-8"),
                    (CACHE_CONTROL, "public, max-age=86400"),
                ],
                svg,
            )
                .into_response()
        }
        Err(err) => {
            counter!(METRIC_PREVIEW_FAILURE).increment(1);
            err.into_response()
        }
    }
}

async fn health() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn fallback(State(state): State<HttpState>, uri: Uri) -> Response {
    render_not_found_response(state.chrome.for_path(uri.path()))
}

fn feed_error_to_response(err: FeedError, chrome: LayoutChrome) -> Response {
    match err {
        FeedError::UnknownTag(tag) => {
            let mut response = render_not_found_response(chrome);
            ErrorReport::from_message(
                "infra::http::feed_error_to_response",
                StatusCode::NOT_FOUND,
                format!("Unknown tag `{tag}`"),
            )
            .attach(&mut response);
            response
        }
        err => HttpError::from(err).into_response(),
    }
}
