use std::{
    io::{self, Write},
    process,
    sync::Arc,
    time::Duration,
};

use quire::{
    application::{
        chrome::ChromeService,
        error::AppError,
        feed::{FeedService, ListSurface, ResolvedList},
        listing::ListConfig,
        pagination::PageIndicator,
        preview::PreviewService,
        repos::PostsRepo,
        site::SiteProfile,
    },
    config,
    domain::{
        posts::format_human_date,
        slug::tag_slug,
        types::PageSize,
    },
    infra::{
        content::ContentStore,
        error::InfraError,
        http::{self, HttpState},
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_writer(io::stderr)
        .with_max_level(Level::ERROR)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::from(InfraError::configuration(err.to_string())))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::List(args) => run_list(settings, args).await,
    }
}

async fn load_content(settings: &config::Settings) -> Result<Arc<ContentStore>, AppError> {
    let store = ContentStore::load(&settings.content.posts_path).await?;
    if store.is_empty() {
        warn!(
            target = "quire::content",
            path = %settings.content.posts_path.display(),
            "content file has no posts"
        );
    }
    Ok(Arc::new(store))
}

fn build_http_state(store: Arc<ContentStore>, settings: &config::Settings) -> HttpState {
    let posts: Arc<dyn PostsRepo> = store;
    let site = SiteProfile::from(&settings.site);

    HttpState {
        feed: Arc::new(FeedService::new(posts)),
        chrome: Arc::new(ChromeService::new(site.clone())),
        preview: Arc::new(PreviewService::new(site)),
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let store = load_content(&settings).await?;
    let state = build_http_state(store, &settings);
    serve_http(&settings, state).await
}

async fn serve_http(settings: &config::Settings, state: HttpState) -> Result<(), AppError> {
    let router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "quire::serve",
        addr = %settings.server.addr,
        public_url = %settings.site.public_url,
        "listening"
    );

    let grace = settings.server.graceful_shutdown;
    let server = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal());

    let (drained_tx, drained_rx) = tokio::sync::oneshot::channel::<()>();
    let server = async move {
        let result = server.await;
        let _ = drained_tx.send(());
        result
    };
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => {
            result.map_err(|err| AppError::unexpected(format!("server error: {err}")))?;
        }
        _ = shutdown_deadline(drained_rx, grace) => {
            warn!(
                target = "quire::serve",
                seconds = grace.as_secs(),
                "graceful shutdown timed out; dropping open connections"
            );
        }
    }

    info!(target = "quire::serve", "server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(target = "quire::serve", error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!(target = "quire::serve", "shutdown signal received");
}

/// Resolves once shutdown has begun and `grace` elapsed without the server draining.
async fn shutdown_deadline(drained: tokio::sync::oneshot::Receiver<()>, grace: Duration) {
    shutdown_signal().await;
    if tokio::time::timeout(grace, drained).await.is_ok() {
        std::future::pending::<()>().await;
    }
}

async fn run_list(settings: config::Settings, args: config::ListArgs) -> Result<(), AppError> {
    let store = load_content(&settings).await?;
    let feed = FeedService::new(store);

    let page_size = match PageSize::from_value(args.page_size) {
        Some(size) => size,
        None => {
            warn!(
                target = "quire::list",
                requested = args.page_size,
                fallback = PageSize::default().get(),
                "unsupported page size"
            );
            PageSize::default()
        }
    };
    let list_config = ListConfig::default()
        .with_query(args.query.clone())
        .with_page_size(page_size)
        .with_page(args.page);

    let surface = match args.tag.as_deref() {
        Some(tag) => ListSurface::Tag(tag_slug(tag)),
        None => ListSurface::Blog,
    };

    let list = feed
        .list(surface, &list_config)
        .await
        .map_err(|err| AppError::validation(err.to_string()))?;

    let mut stdout = io::stdout().lock();
    write_listing(&mut stdout, &list).map_err(|err| AppError::from(InfraError::from(err)))?;
    Ok(())
}

fn write_listing(out: &mut impl Write, list: &ResolvedList) -> io::Result<()> {
    writeln!(out, "{}", list.heading)?;
    if !list.config.query.is_empty() {
        writeln!(out, "Search: {}", list.config.query)?;
    }
    writeln!(out)?;

    if list.is_empty() {
        writeln!(out, "No posts found.")?;
        return Ok(());
    }

    let first = list.visible_range().map_or(1, |(first, _)| first);
    for (offset, post) in list.posts.iter().enumerate() {
        writeln!(
            out,
            "{:>3}. {}  ({})",
            first + offset,
            post.title,
            format_human_date(post.date)
        )?;
        if !post.tags.is_empty() {
            writeln!(out, "     {}", post.tags.join(", "))?;
        }
        writeln!(out, "     /blog/{}", post.slug)?;
    }

    if list.show_pagination() {
        let pages: Vec<String> = list
            .pagination
            .indicators
            .iter()
            .map(|indicator| match indicator {
                PageIndicator::Page(page) if *page == list.pagination.current_page => {
                    format!("[{page}]")
                }
                other => other.to_string(),
            })
            .collect();
        writeln!(out)?;
        writeln!(out, "{}", pages.join(" "))?;
        writeln!(
            out,
            "Page {} of {}",
            list.pagination.current_page, list.pagination.total_pages
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire::domain::posts::Post;
    use time::{Duration, macros::date};

    fn feed(count: i64, tagged: bool) -> FeedService {
        let posts = (1..=count)
            .map(|n| Post {
                slug: format!("post-{n}"),
                title: format!("Post {n}"),
                summary: String::new(),
                tags: if tagged {
                    vec!["Solana".to_string()]
                } else {
                    Vec::new()
                },
                date: date!(2024 - 02 - 29) + Duration::days(n),
                images: Vec::new(),
                reading_time: None,
            })
            .collect();
        FeedService::new(Arc::new(ContentStore::new(posts)))
    }

    async fn render(feed: &FeedService, surface: ListSurface, config: ListConfig) -> String {
        let list = feed.list(surface, &config).await.expect("list");
        let mut out = Vec::new();
        write_listing(&mut out, &list).expect("write");
        String::from_utf8(out).expect("utf-8")
    }

    #[tokio::test]
    async fn listing_clamps_past_the_last_page() {
        let text = render(
            &feed(7, false),
            ListSurface::Blog,
            ListConfig::default().with_page(9),
        )
        .await;

        assert_eq!(
            text,
            "All Articles\n\
             \n  6. Post 2  (March 2, 2024)\n     /blog/post-2\n  \
             7. Post 1  (March 1, 2024)\n     /blog/post-1\n\
             \n1 [2]\nPage 2 of 2\n"
        );
    }

    #[tokio::test]
    async fn listing_reports_empty_searches() {
        let text = render(
            &feed(3, false),
            ListSurface::Blog,
            ListConfig::default().with_query("absent"),
        )
        .await;
        assert_eq!(text, "All Articles\nSearch: absent\n\nNo posts found.\n");
    }

    #[tokio::test]
    async fn listing_scopes_to_tag_label() {
        let text = render(
            &feed(2, true),
            ListSurface::Tag(tag_slug("Solana")),
            ListConfig::default(),
        )
        .await;
        assert!(text.starts_with("Solana\n"));
        assert!(text.contains("     Solana\n"));
        assert!(!text.contains("Page "));
    }
}
