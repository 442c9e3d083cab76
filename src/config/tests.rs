use super::*;

#[test]
fn defaults_resolve_without_any_source() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.server.addr.to_string(), "127.0.0.1:3000");
    assert_eq!(settings.server.graceful_shutdown, Duration::from_secs(30));
    assert_eq!(settings.logging.level, LevelFilter::INFO);
    assert!(matches!(settings.logging.format, LogFormat::Compact));
    assert_eq!(
        settings.content.posts_path,
        PathBuf::from("content/posts.toml")
    );
    assert_eq!(settings.site.title, "Quire");
    assert_eq!(settings.site.public_url.as_str(), "http://127.0.0.1:3000/");
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(4000);
    raw.logging.level = Some("info".to_string());

    let overrides = ServeOverrides {
        server_port: Some(4321),
        log_level: Some("debug".to_string()),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn content_path_can_be_overridden_for_listing() {
    let mut raw = RawSettings::default();
    raw.apply_content_override(&ContentOverride {
        posts_path: Some(PathBuf::from("/srv/posts.toml")),
    });
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.content.posts_path, PathBuf::from("/srv/posts.toml"));
}

#[test]
fn zero_port_is_rejected() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(0);
    let err = Settings::from_raw(raw).expect_err("zero port");
    assert!(matches!(err, LoadError::Invalid { key: "server.port", .. }));
}

#[test]
fn zero_graceful_shutdown_is_rejected() {
    let mut raw = RawSettings::default();
    raw.server.graceful_shutdown_seconds = Some(0);
    let err = Settings::from_raw(raw).expect_err("zero shutdown");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "server.graceful_shutdown_seconds",
            ..
        }
    ));
}

#[test]
fn unknown_log_level_is_rejected() {
    let mut raw = RawSettings::default();
    raw.logging.level = Some("loud".to_string());
    let err = Settings::from_raw(raw).expect_err("bad level");
    assert!(matches!(err, LoadError::Invalid { key: "logging.level", .. }));
}

#[test]
fn public_url_must_be_absolute_http() {
    for candidate in ["/relative", "ftp://example.com", "mailto:a@b.c"] {
        let mut raw = RawSettings::default();
        raw.site.public_url = Some(candidate.to_string());
        let err = Settings::from_raw(raw).expect_err(candidate);
        assert!(
            matches!(err, LoadError::Invalid { key: "site.public_url", .. }),
            "{candidate}"
        );
    }
}

#[test]
fn public_url_gains_trailing_slash() {
    let mut raw = RawSettings::default();
    raw.site.public_url = Some("https://example.com/journal".to_string());
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(
        settings.site.public_url.as_str(),
        "https://example.com/journal/"
    );
}

#[test]
fn blank_site_text_falls_back_to_defaults() {
    let mut raw = RawSettings::default();
    raw.site.title = Some("   ".to_string());
    raw.site.tagline = Some("Research".to_string());
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.site.title, "Quire");
    assert_eq!(settings.site.tagline, "Research");
}

#[test]
fn default_to_serve_command() {
    let args = CliArgs::parse_from(["quire"]);
    let command = args
        .command
        .unwrap_or(Command::Serve(Box::<ServeArgs>::default()));
    assert!(matches!(command, Command::Serve(_)));
}

#[test]
fn parse_list_arguments() {
    let args = CliArgs::parse_from([
        "quire",
        "list",
        "--query",
        "oracle",
        "--page",
        "2",
        "--page-size",
        "20",
        "--tag",
        "solana",
        "--content-posts-path",
        "posts.toml",
    ]);

    match args.command.expect("list command") {
        Command::List(list) => {
            assert_eq!(list.query, "oracle");
            assert_eq!(list.page, 2);
            assert_eq!(list.page_size, 20);
            assert_eq!(list.tag.as_deref(), Some("solana"));
            assert_eq!(list.content.posts_path, Some(PathBuf::from("posts.toml")));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn list_arguments_default_to_first_page() {
    let args = CliArgs::parse_from(["quire", "list"]);
    match args.command.expect("list command") {
        Command::List(list) => {
            assert!(list.query.is_empty());
            assert_eq!(list.page, 1);
            assert_eq!(list.page_size, 5);
            assert!(list.tag.is_none());
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parse_serve_overrides() {
    let args = CliArgs::parse_from([
        "quire",
        "serve",
        "--server-port",
        "8080",
        "--log-json",
        "yes",
        "--site-public-url",
        "https://quire.example",
    ]);

    match args.command.expect("serve command") {
        Command::Serve(serve) => {
            assert_eq!(serve.overrides.server_port, Some(8080));
            assert_eq!(serve.overrides.log_json, Some(true));
            assert_eq!(
                serve.overrides.site_public_url.as_deref(),
                Some("https://quire.example")
            );
        }
        other => panic!("unexpected command: {other:?}"),
    }
}
