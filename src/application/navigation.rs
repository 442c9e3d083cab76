//! Navigable-state binding for list views.
//!
//! The list configuration is mastered in the navigable location: the page
//! lives in a `/page/{n}` path segment below the surface's base path, the
//! query and page size in the `q` and `pageSize` parameters. Reading never
//! fails (anything malformed decodes to its default) and every write stores
//! one complete location, so `read(write(c)) == c` for any valid `c`.

use url::form_urlencoded;

use crate::application::listing::ListConfig;
use crate::domain::types::PageSize;

pub const QUERY_PARAM: &str = "q";
pub const PAGE_SIZE_PARAM: &str = "pageSize";
const PAGE_SEGMENT: &str = "page";

/// A navigable address: path plus optional raw query string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub path: String,
    pub query: Option<String>,
}

impl Location {
    pub fn new(path: impl Into<String>, query: Option<String>) -> Self {
        Self {
            path: path.into(),
            query: query.filter(|value| !value.is_empty()),
        }
    }

    /// Split an href such as `/blog/page/2?q=oracle` into path and query.
    /// Fragments are dropped.
    pub fn parse(href: &str) -> Self {
        let without_fragment = href.split('#').next().unwrap_or_default();
        match without_fragment.split_once('?') {
            Some((path, query)) => Self::new(path, Some(query.to_string())),
            None => Self::new(without_fragment, None),
        }
    }

    pub fn href(&self) -> String {
        match self.query.as_deref() {
            Some(query) => format!("{}?{query}", self.path),
            None => self.path.clone(),
        }
    }
}

/// Holder of the current navigable location.
pub trait LocationStore {
    fn read(&self) -> Location;
    fn write(&mut self, location: Location);
}

/// In-memory location holder; remembers every location written to it.
#[derive(Debug, Clone, Default)]
pub struct MemoryLocation {
    current: Location,
    history: Vec<Location>,
}

impl MemoryLocation {
    pub fn new(initial: Location) -> Self {
        Self {
            current: initial,
            history: Vec::new(),
        }
    }

    pub fn from_href(href: &str) -> Self {
        Self::new(Location::parse(href))
    }

    /// Locations written so far, oldest first.
    pub fn history(&self) -> &[Location] {
        &self.history
    }
}

impl LocationStore for MemoryLocation {
    fn read(&self) -> Location {
        self.current.clone()
    }

    fn write(&mut self, location: Location) {
        self.history.push(location.clone());
        self.current = location;
    }
}

/// Base path of a list surface, e.g. `/`, `/blog` or `/tags/solana`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRoute {
    base: String,
}

impl ListRoute {
    pub fn new(base: &str) -> Self {
        let trimmed = base.trim_end_matches('/');
        let base = if trimmed.is_empty() {
            "/".to_string()
        } else if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{trimmed}")
        };
        Self { base }
    }

    pub fn base_path(&self) -> &str {
        &self.base
    }

    pub fn page_path(&self, page: usize) -> String {
        if page <= 1 {
            return self.base.clone();
        }
        let prefix = if self.base == "/" { "" } else { self.base.as_str() };
        format!("{prefix}/{PAGE_SEGMENT}/{page}")
    }

    /// Decode a configuration from a location. Never fails.
    pub fn decode(&self, location: &Location) -> ListConfig {
        let mut config = ListConfig {
            page: self.page_from_path(&location.path).unwrap_or(1),
            ..ListConfig::default()
        };

        if let Some(raw) = location.query.as_deref() {
            for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
                match key.as_ref() {
                    QUERY_PARAM => config.query = value.into_owned(),
                    PAGE_SIZE_PARAM => {
                        config.page_size = value.parse().unwrap_or_default();
                    }
                    _ => {}
                }
            }
        }

        config
    }

    pub fn encode(&self, config: &ListConfig) -> Location {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if !config.query.is_empty() {
            serializer.append_pair(QUERY_PARAM, &config.query);
        }
        if !config.page_size.is_default() {
            serializer.append_pair(PAGE_SIZE_PARAM, &config.page_size.to_string());
        }
        let query = serializer.finish();

        Location::new(self.page_path(config.page), Some(query))
    }

    /// Whether `location` is exactly how `config` would be written.
    pub fn is_canonical(&self, location: &Location, config: &ListConfig) -> bool {
        self.encode(config) == *location
    }

    fn page_from_path(&self, path: &str) -> Option<usize> {
        let trimmed = path.trim_end_matches('/');
        let rest = if self.base == "/" {
            trimmed
        } else {
            trimmed.strip_prefix(self.base.as_str())?
        };
        let raw = rest
            .strip_prefix('/')?
            .strip_prefix(PAGE_SEGMENT)?
            .strip_prefix('/')?;
        raw.parse::<usize>().ok().filter(|page| *page >= 1)
    }
}

/// Reads and writes list configuration through a [`LocationStore`].
#[derive(Debug, Clone)]
pub struct NavigationBinder<S> {
    route: ListRoute,
    store: S,
}

impl<S: LocationStore> NavigationBinder<S> {
    pub fn new(route: ListRoute, store: S) -> Self {
        Self { route, store }
    }

    pub fn route(&self) -> &ListRoute {
        &self.route
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn location(&self) -> Location {
        self.store.read()
    }

    pub fn config(&self) -> ListConfig {
        self.route.decode(&self.store.read())
    }

    /// Whether the current location is already in canonical form.
    pub fn is_canonical(&self) -> bool {
        let location = self.store.read();
        self.route
            .is_canonical(&location, &self.route.decode(&location))
    }

    pub fn href_for(&self, config: &ListConfig) -> String {
        self.route.encode(config).href()
    }

    /// Change the query; a different query starts again at page 1.
    pub fn set_query(&mut self, query: &str) -> bool {
        self.update(|config| config.query = query.to_string())
    }

    /// Move to `page`. Page 0 is rejected.
    pub fn set_page(&mut self, page: usize) -> bool {
        if page == 0 {
            return false;
        }
        self.update(|config| config.page = page)
    }

    /// Change the page size; values outside 5/10/20/50 are rejected.
    pub fn set_page_size(&mut self, value: u64) -> bool {
        match PageSize::from_value(value) {
            Some(page_size) => self.update(|config| config.page_size = page_size),
            None => false,
        }
    }

    /// Apply several changes as a single location write.
    ///
    /// A changed query or page size forces page 1 regardless of the page the
    /// closure asked for. Returns `false` (and writes nothing) when the
    /// configuration is unchanged.
    pub fn update<F>(&mut self, change: F) -> bool
    where
        F: FnOnce(&mut ListConfig),
    {
        let current = self.config();
        let mut next = current.clone();
        change(&mut next);
        next.page = next.page.max(1);

        if next.query != current.query || next.page_size != current.page_size {
            next.page = 1;
        }
        if next == current {
            return false;
        }

        self.store.write(self.route.encode(&next));
        true
    }

    /// Rewrite the location into canonical form without changing the
    /// configuration it decodes to.
    pub fn canonicalize(&mut self) -> bool {
        if self.is_canonical() {
            return false;
        }
        let config = self.config();
        self.store.write(self.route.encode(&config));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binder(href: &str) -> NavigationBinder<MemoryLocation> {
        NavigationBinder::new(ListRoute::new("/blog"), MemoryLocation::from_href(href))
    }

    #[test]
    fn defaults_when_location_is_bare() {
        let binder = binder("/blog");
        assert_eq!(binder.config(), ListConfig::default());
        assert!(binder.is_canonical());
    }

    #[test]
    fn reads_segment_and_parameters() {
        let binder = binder("/blog/page/3?q=solana+oracle&pageSize=20");
        let config = binder.config();
        assert_eq!(config.page, 3);
        assert_eq!(config.query, "solana oracle");
        assert_eq!(config.page_size, PageSize::Twenty);
    }

    #[test]
    fn malformed_values_fall_back_to_defaults() {
        for href in [
            "/blog/page/abc",
            "/blog/page/0",
            "/blog/page/-2",
            "/blog/page/99999999999999999999999",
            "/blog/page/?pageSize=7",
            "/blog?pageSize=ten",
            "/blog?pageSize=",
            "/blog?utm_source=x",
        ] {
            let config = binder(href).config();
            assert_eq!(config.page, 1, "{href}");
            assert_eq!(config.page_size, PageSize::Five, "{href}");
        }
    }

    #[test]
    fn set_page_size_resets_page() {
        let mut binder = binder("/blog/page/4");
        assert!(binder.set_page_size(20));

        let config = binder.config();
        assert_eq!(config.page_size, PageSize::Twenty);
        assert_eq!(config.page, 1);
        assert_eq!(binder.location().href(), "/blog?pageSize=20");
    }

    #[test]
    fn invalid_page_size_is_a_no_op() {
        let mut binder = binder("/blog/page/2?pageSize=10");
        assert!(!binder.set_page_size(7));
        assert!(!binder.set_page_size(0));
        assert!(binder.store().history().is_empty());
        assert_eq!(binder.config().page, 2);
        assert_eq!(binder.config().page_size, PageSize::Ten);
    }

    #[test]
    fn set_query_resets_page_only_when_changed() {
        let mut binder = binder("/blog/page/2?q=oracle");
        assert!(!binder.set_query("oracle"));
        assert_eq!(binder.config().page, 2);

        assert!(binder.set_query("voting"));
        assert_eq!(binder.config().page, 1);
        assert_eq!(binder.location().href(), "/blog?q=voting");
    }

    #[test]
    fn set_page_keeps_query_and_size() {
        let mut binder = binder("/blog?q=defi&pageSize=10");
        assert!(binder.set_page(3));
        assert_eq!(binder.location().href(), "/blog/page/3?q=defi&pageSize=10");
        assert!(!binder.set_page(0));
        assert_eq!(binder.config().page, 3);
    }

    #[test]
    fn size_then_page_leaves_no_inconsistent_location() {
        let mut binder = binder("/blog/page/5");
        binder.set_page_size(10);
        binder.set_page(2);

        let history: Vec<String> = binder
            .store()
            .history()
            .iter()
            .map(Location::href)
            .collect();
        assert_eq!(history, ["/blog?pageSize=10", "/blog/page/2?pageSize=10"]);
    }

    #[test]
    fn update_writes_once() {
        let mut binder = binder("/blog/page/5");
        assert!(binder.update(|config| {
            config.page_size = PageSize::Fifty;
            config.query = "dispute".to_string();
            config.page = 9;
        }));

        assert_eq!(binder.store().history().len(), 1);
        let config = binder.config();
        assert_eq!(config.page, 1);
        assert_eq!(config.query, "dispute");
        assert_eq!(config.page_size, PageSize::Fifty);
    }

    #[test]
    fn round_trip_reproduces_config() {
        let route = ListRoute::new("/tags/solana");
        for query in ["", "oracle", "a&b=c", "ünïcödé words", "100% sure?"] {
            for page_size in PageSize::ALL {
                for page in [1, 2, 7, 130] {
                    let config = ListConfig {
                        query: query.to_string(),
                        page_size,
                        page,
                    };
                    let href = route.encode(&config).href();
                    assert_eq!(route.decode(&Location::parse(&href)), config, "{href}");
                }
            }
        }
    }

    #[test]
    fn root_route_uses_bare_page_segment() {
        let route = ListRoute::new("/");
        let config = ListConfig::default().with_page(4);
        assert_eq!(route.encode(&config).href(), "/page/4");
        assert_eq!(route.decode(&Location::parse("/page/4")).page, 4);
        assert_eq!(route.encode(&ListConfig::default()).href(), "/");
    }

    #[test]
    fn canonicalize_drops_noise() {
        let mut binder = binder("/blog/page/1/?pageSize=5&utm=x");
        assert!(!binder.is_canonical());
        assert!(binder.canonicalize());
        assert_eq!(binder.location().href(), "/blog");
        assert!(!binder.canonicalize());
    }

    #[test]
    fn route_normalizes_base() {
        assert_eq!(ListRoute::new("blog/").base_path(), "/blog");
        assert_eq!(ListRoute::new("").base_path(), "/");
        assert_eq!(ListRoute::new("/").page_path(2), "/page/2");
    }
}
