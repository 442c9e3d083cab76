use crate::application::metadata;
use crate::application::site::SiteProfile;
use crate::presentation::views::{
    BrandView, FooterView, LayoutChrome, NavigationLinkView, NavigationView,
};

const NAVIGATION: [(&str, &str); 2] = [("Home", "/"), ("Articles", "/blog")];

/// Builds the layout chrome shared by every HTML page.
#[derive(Clone)]
pub struct ChromeService {
    site: SiteProfile,
}

impl ChromeService {
    pub fn new(site: SiteProfile) -> Self {
        Self { site }
    }

    pub fn site(&self) -> &SiteProfile {
        &self.site
    }

    pub fn load(&self) -> LayoutChrome {
        let entries = NAVIGATION
            .iter()
            .map(|(label, href)| NavigationLinkView {
                label: label.to_string(),
                href: href.to_string(),
                is_active: false,
            })
            .collect();

        LayoutChrome {
            brand: BrandView {
                title: self.site.title.clone(),
                href: "/".to_string(),
            },
            navigation: NavigationView { entries },
            footer: FooterView {
                copy: format!("© {}", self.site.title),
            },
            meta: metadata::site_meta(&self.site),
        }
    }

    /// Chrome for a page at `path`, with the matching navigation entry marked.
    pub fn for_path(&self, path: &str) -> LayoutChrome {
        self.load().with_active_path(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn service() -> ChromeService {
        ChromeService::new(SiteProfile {
            title: "Quire".to_string(),
            description: "Notes on markets".to_string(),
            public_url: Url::parse("https://quire.example/").expect("url"),
            tagline: "Research".to_string(),
        })
    }

    fn active(chrome: &LayoutChrome) -> Vec<&str> {
        chrome
            .navigation
            .entries
            .iter()
            .filter(|entry| entry.is_active)
            .map(|entry| entry.label.as_str())
            .collect()
    }

    #[test]
    fn marks_home_for_root_pages() {
        let service = service();
        assert_eq!(active(&service.for_path("/")), ["Home"]);
        assert_eq!(active(&service.for_path("/page/3")), ["Home"]);
    }

    #[test]
    fn marks_articles_for_blog_pages() {
        let service = service();
        assert_eq!(active(&service.for_path("/blog")), ["Articles"]);
        assert_eq!(active(&service.for_path("/blog/page/2")), ["Articles"]);
        assert_eq!(active(&service.for_path("/blog/oracle-basics")), ["Articles"]);
        assert!(active(&service.for_path("/tags/solana")).is_empty());
    }

    #[test]
    fn default_meta_describes_the_site() {
        let chrome = service().load();
        assert_eq!(chrome.brand.title, "Quire");
        assert_eq!(chrome.meta.title, "Quire");
        assert_eq!(chrome.meta.description, "Notes on markets");
        assert_eq!(chrome.meta.canonical, "https://quire.example/");
    }
}
