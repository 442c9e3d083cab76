//! Site identity shared by chrome, metadata and the preview card.

use url::Url;

use crate::config::SiteSettings;

#[derive(Debug, Clone)]
pub struct SiteProfile {
    pub title: String,
    pub description: String,
    pub public_url: Url,
    pub tagline: String,
}

impl SiteProfile {
    /// Absolute URL for a site-relative path.
    pub fn absolute_url(&self, path: &str) -> String {
        self.public_url
            .join(path.trim_start_matches('/'))
            .map(|url| url.to_string())
            .unwrap_or_else(|_| {
                let root = self.public_url.as_str().trim_end_matches('/');
                format!("{root}/{}", path.trim_start_matches('/'))
            })
    }
}

impl From<&SiteSettings> for SiteProfile {
    fn from(settings: &SiteSettings) -> Self {
        Self {
            title: settings.title.clone(),
            description: settings.description.clone(),
            public_url: settings.public_url.clone(),
            tagline: settings.tagline.clone(),
        }
    }
}
