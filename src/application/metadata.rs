//! Head metadata for HTML pages, including the social-preview image URL.

use url::form_urlencoded;

use crate::application::site::SiteProfile;
use crate::domain::posts::{Post, format_iso_date};
use crate::presentation::views::PageMetaView;

pub const PREVIEW_PATH: &str = "/api/og";
pub const PREVIEW_WIDTH: u32 = 1200;
pub const PREVIEW_HEIGHT: u32 = 630;
const TWITTER_CARD: &str = "summary_large_image";

/// Site-relative URL of the preview card for the given text.
pub fn preview_image_path(title: &str, summary: &str, image: Option<&str>) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair("title", title);
    query.append_pair("summary", summary);
    if let Some(image) = image.filter(|value| !value.is_empty()) {
        query.append_pair("image", image);
    }
    format!("{PREVIEW_PATH}?{}", query.finish())
}

pub fn site_meta(site: &SiteProfile) -> PageMetaView {
    website_meta(site, &site.title, &site.description, "/")
}

/// Metadata for a list surface whose first page lives at `base_path`.
pub fn list_meta(site: &SiteProfile, heading: &str, base_path: &str) -> PageMetaView {
    let title = if heading == site.title {
        site.title.clone()
    } else {
        format!("{heading} | {}", site.title)
    };
    website_meta(site, &title, &site.description, base_path)
}

pub fn post_meta(site: &SiteProfile, post: &Post) -> PageMetaView {
    let description = if post.summary.trim().is_empty() {
        site.description.clone()
    } else {
        post.summary.clone()
    };
    let preview = preview_image_path(&post.title, &post.summary, post.cover_image());

    PageMetaView {
        title: post.title.clone(),
        description,
        canonical: site.absolute_url(&format!("/blog/{}", post.slug)),
        og_type: "article",
        og_image: site.absolute_url(&preview),
        og_image_width: PREVIEW_WIDTH,
        og_image_height: PREVIEW_HEIGHT,
        twitter_card: TWITTER_CARD,
        published_time: Some(format_iso_date(post.date)),
    }
}

fn website_meta(site: &SiteProfile, title: &str, description: &str, path: &str) -> PageMetaView {
    let preview = preview_image_path(title, description, None);
    PageMetaView {
        title: title.to_string(),
        description: description.to_string(),
        canonical: site.absolute_url(path),
        og_type: "website",
        og_image: site.absolute_url(&preview),
        og_image_width: PREVIEW_WIDTH,
        og_image_height: PREVIEW_HEIGHT,
        twitter_card: TWITTER_CARD,
        published_time: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;
    use url::Url;

    fn site() -> SiteProfile {
        SiteProfile {
            title: "Quire".to_string(),
            description: "Notes on markets".to_string(),
            public_url: Url::parse("https://quire.example/").expect("url"),
            tagline: "Research".to_string(),
        }
    }

    fn post(images: &[&str], summary: &str) -> Post {
        Post {
            slug: "oracle-basics".to_string(),
            title: "Oracle basics & more".to_string(),
            summary: summary.to_string(),
            tags: vec!["Solana".to_string()],
            date: date!(2024 - 03 - 09),
            images: images.iter().map(|image| image.to_string()).collect(),
            reading_time: None,
        }
    }

    #[test]
    fn preview_path_encodes_parameters() {
        assert_eq!(
            preview_image_path("A & B", "Short", None),
            "/api/og?title=A+%26+B&summary=Short"
        );
        assert_eq!(
            preview_image_path("T", "", Some("/static/cover.png")),
            "/api/og?title=T&summary=&image=%2Fstatic%2Fcover.png"
        );
        assert_eq!(preview_image_path("T", "S", Some("")), "/api/og?title=T&summary=S");
    }

    #[test]
    fn post_meta_uses_first_image_and_article_type() {
        let meta = post_meta(&site(), &post(&["/a.png", "/b.png"], "Disputes explained"));
        assert_eq!(meta.og_type, "article");
        assert_eq!(meta.canonical, "https://quire.example/blog/oracle-basics");
        assert_eq!(
            meta.og_image,
            "https://quire.example/api/og?title=Oracle+basics+%26+more&summary=Disputes+explained&image=%2Fa.png"
        );
        assert_eq!(meta.twitter_card, "summary_large_image");
        assert_eq!(meta.published_time.as_deref(), Some("2024-03-09"));
        assert_eq!((meta.og_image_width, meta.og_image_height), (1200, 630));
    }

    #[test]
    fn post_without_summary_falls_back_to_site_description() {
        let meta = post_meta(&site(), &post(&[], "  "));
        assert_eq!(meta.description, "Notes on markets");
    }

    #[test]
    fn list_meta_prefixes_heading() {
        let meta = list_meta(&site(), "All Articles", "/blog");
        assert_eq!(meta.title, "All Articles | Quire");
        assert_eq!(meta.og_type, "website");
        assert_eq!(meta.canonical, "https://quire.example/blog");
        assert!(meta.published_time.is_none());

        assert_eq!(list_meta(&site(), "Quire", "/").title, "Quire");
    }
}
