//! TOML-backed post collection.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::application::error::AppError;
use crate::application::repos::{PostsRepo, RepoError};
use crate::domain::{
    error::DomainError,
    posts::{Post, parse_iso_date},
    slug,
};
use crate::infra::error::InfraError;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read `{path}`")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse `{origin}`")]
    Parse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("post #{index} in `{origin}` is invalid")]
    Invalid {
        origin: String,
        index: usize,
        #[source]
        source: DomainError,
    },
}

impl From<ContentError> for AppError {
    fn from(error: ContentError) -> Self {
        match error {
            ContentError::Invalid { source, .. } => AppError::Domain(source),
            ContentError::Read { path, source } => {
                AppError::Infra(InfraError::content(path.display(), source.to_string()))
            }
            ContentError::Parse { origin, source } => {
                AppError::Infra(InfraError::content(origin, source.to_string()))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ContentFile {
    #[serde(default)]
    posts: Vec<RawPost>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPost {
    slug: String,
    title: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    tags: Vec<String>,
    date: String,
    #[serde(default)]
    images: Vec<String>,
    #[serde(default)]
    reading_time: Option<String>,
}

impl RawPost {
    fn into_post(self) -> Result<Post, DomainError> {
        let slug = self.slug.trim().to_string();
        if slug.is_empty() {
            return Err(DomainError::validation("slug", "must not be empty"));
        }
        if !slug::is_canonical(&slug) {
            return Err(DomainError::validation(
                "slug",
                format!("`{slug}` is not a lowercase hyphenated slug"),
            ));
        }

        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(DomainError::validation(
                "title",
                format!("post `{slug}` has an empty title"),
            ));
        }

        let date = parse_iso_date(&self.date).map_err(|err| {
            DomainError::validation(
                "date",
                format!("post `{slug}` has date `{}`: {err}", self.date),
            )
        })?;

        let tags = self
            .tags
            .into_iter()
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect::<Vec<_>>();
        if let Some(tag) = tags
            .iter()
            .find(|tag| !slug::is_canonical(&slug::tag_slug(tag)))
        {
            return Err(DomainError::validation(
                "tags",
                format!("post `{slug}` has tag `{tag}` with no usable route segment"),
            ));
        }
        let images = self
            .images
            .into_iter()
            .map(|image| image.trim().to_string())
            .filter(|image| !image.is_empty())
            .collect();
        let reading_time = self
            .reading_time
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        Ok(Post {
            slug,
            title,
            summary: self.summary.trim().to_string(),
            tags,
            date,
            images,
            reading_time,
        })
    }
}

/// Posts loaded once and shared read-only, newest first.
#[derive(Debug, Clone)]
pub struct ContentStore {
    posts: Arc<Vec<Post>>,
}

impl ContentStore {
    pub fn new(mut posts: Vec<Post>) -> Self {
        sort_newest_first(&mut posts);
        Self {
            posts: Arc::new(posts),
        }
    }

    pub async fn load(path: &Path) -> Result<Self, ContentError> {
        let source = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ContentError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let store = Self::from_toml(&source, &path.display().to_string())?;
        info!(
            target = "quire::infra::content",
            path = %path.display(),
            posts = store.len(),
            "content loaded"
        );
        Ok(store)
    }

    /// Parse and validate a content document. `origin` names it in errors.
    pub fn from_toml(source: &str, origin: &str) -> Result<Self, ContentError> {
        let file: ContentFile = toml::from_str(source).map_err(|source| ContentError::Parse {
            origin: origin.to_string(),
            source,
        })?;

        let mut seen = HashSet::new();
        let mut posts = Vec::with_capacity(file.posts.len());
        for (offset, raw) in file.posts.into_iter().enumerate() {
            let index = offset + 1;
            let invalid = |source| ContentError::Invalid {
                origin: origin.to_string(),
                index,
                source,
            };
            let post = raw.into_post().map_err(invalid)?;
            if !seen.insert(post.slug.clone()) {
                return Err(invalid(DomainError::validation(
                    "slug",
                    format!("`{}` is used by more than one post", post.slug),
                )));
            }
            posts.push(post);
        }

        Ok(Self::new(posts))
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }
}

#[async_trait]
impl PostsRepo for ContentStore {
    async fn list_posts(&self) -> Result<Arc<Vec<Post>>, RepoError> {
        Ok(self.posts.clone())
    }
}

fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use time::macros::date;

    const SAMPLE: &str = r#"
[[posts]]
slug = "older"
title = "Older post"
date = "2024-01-05"
tags = ["Solana", " "]

[[posts]]
slug = "newer"
title = "Newer post"
summary = "  Fresh.  "
date = "2024-03-01"
images = ["/static/cover.png"]
reading_time = "4 min read"

[[posts]]
slug = "also-older"
title = "Same day"
date = "2024-01-05"
"#;

    fn invalid_field(result: Result<ContentStore, ContentError>) -> &'static str {
        match result {
            Err(ContentError::Invalid {
                source: DomainError::Validation { field, .. },
                ..
            }) => field,
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[test]
    fn sorts_newest_first_then_by_slug() {
        let store = ContentStore::from_toml(SAMPLE, "inline").expect("valid content");
        let slugs: Vec<&str> = store.posts().iter().map(|post| post.slug.as_str()).collect();
        assert_eq!(slugs, ["newer", "also-older", "older"]);
    }

    #[test]
    fn normalizes_optional_fields() {
        let store = ContentStore::from_toml(SAMPLE, "inline").expect("valid content");
        let newer = &store.posts()[0];
        assert_eq!(newer.summary, "Fresh.");
        assert_eq!(newer.date, date!(2024 - 03 - 01));
        assert_eq!(newer.cover_image(), Some("/static/cover.png"));
        assert_eq!(newer.reading_time.as_deref(), Some("4 min read"));

        let older = &store.posts()[2];
        assert_eq!(older.tags, ["Solana"]);
        assert!(older.images.is_empty());
        assert!(older.summary.is_empty());
    }

    #[test]
    fn rejects_duplicate_slugs() {
        let source = r#"
[[posts]]
slug = "same"
title = "One"
date = "2024-01-01"

[[posts]]
slug = "same"
title = "Two"
date = "2024-01-02"
"#;
        let result = ContentStore::from_toml(source, "inline");
        assert!(matches!(result, Err(ContentError::Invalid { index: 2, .. })));
        assert_eq!(invalid_field(ContentStore::from_toml(source, "inline")), "slug");
    }

    #[test]
    fn rejects_bad_fields() {
        let bad_date = "[[posts]]\nslug = \"a\"\ntitle = \"A\"\ndate = \"05/01/2024\"\n";
        assert_eq!(invalid_field(ContentStore::from_toml(bad_date, "inline")), "date");

        let empty_title = "[[posts]]\nslug = \"a\"\ntitle = \"  \"\ndate = \"2024-01-05\"\n";
        assert_eq!(invalid_field(ContentStore::from_toml(empty_title, "inline")), "title");

        let bad_tag = "[[posts]]\nslug = \"a\"\ntitle = \"A\"\ndate = \"2024-01-05\"\ntags = [\"Rust\", \"<>\"]\n";
        assert_eq!(invalid_field(ContentStore::from_toml(bad_tag, "inline")), "tags");

        let bad_slug = "[[posts]]\nslug = \"Not A Slug\"\ntitle = \"A\"\ndate = \"2024-01-05\"\n";
        assert_eq!(invalid_field(ContentStore::from_toml(bad_slug, "inline")), "slug");
    }

    #[test]
    fn unknown_keys_are_parse_errors() {
        let source = "[[posts]]\nslug = \"a\"\ntitle = \"A\"\ndate = \"2024-01-05\"\nauthor = \"x\"\n";
        assert!(matches!(
            ContentStore::from_toml(source, "inline"),
            Err(ContentError::Parse { .. })
        ));
    }

    #[test]
    fn empty_document_has_no_posts() {
        let store = ContentStore::from_toml("", "inline").expect("empty content");
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn loads_from_disk_and_serves_as_repo() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(SAMPLE.as_bytes()).expect("write content");

        let store = ContentStore::load(file.path()).await.expect("load");
        let posts = store.list_posts().await.expect("list");
        assert_eq!(posts.len(), 3);
        let found = store.find_by_slug("older").await.expect("find");
        assert_eq!(found.map(|post| post.title), Some("Older post".to_string()));
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let result = ContentStore::load(&dir.path().join("absent.toml")).await;
        assert!(matches!(result, Err(ContentError::Read { .. })));
    }
}
