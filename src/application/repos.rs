//! Repository traits describing content adapters.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::posts::Post;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("content source unavailable: {0}")]
    Unavailable(String),
}

impl RepoError {
    pub fn unavailable(err: impl std::fmt::Display) -> Self {
        Self::Unavailable(err.to_string())
    }
}

/// Read side of the post collection.
///
/// `list_posts` returns every published post, newest first. The list is
/// shared so that handlers can borrow it for a whole render pass.
#[async_trait]
pub trait PostsRepo: Send + Sync {
    async fn list_posts(&self) -> Result<Arc<Vec<Post>>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let posts = self.list_posts().await?;
        Ok(posts.iter().find(|post| post.slug == slug).cloned())
    }
}
