//! Free-text post matching.
//!
//! A post matches when the lower-cased query is a substring of its search
//! surface: `title`, `summary` and the space-joined tags concatenated in that
//! order with nothing in between, so a query may straddle the title/summary
//! boundary.

use crate::domain::posts::Post;

/// A query lower-cased once, ready to test many posts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    needle: String,
}

impl SearchQuery {
    pub fn new(raw: &str) -> Self {
        Self {
            needle: raw.to_lowercase(),
        }
    }

    /// Empty queries match every post.
    pub fn is_identity(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn matches(&self, post: &Post) -> bool {
        if self.is_identity() {
            return true;
        }
        search_surface(post).to_lowercase().contains(&self.needle)
    }
}

/// The text a query is matched against, before case folding.
pub fn search_surface(post: &Post) -> String {
    let tags = post.tags.join(" ");
    let mut surface =
        String::with_capacity(post.title.len() + post.summary.len() + tags.len());
    surface.push_str(&post.title);
    surface.push_str(&post.summary);
    surface.push_str(&tags);
    surface
}

pub fn matches(post: &Post, query: &str) -> bool {
    SearchQuery::new(query).matches(post)
}
