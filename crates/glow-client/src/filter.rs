//! Free-text and tag filtering of posts.

use glow_core::domain::Post;

/// Filter criteria, normalized to trimmed lowercase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    query: String,
    tag: Option<String>,
}

impl PostFilter {
    pub fn new(query: &str, tag: Option<&str>) -> Self {
        let tag = tag
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty());

        Self {
            query: query.trim().to_lowercase(),
            tag,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_empty() && self.tag.is_none()
    }

    /// The query is a substring match over title, author, content and tags;
    /// the tag must equal one of the post's tags. Both ignore case.
    pub fn matches(&self, post: &Post) -> bool {
        let matches_query = self.query.is_empty() || {
            let haystack = format!(
                "{} {} {} {}",
                post.title,
                post.author,
                post.content,
                post.tags.join(" ")
            )
            .to_lowercase();
            haystack.contains(&self.query)
        };

        let matches_tag = match &self.tag {
            Some(tag) => post.tags.iter().any(|t| t.to_lowercase() == *tag),
            None => true,
        };

        matches_query && matches_tag
    }
}
