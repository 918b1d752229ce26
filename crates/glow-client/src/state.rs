//! Client application state: loaded posts, filtered view, pagination cursor.

use std::collections::HashSet;

use glow_core::domain::Post;

use crate::filter::PostFilter;
use crate::theme::Theme;

/// Posts revealed per "load more".
pub const POSTS_PER_PAGE: usize = 6;

/// Everything the renderers need, passed around explicitly.
///
/// `posts` is kept newest first. The filtered view stores indices into
/// `posts`; `shown` counts how many of them have been revealed.
#[derive(Debug, Clone)]
pub struct BlogState {
    posts: Vec<Post>,
    filtered: Vec<usize>,
    shown: usize,
    filter: PostFilter,
    page_size: usize,
    pub theme: Theme,
}

impl Default for BlogState {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

impl BlogState {
    pub fn new(theme: Theme) -> Self {
        Self {
            posts: Vec::new(),
            filtered: Vec::new(),
            shown: 0,
            filter: PostFilter::default(),
            page_size: POSTS_PER_PAGE,
            theme,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Replace the collection with `disk` followed by `local` drafts, sorted
    /// newest first. Clears the filter and reveals the first page.
    pub fn load(&mut self, disk: Vec<Post>, local: Vec<Post>) {
        let mut posts = disk;
        posts.extend(local);
        posts.sort_by(|a, b| b.date.cmp(&a.date));

        self.posts = posts;
        self.filter = PostFilter::default();
        self.refilter();
    }

    /// Filter by free text and optional tag, then reveal the first page.
    pub fn apply_filters(&mut self, query: &str, tag: Option<&str>) {
        self.filter = PostFilter::new(query, tag);
        self.refilter();
    }

    /// Select a single tag and clear the text query.
    pub fn apply_tag_filter(&mut self, tag: &str) {
        self.apply_filters("", Some(tag));
    }

    /// Put a freshly written local post on top and re-run the current filter.
    pub fn add_local_post(&mut self, post: Post) {
        self.posts.insert(0, post);
        self.refilter();
    }

    /// Reveal up to `n` more posts; returns them with their index in the
    /// filtered view.
    pub fn render_next(&mut self, n: usize) -> Vec<(usize, &Post)> {
        let start = self.shown;
        let end = self.filtered.len().min(start.saturating_add(n));
        self.shown = end;

        (start..end)
            .map(|i| (i, &self.posts[self.filtered[i]]))
            .collect()
    }

    /// Reveal one more page.
    pub fn next_page(&mut self) -> Vec<(usize, &Post)> {
        self.render_next(self.page_size)
    }

    /// Reveal pages until `pages` pages are showing (at least the first).
    pub fn reveal_pages(&mut self, pages: usize) {
        let target = self.page_size.saturating_mul(pages.max(1));
        if target > self.shown {
            self.render_next(target - self.shown);
        }
    }

    /// Whether the "load more" control should be offered.
    pub fn has_more(&self) -> bool {
        self.shown < self.filtered.len()
    }

    /// Revealed posts, in display order.
    pub fn visible(&self) -> Vec<&Post> {
        self.filtered[..self.shown]
            .iter()
            .map(|&i| &self.posts[i])
            .collect()
    }

    /// Distinct tags across all posts, in first-seen order.
    pub fn tags(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.posts
            .iter()
            .flat_map(|p| p.tags.iter())
            .map(String::as_str)
            .filter(|t| seen.insert(*t))
            .collect()
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn filter(&self) -> &PostFilter {
        &self.filter
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn shown(&self) -> usize {
        self.shown
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    fn refilter(&mut self) {
        self.filtered = self
            .posts
            .iter()
            .enumerate()
            .filter(|(_, p)| self.filter.matches(p))
            .map(|(i, _)| i)
            .collect();
        self.shown = 0;
        self.render_next(self.page_size);
    }
}
