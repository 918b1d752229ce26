//! HTML rendering of post cards, tag controls and the full page.
//!
//! Markup lives in `templates/` and is rendered by Tera with autoescaping
//! on, so every post field is escaped on the way out.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use tera::{Context, Tera};

use glow_core::domain::Post;

use crate::error::ClientError;
use crate::state::BlogState;
use crate::theme::Theme;

const TEMPLATES: [(&str, &str); 4] = [
    ("card.html", include_str!("../templates/card.html")),
    ("tag_options.html", include_str!("../templates/tag_options.html")),
    ("tag_list.html", include_str!("../templates/tag_list.html")),
    ("page.html", include_str!("../templates/page.html")),
];

/// Local date and time, e.g. `3/1/2025, 10:15:30 AM`.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.with_timezone(&Local)
        .format("%-m/%-d/%Y, %-I:%M:%S %p")
        .to_string()
}

#[derive(Serialize)]
struct TagOption<'a> {
    name: &'a str,
    selected: bool,
}

/// Compiled page templates.
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    pub fn new() -> Result<Self, ClientError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES)?;
        Ok(Self { tera })
    }

    /// One post card. `index` is the position in the filtered view and
    /// staggers the entry animation within a page.
    pub fn render_card(&self, post: &Post, index: usize, page_size: usize) -> Result<String, ClientError> {
        let alt = if post.title.is_empty() {
            "post image"
        } else {
            post.title.as_str()
        };
        let lines: Vec<&str> = post.content.split('\n').collect();

        let mut ctx = Context::new();
        ctx.insert("delay", &((index % page_size.max(1)) * 40));
        ctx.insert("title", &post.title);
        ctx.insert("author", &post.author);
        ctx.insert("date", &format_date(&post.date));
        ctx.insert("lines", &lines);
        ctx.insert("image", &post.image.as_deref().filter(|src| !src.is_empty()));
        ctx.insert("alt", alt);
        ctx.insert("tags", &post.tags);

        Ok(self.tera.render("card.html", &ctx)?)
    }

    /// `<option>` list for the tag selector, `All tags` first. `selected` is
    /// matched the way the tag filter matches, ignoring case.
    pub fn render_tag_options(&self, tags: &[&str], selected: Option<&str>) -> Result<String, ClientError> {
        let wanted = selected.map(|s| s.trim().to_lowercase());
        let options: Vec<TagOption> = tags
            .iter()
            .map(|&name| TagOption {
                name,
                selected: wanted.as_deref() == Some(name.to_lowercase().as_str()),
            })
            .collect();

        let mut ctx = Context::new();
        ctx.insert("any_selected", &selected.is_some());
        ctx.insert("options", &options);

        Ok(self.tera.render("tag_options.html", &ctx)?)
    }

    /// Clickable tag buttons.
    pub fn render_tag_list(&self, tags: &[&str]) -> Result<String, ClientError> {
        let mut ctx = Context::new();
        ctx.insert("tags", tags);
        Ok(self.tera.render("tag_list.html", &ctx)?)
    }

    /// Full page for the current state: branding, tag controls and every
    /// revealed card.
    pub fn render_page(&self, state: &BlogState) -> Result<String, ClientError> {
        let tags = state.tags();
        let cards = state
            .visible()
            .into_iter()
            .enumerate()
            .map(|(i, post)| self.render_card(post, i, state.page_size()))
            .collect::<Result<Vec<_>, _>>()?;

        let mut ctx = Context::new();
        ctx.insert("light", &(state.theme == Theme::Light));
        ctx.insert("brand", state.theme.brand_title());
        ctx.insert("toggle_icon", state.theme.toggle_icon());
        ctx.insert("query", state.filter().query());
        ctx.insert("tag_options", &self.render_tag_options(&tags, state.filter().tag())?);
        ctx.insert("tag_list", &self.render_tag_list(&tags)?);
        ctx.insert("cards", &cards);
        ctx.insert("has_more", &state.has_more());

        Ok(self.tera.render("page.html", &ctx)?)
    }
}
