//! # Glow Client
//!
//! Everything the blog front-end does, without a browser:
//!
//! - [`BlogState`] holds the loaded posts, the filtered view and the
//!   pagination cursor, and is passed explicitly to the renderers.
//! - [`Renderer`] turns that state into HTML cards and tag controls using
//!   Tera templates.
//! - [`source`] loads posts from the HTTP API or a static `posts.json`;
//!   [`BlogSource`] picks one and builds a fresh state from it.
//! - [`LocalStore`] keeps unsynced drafts and the theme preference on disk.

pub mod error;
pub mod filter;
pub mod form;
pub mod loader;
pub mod local_store;
pub mod render;
pub mod source;
pub mod state;
pub mod theme;

#[cfg(test)]
mod test_support;

pub use error::ClientError;
pub use filter::PostFilter;
pub use form::{ImageAttachment, PostForm};
pub use loader::BlogSource;
pub use local_store::LocalStore;
pub use render::Renderer;
pub use source::{ApiSource, PostSource, StaticJsonSource};
pub use state::{BlogState, POSTS_PER_PAGE};
pub use theme::Theme;
