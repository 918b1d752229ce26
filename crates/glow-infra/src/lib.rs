//! # Glow Infrastructure
//!
//! Concrete implementations of the ports defined in `glow-core`.
//!
//! - [`JsonFilePostStore`] keeps every post in one pretty-printed JSON array.
//! - [`InMemoryPostRepository`] holds posts in process memory only.
//! - [`DiskImageStore`] writes uploaded images under a publicly served directory.

pub mod store;
pub mod uploads;

pub use store::{InMemoryPostRepository, JsonFilePostStore};
pub use uploads::DiskImageStore;
