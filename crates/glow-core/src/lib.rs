//! # Glow Core
//!
//! The domain layer of the Glow blog.
//! This crate contains the post model, upload rules and the ports that
//! storage adapters implement. It performs no I/O.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::{DomainError, RepoError, UploadError};
