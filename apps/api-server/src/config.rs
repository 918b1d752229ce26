//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use glow_core::domain::DEFAULT_MAX_UPLOAD_BYTES;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Directory served at `/`; uploads land in its `uploads/` subdirectory.
    pub public_dir: PathBuf,
    /// JSON array file holding every post.
    pub data_file: PathBuf,
    pub max_upload_bytes: usize,
    /// Empty means any origin is allowed.
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            public_dir: env::var("PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("public")),
            data_file: env::var("DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data").join("posts.json")),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|raw| Self::parse_origins(&raw))
                .unwrap_or_default(),
        }
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.public_dir.join("uploads")
    }

    /// Format: ALLOWED_ORIGINS=http://localhost:3000,https://blog.example
    fn parse_origins(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }
}
