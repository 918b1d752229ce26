use crate::error::UploadError;

/// Content types accepted for post images.
pub const ALLOWED_IMAGE_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/bmp",
];

/// Default upload cap: 6 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 6 * 1024 * 1024;

/// An image received from a client, fully buffered.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Where an accepted image ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// File name inside the uploads directory.
    pub file_name: String,
    /// Path the image is served from, e.g. `/uploads/1700000000000-cat.png`.
    pub public_path: String,
}

/// Type and size rules for uploaded images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_bytes: usize,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl UploadPolicy {
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    /// Accept only the image types in [`ALLOWED_IMAGE_TYPES`].
    /// Parameters such as `; charset=...` are ignored.
    pub fn check_type(&self, content_type: &str) -> Result<(), UploadError> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if ALLOWED_IMAGE_TYPES.contains(&essence.as_str()) {
            Ok(())
        } else {
            Err(UploadError::UnsupportedType(content_type.to_string()))
        }
    }

    pub fn check_size(&self, len: usize) -> Result<(), UploadError> {
        if len > self.max_bytes {
            Err(UploadError::TooLarge {
                limit: self.max_bytes,
            })
        } else {
            Ok(())
        }
    }

    pub fn check(&self, upload: &ImageUpload) -> Result<(), UploadError> {
        self.check_type(&upload.content_type)?;
        self.check_size(upload.bytes.len())
    }
}

/// Reduce a client-supplied file name to `[A-Za-z0-9._-]`.
///
/// Whitespace runs become a single `-` before filtering. An empty result
/// falls back to `image`.
pub fn sanitize_file_name(original: &str) -> String {
    let mut out = String::with_capacity(original.len());
    let mut in_space = false;

    for ch in original.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push('-');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.') {
            out.push(ch);
        }
    }

    if out.is_empty() {
        "image".to_string()
    } else {
        out
    }
}

/// Name an upload is stored under: `<timestamp-ms>-<sanitized name>`.
pub fn stored_file_name(timestamp_ms: i64, original: &str) -> String {
    format!("{}-{}", timestamp_ms, sanitize_file_name(original))
}
