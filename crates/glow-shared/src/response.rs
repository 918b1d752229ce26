//! Error body returned by every failing API call: `{"error": "..."}`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }

    /// Generic body for 500s; internal details stay in the logs.
    pub fn internal_error() -> Self {
        Self::new("Server error")
    }
}
