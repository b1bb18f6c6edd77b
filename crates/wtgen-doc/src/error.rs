//! Error types for document parsing and payload extraction.

use thiserror::Error;

/// Result type for document operations.
pub type DocResult<T> = Result<T, DocumentError>;

/// Errors that can occur while parsing a wtgen-1 document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The text is not valid JSON at all.
    #[error("document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The JSON is well-formed but is not a wtgen-1 spectralData framepack.
    #[error("schema: {reason}")]
    Schema {
        /// Which of the ordered checks failed.
        reason: String,
    },

    /// The embedded payload is not valid base64.
    #[error("payload is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    /// The decoded payload would exceed the configured size limit.
    #[error("payload exceeds the {limit}-byte limit")]
    PayloadTooLarge {
        /// The limit in effect when decoding was refused.
        limit: usize,
    },
}

impl DocumentError {
    /// Creates a schema error with a specific reason.
    pub fn schema(reason: impl Into<String>) -> Self {
        Self::Schema {
            reason: reason.into(),
        }
    }
}
