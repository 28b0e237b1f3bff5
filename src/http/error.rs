//! HTTP glue error types

use thiserror::Error;

/// Errors from transport dispatch or response parsing.
#[derive(Debug, Error)]
pub enum HttpError {
    /// URL could not be split into host and path
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Only plain http:// targets are supported
    #[error("unsupported scheme in url: {0}")]
    UnsupportedScheme(String),

    /// Socket-level failure
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Response text does not split into status line, headers, and body
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Response ended before the header block was closed
    #[error("truncated response")]
    Truncated,

    /// Body is not the JSON a caller asked for
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<httparse::Error> for HttpError {
    fn from(e: httparse::Error) -> Self {
        HttpError::Malformed(e.to_string())
    }
}
