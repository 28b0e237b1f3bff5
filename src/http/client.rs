//! Verb helpers over a transport
//!
//! The client composes a [`Transport`] with [`Response::parse`] and
//! resolves relative URLs against the configured server base, which is
//! what lets shell scripts say `get("/db")` instead of spelling out the
//! server on every call.

use tracing::debug;

use super::error::HttpError;
use super::response::Response;
use super::transport::{Method, Transport};

/// HTTP client bound to a server base URL
pub struct Client {
    transport: Box<dyn Transport>,
    base: String,
}

impl Client {
    /// Create a client from a transport and a base URL
    pub fn new(
        transport: Box<dyn Transport>,
        base: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    /// The configured base URL
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Perform one request and parse the response
    pub fn request(
        &mut self,
        method: Method,
        url: &str,
        body: Option<&str>,
    ) -> Result<Response, HttpError> {
        let url = self.resolve(url);
        debug!("request {} {}", method, url);
        let raw = self.transport.request(method, &url, body)?;
        Response::parse(&raw)
    }

    /// Resolve a possibly relative URL against the base
    fn resolve(
        &self,
        url: &str,
    ) -> String {
        if url.contains("://") {
            return url.to_string();
        }
        if url.starts_with('/') {
            format!("{}{}", self.base, url)
        } else {
            format!("{}/{}", self.base, url)
        }
    }
}
