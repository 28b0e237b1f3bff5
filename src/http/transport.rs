//! Transport - the opaque host call behind the verb helpers
//!
//! A transport turns a verb and URL (plus optional body) into the raw
//! response text blob. The shell treats it as a capability boundary:
//! everything network-shaped lives behind [`Transport`], and tests swap in
//! scripted implementations.

use std::fmt;
use std::io::{Read, Write};
use std::net::TcpStream;

use tracing::debug;

use super::error::HttpError;

/// HTTP verb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
    Post,
    Delete,
    Head,
    Copy,
    Move,
}

impl Method {
    /// Wire spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Post => "POST",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Copy => "COPY",
            Method::Move => "MOVE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque request capability: verb + absolute URL (+ body) to raw
/// response text
pub trait Transport {
    /// Perform one request, returning the raw response blob
    fn request(
        &mut self,
        method: Method,
        url: &str,
        body: Option<&str>,
    ) -> Result<String, HttpError>;
}

/// One-connection-per-request transport over plain TCP
///
/// Speaks just enough HTTP/1.0 to act as the host call: one request line,
/// a handful of headers, `Connection: close`, then read to EOF. `http://`
/// targets only.
#[derive(Debug, Default)]
pub struct TcpTransport;

impl TcpTransport {
    /// Create a transport
    pub fn new() -> Self {
        Self
    }
}

impl Transport for TcpTransport {
    fn request(
        &mut self,
        method: Method,
        url: &str,
        body: Option<&str>,
    ) -> Result<String, HttpError> {
        let target = Target::parse(url)?;
        debug!("{} {} -> {}:{}", method, target.path, target.host, target.port);

        let mut stream = TcpStream::connect((target.host.as_str(), target.port))?;

        let mut request = format!(
            "{} {} HTTP/1.0\r\nHost: {}\r\n",
            method, target.path, target.host
        );
        if let Some(body) = body {
            request.push_str(&format!(
                "Content-Type: application/json\r\nContent-Length: {}\r\n",
                body.len()
            ));
        }
        request.push_str("Connection: close\r\n\r\n");
        if let Some(body) = body {
            request.push_str(body);
        }

        stream.write_all(request.as_bytes())?;

        let mut raw = Vec::new();
        stream.read_to_end(&mut raw)?;

        Ok(String::from_utf8_lossy(&raw).into_owned())
    }
}

/// Split-out pieces of an absolute http URL
struct Target {
    host: String,
    port: u16,
    path: String,
}

impl Target {
    fn parse(url: &str) -> Result<Target, HttpError> {
        let rest = match url.split_once("://") {
            Some(("http", rest)) => rest,
            Some((scheme, _)) => {
                return Err(HttpError::UnsupportedScheme(scheme.to_string()))
            }
            None => return Err(HttpError::InvalidUrl(url.to_string())),
        };

        let (authority, path) = match rest.split_once('/') {
            Some((authority, path)) => (authority, format!("/{}", path)),
            None => (rest, "/".to_string()),
        };
        if authority.is_empty() {
            return Err(HttpError::InvalidUrl(url.to_string()));
        }

        let (host, port) = match authority.split_once(':') {
            Some((host, port)) => {
                let port = port
                    .parse::<u16>()
                    .map_err(|_| HttpError::InvalidUrl(url.to_string()))?;
                (host, port)
            }
            None => (authority, 80),
        };

        Ok(Target {
            host: host.to_string(),
            port,
            path,
        })
    }
}
