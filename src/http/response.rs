//! Raw HTTP response parsing
//!
//! Splits the raw text blob a transport returns into status, headers, and
//! body. This is text processing, not a protocol implementation: the
//! transport already collected the whole response.
//!
//! Header names are lower-cased at parse time so lookups are
//! case-insensitive, and each name maps to an ordered list of values so
//! repeated headers survive intact.

use indexmap::IndexMap;

use super::error::HttpError;

/// Upper bound on headers per response; beyond this the response is
/// treated as malformed
const MAX_HEADERS: usize = 64;

/// A parsed HTTP response
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Status code from the status line
    pub status: u16,
    /// Lower-cased header name -> values in arrival order
    pub headers: IndexMap<String, Vec<String>>,
    /// Raw body text, verbatim
    pub body: String,
}

impl Response {
    /// Parse a raw response blob
    pub fn parse(raw: &str) -> Result<Response, HttpError> {
        let mut header_buf = [httparse::EMPTY_HEADER; MAX_HEADERS];
        let mut parsed = httparse::Response::new(&mut header_buf);

        let body_start = match parsed.parse(raw.as_bytes())? {
            httparse::Status::Complete(offset) => offset,
            httparse::Status::Partial => return Err(HttpError::Truncated),
        };

        let status = parsed
            .code
            .ok_or_else(|| HttpError::Malformed("missing status code".to_string()))?;

        let mut headers: IndexMap<String, Vec<String>> = IndexMap::new();
        for header in parsed.headers.iter() {
            let name = header.name.to_ascii_lowercase();
            let value = String::from_utf8_lossy(header.value).into_owned();
            headers.entry(name).or_default().push(value);
        }

        Ok(Response {
            status,
            headers,
            body: raw[body_start..].to_string(),
        })
    }

    /// First value of a header, looked up case-insensitively
    pub fn header(
        &self,
        name: &str,
    ) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Deserialize the body as JSON
    pub fn json(&self) -> Result<serde_json::Value, HttpError> {
        Ok(serde_json::from_str(&self.body)?)
    }
}
