//! Captured HTTP exchange records

use bytes::Bytes;

/// One exchange exactly as the host traffic source hands it over.
///
/// This is the conversion boundary: the host side is loosely typed, so every
/// field is pinned down here once and never re-interpreted downstream. The
/// response body arrives as a raw byte buffer and is decoded during
/// conversion to [`Exchange`].
#[derive(Debug, Clone, Default)]
pub struct RawExchange {
    /// HTTP method (e.g., "GET", "POST")
    pub method: String,
    /// Full request URL
    pub url: String,
    /// Response status code, as reported by the host
    pub status_code: String,
    /// Response content type
    pub response_content_type: String,
    /// Raw newline-delimited `Key: Value` request header block
    pub request_headers: String,
    /// Raw newline-delimited `Key: Value` response header block
    pub response_headers: String,
    /// Raw request cookie string
    pub request_cookies: String,
    /// Raw response cookie string
    pub response_cookies: String,
    /// Raw request body (may be empty)
    pub request_body: String,
    /// Raw response body bytes (may be empty)
    pub response_body: Bytes,
}

/// One captured HTTP request/response pair, immutable once constructed.
///
/// Header and cookie blocks are kept raw; parsing happens on demand via the
/// [`crate::headers`] accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    /// HTTP method (e.g., "GET", "POST")
    pub method: String,
    /// Full request URL
    pub url: String,
    /// Response status code
    pub status_code: String,
    /// Response content type
    pub response_content_type: String,
    /// Raw newline-delimited `Key: Value` request header block
    pub request_headers: String,
    /// Raw newline-delimited `Key: Value` response header block
    pub response_headers: String,
    /// Raw request cookie string
    pub request_cookies: String,
    /// Raw response cookie string
    pub response_cookies: String,
    /// Raw request body (may be empty)
    pub request_body: String,
    /// Response body decoded as UTF-8 text; empty if the source gave no body
    pub response_body: String,
}

impl Exchange {
    /// Convert a boundary record into the cache's value object.
    ///
    /// The response body is decoded as UTF-8 text; bytes that are not valid
    /// UTF-8 are replaced rather than dropped.
    #[must_use]
    pub fn from_raw(raw: RawExchange) -> Self {
        let response_body = if raw.response_body.is_empty() {
            String::new()
        } else {
            String::from_utf8_lossy(&raw.response_body).into_owned()
        };

        Self {
            method: raw.method,
            url: raw.url,
            status_code: raw.status_code,
            response_content_type: raw.response_content_type,
            request_headers: raw.request_headers,
            response_headers: raw.response_headers,
            request_cookies: raw.request_cookies,
            response_cookies: raw.response_cookies,
            request_body: raw.request_body,
            response_body,
        }
    }

    /// Check whether this exchange's URL matches `pattern` under `mode`.
    #[must_use]
    pub fn url_matches(&self, pattern: &str, mode: UrlMatch) -> bool {
        match mode {
            UrlMatch::Exact => self.url == pattern,
            UrlMatch::Substring => self.url.contains(pattern),
        }
    }
}

/// URL matching mode for lookups.
///
/// Exactly two semantics exist: full equality or substring containment.
/// Older host-side helpers overloaded a `strict` flag with other meanings;
/// those variants are deliberately not carried over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlMatch {
    /// The exchange URL must equal the pattern
    Exact,
    /// The exchange URL must contain the pattern as a substring
    Substring,
}
