//! Vitrine Networking
//!
//! GET-style document fetching behind the [`Fetcher`] trait, with a real
//! HTTP implementation and an in-memory one for harnesses.

mod fetch;

pub use fetch::{Fetcher, HttpFetcher, StaticFetcher};
pub use url::Url;

/// User agent sent by [`HttpFetcher`] unless overridden
pub const DEFAULT_USER_AGENT: &str = concat!("Vitrine/", env!("CARGO_PKG_VERSION"));

/// HTTP Response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Final URL after redirects
    pub url: String,
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    /// 200 response carrying `body`
    pub fn ok(url: &str, body: impl Into<Vec<u8>>) -> Self {
        Self::with_status(url, 200, body)
    }

    pub fn with_status(url: &str, status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            url: url.to_string(),
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Check if response is OK (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body as UTF-8 text
    pub fn text(&self) -> Result<String, NetError> {
        String::from_utf8(self.body.clone()).map_err(|e| NetError::Decode(e.to_string()))
    }
}

/// Network error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Response body is not valid UTF-8: {0}")]
    Decode(String),

    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_status() {
        assert!(Response::ok("https://shop.test/", "").is_success());
        assert!(Response::with_status("https://shop.test/", 204, "").is_success());
        assert!(!Response::with_status("https://shop.test/", 404, "").is_success());
        assert!(!Response::with_status("https://shop.test/", 301, "").is_success());
    }

    #[test]
    fn test_response_text_and_headers() {
        let mut response = Response::ok("https://shop.test/", "<p>hi</p>");
        response.headers.push(("Content-Type".into(), "text/html".into()));

        assert_eq!(response.text().unwrap(), "<p>hi</p>");
        assert_eq!(response.header("content-type"), Some("text/html"));

        let broken = Response::ok("https://shop.test/", vec![0xff, 0xfe]);
        assert!(matches!(broken.text(), Err(NetError::Decode(_))));
    }
}
