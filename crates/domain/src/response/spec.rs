//! Response specification type

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Response headers; a name may carry several values.
pub type ResponseHeaders = HashMap<String, Vec<String>>;

/// A normalized HTTP response. Produced once per execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSpec {
    /// HTTP status code
    pub status: u16,
    /// Status line text (e.g., "200 OK")
    pub status_text: String,
    /// Response headers
    pub headers: ResponseHeaders,
    /// Raw response body
    pub body: Vec<u8>,
    /// Body size in bytes
    pub size: u64,
    /// Time from dispatch to the last body byte
    #[serde(with = "crate::duration_millis")]
    pub duration: Duration,
}

impl ResponseSpec {
    /// Creates a response, deriving `size` from the body.
    #[must_use]
    pub fn new(
        status: u16,
        status_text: impl Into<String>,
        headers: ResponseHeaders,
        body: Vec<u8>,
        duration: Duration,
    ) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            headers,
            size: body.len() as u64,
            body,
            duration,
        }
    }

    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Returns true if the status code indicates a client error (4xx).
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status >= 400 && self.status < 500
    }

    /// Returns true if the status code indicates a server error (5xx).
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status >= 500 && self.status < 600
    }

    /// Returns the first value of a header, matching the name case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .and_then(|(_, values)| values.first())
            .map(String::as_str)
    }

    /// Returns the body as text, replacing invalid UTF-8 sequences.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl Default for ResponseSpec {
    fn default() -> Self {
        Self {
            status: 0,
            status_text: String::new(),
            headers: ResponseHeaders::new(),
            body: Vec::new(),
            size: 0,
            duration: Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_checks() {
        let response_200 = ResponseSpec {
            status: 200,
            ..Default::default()
        };
        assert!(response_200.is_success());
        assert!(!response_200.is_client_error());
        assert!(!response_200.is_server_error());

        let response_404 = ResponseSpec {
            status: 404,
            ..Default::default()
        };
        assert!(!response_404.is_success());
        assert!(response_404.is_client_error());

        let response_500 = ResponseSpec {
            status: 500,
            ..Default::default()
        };
        assert!(response_500.is_server_error());

        let response_299 = ResponseSpec {
            status: 299,
            ..Default::default()
        };
        assert!(response_299.is_success());
    }

    #[test]
    fn test_new_sets_size() {
        let response = ResponseSpec::new(
            200,
            "200 OK",
            ResponseHeaders::new(),
            b"hello".to_vec(),
            Duration::from_millis(5),
        );
        assert_eq!(response.size, 5);
        assert_eq!(response.body_text(), "hello");
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let mut headers = ResponseHeaders::new();
        headers.insert(
            "content-type".to_string(),
            vec!["application/json".to_string()],
        );
        let response = ResponseSpec {
            headers,
            ..Default::default()
        };
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.header("x-missing"), None);
    }
}
