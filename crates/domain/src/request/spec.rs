//! Request template type

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use super::RequestBody;
use crate::auth::Auth;
use crate::error::{DomainError, DomainResult};

/// Request headers keyed by name. Keys and values may contain placeholders.
pub type Headers = HashMap<String, String>;

/// Connection and read timeouts attached to a stored request.
///
/// Informational only: the HTTP adapter applies its own per-instance timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutSettings {
    /// Time allowed to establish a connection
    #[serde(with = "crate::duration_millis")]
    pub connect: Duration,
    /// Time allowed for the whole exchange
    #[serde(with = "crate::duration_millis")]
    pub read: Duration,
}

/// Cookie handling preferences for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CookieSettings {
    /// Capture `Set-Cookie` responses and replay them to the same host.
    #[serde(default)]
    pub auto_manage: bool,
}

/// An HTTP request template.
///
/// URL, header keys and values, textual body content and auth credentials may
/// embed `{{name}}` placeholders. Templates are never mutated by resolution.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RequestSpec {
    /// HTTP method, e.g. "GET"
    pub method: String,
    /// Target URL
    pub url: String,
    /// HTTP headers
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: Headers,
    /// Request body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<RequestBody>,
    /// Authentication descriptor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<Auth>,
    /// Timeout preferences
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<TimeoutSettings>,
    /// Cookie preferences
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookies: Option<CookieSettings>,
}

impl RequestSpec {
    /// Creates a request template with the given method and URL.
    #[must_use]
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            ..Self::default()
        }
    }

    /// Creates a GET request template.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }

    /// Creates a POST request template.
    #[must_use]
    pub fn post(url: impl Into<String>) -> Self {
        Self::new("POST", url)
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets the authentication descriptor.
    #[must_use]
    pub fn with_auth(mut self, auth: Auth) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Sets timeout preferences.
    #[must_use]
    pub const fn with_timeout(mut self, connect: Duration, read: Duration) -> Self {
        self.timeout = Some(TimeoutSettings { connect, read });
        self
    }

    /// Sets cookie preferences.
    #[must_use]
    pub const fn with_cookies(mut self, auto_manage: bool) -> Self {
        self.cookies = Some(CookieSettings { auto_manage });
        self
    }

    /// Returns true if cookie auto-management was requested for this template.
    #[must_use]
    pub fn wants_cookies(&self) -> bool {
        self.cookies.is_some_and(|c| c.auto_manage)
    }

    /// Checks that method and URL are present.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRequest` naming the missing field.
    pub fn validate(&self) -> DomainResult<()> {
        if self.method.trim().is_empty() {
            return Err(DomainError::InvalidRequest("method is required".to_string()));
        }
        if self.url.trim().is_empty() {
            return Err(DomainError::InvalidRequest("URL is required".to_string()));
        }
        Ok(())
    }

    /// Parses the URL.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidUrl` if the URL is malformed.
    pub fn parse_url(&self) -> DomainResult<Url> {
        Url::parse(&self.url).map_err(|e| DomainError::InvalidUrl(format!("{e}: {}", self.url)))
    }

    /// Returns true if any resolvable field appears to contain a placeholder.
    #[must_use]
    pub fn has_variables(&self) -> bool {
        fn templated(s: &str) -> bool {
            s.contains("{{") && s.contains("}}")
        }

        templated(&self.url)
            || self.headers.iter().any(|(k, v)| templated(k) || templated(v))
            || self
                .body
                .as_ref()
                .and_then(RequestBody::content_str)
                .is_some_and(templated)
            || self.auth.as_ref().is_some_and(|a| a.credentials().any(templated))
    }
}
