//! HTTP Client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port using the reqwest library.
//! Timeouts are fixed per client instance; cookies are kept in memory per host.

use std::collections::HashMap;
use std::error::Error as _;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use relay_application::ResolvedRequest;
use relay_application::ports::{HttpClient, HttpClientError, HttpFuture};
use relay_domain::{ApiKeyLocation, Auth, RequestSpec, ResponseHeaders, ResponseSpec};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, HeaderMap, HeaderName, HeaderValue, SET_COOKIE};
use reqwest::{Client, Method, Url};
use tracing::debug;

const MAX_REDIRECTS: usize = 10;

/// Settings applied to every request sent by a [`ReqwestHttpClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    /// Time allowed to establish a connection
    pub connect_timeout: Duration,
    /// Time allowed for the whole exchange, body included
    pub read_timeout: Duration,
    /// Capture `Set-Cookie` headers and replay them to the same host
    pub auto_manage_cookies: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            read_timeout: Duration::from_secs(30),
            auto_manage_cookies: true,
        }
    }
}

/// In-memory cookie store keyed by host.
#[derive(Debug, Default)]
struct CookieJar {
    by_host: Mutex<HashMap<String, Vec<(String, String)>>>,
}

impl CookieJar {
    /// Stores the `name=value` pair of a `Set-Cookie` header, replacing a cookie with the same name.
    fn store(&self, host: &str, set_cookie: &str) {
        let pair = set_cookie.split(';').next().unwrap_or_default();
        let Some((name, value)) = pair.split_once('=') else {
            return;
        };
        let name = name.trim();
        if name.is_empty() {
            return;
        }

        let mut by_host = self.by_host.lock();
        let cookies = by_host.entry(host.to_string()).or_default();
        match cookies.iter_mut().find(|(n, _)| n == name) {
            Some(existing) => existing.1 = value.trim().to_string(),
            None => cookies.push((name.to_string(), value.trim().to_string())),
        }
    }

    fn header_value(&self, host: &str) -> Option<String> {
        let by_host = self.by_host.lock();
        let cookies = by_host.get(host).filter(|c| !c.is_empty())?;
        Some(
            cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    fn clear(&self) {
        self.by_host.lock().clear();
    }
}

/// HTTP client implementation using reqwest.
///
/// This is the primary HTTP adapter for Relay. It wraps `reqwest::Client`
/// and implements the `HttpClient` port from the application layer.
#[derive(Debug)]
pub struct ReqwestHttpClient {
    client: Client,
    config: ClientConfig,
    cookies: CookieJar,
}

impl ReqwestHttpClient {
    /// Creates a new HTTP client.
    ///
    /// # Errors
    ///
    /// Returns `HttpClientError::Other` if a timeout is zero or the client
    /// cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, HttpClientError> {
        if config.connect_timeout.is_zero() || config.read_timeout.is_zero() {
            return Err(HttpClientError::Other(
                "timeouts must be greater than zero".to_string(),
            ));
        }

        let client = Client::builder()
            .user_agent(concat!("relay/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(config.connect_timeout)
            .timeout(config.read_timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;

        Ok(Self {
            client,
            config,
            cookies: CookieJar::default(),
        })
    }

    /// Returns the configuration this client was built with.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the `Cookie` header value that would be sent to `host`.
    #[must_use]
    pub fn cookie_header(&self, host: &str) -> Option<String> {
        self.cookies.header_value(host)
    }

    /// Forgets every stored cookie.
    pub fn clear_cookies(&self) {
        self.cookies.clear();
    }

    fn cookies_enabled(&self, request: &RequestSpec) -> bool {
        self.config.auto_manage_cookies || request.wants_cookies()
    }

    /// Builds the header map: user headers, then body content type, auth and cookies.
    fn build_headers(
        &self,
        request: &RequestSpec,
        host: Option<&str>,
    ) -> Result<HeaderMap, HttpClientError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &request.headers {
            headers.append(header_name(name)?, header_value(value)?);
        }

        if let Some(content_type) = request.body.as_ref().and_then(|b| b.content_type()) {
            headers.insert(CONTENT_TYPE, header_value(content_type)?);
        }

        match &request.auth {
            Some(Auth::Bearer { token }) => {
                headers.insert(AUTHORIZATION, header_value(&format!("Bearer {token}"))?);
            }
            Some(Auth::ApiKey {
                key,
                key_name,
                location: ApiKeyLocation::Header,
            }) => {
                headers.insert(header_name(key_name)?, header_value(key)?);
            }
            _ => {}
        }

        if self.cookies_enabled(request)
            && let Some(stored) = host.and_then(|h| self.cookies.header_value(h))
        {
            let value = match headers.get(COOKIE).and_then(|v| v.to_str().ok()) {
                Some(existing) => format!("{existing}; {stored}"),
                None => stored,
            };
            headers.insert(COOKIE, header_value(&value)?);
        }

        Ok(headers)
    }

    /// Maps reqwest errors to the port's `HttpClientError`.
    fn map_error(&self, error: &reqwest::Error) -> HttpClientError {
        let message = error_chain(error);
        let lower = message.to_lowercase();
        let host = || {
            error
                .url()
                .and_then(Url::host_str)
                .unwrap_or("unknown")
                .to_string()
        };

        if error.is_timeout() {
            let limit = if error.is_connect() {
                self.config.connect_timeout
            } else {
                self.config.read_timeout
            };
            return HttpClientError::Timeout {
                timeout_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
            };
        }

        if error.is_connect() {
            if lower.contains("dns") || lower.contains("resolve") || lower.contains("lookup") {
                return HttpClientError::DnsError {
                    host: host(),
                    message,
                };
            }
            if lower.contains("refused") {
                return HttpClientError::ConnectionRefused {
                    host: host(),
                    port: error
                        .url()
                        .and_then(Url::port_or_known_default)
                        .unwrap_or(80),
                };
            }
            return HttpClientError::ConnectionFailed(message);
        }

        if error.is_redirect() {
            return HttpClientError::TooManyRedirects { max: MAX_REDIRECTS };
        }
        if error.is_builder() {
            return HttpClientError::InvalidRequest(message);
        }
        if error.is_body() || error.is_decode() {
            return HttpClientError::BodyRead(message);
        }

        HttpClientError::Other(message)
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute(&self, request: &ResolvedRequest) -> HttpFuture<'_> {
        let spec = request.spec().clone();

        Box::pin(async move {
            let method = Method::from_bytes(spec.method.trim().to_uppercase().as_bytes())
                .map_err(|e| HttpClientError::InvalidRequest(format!("{e}: {}", spec.method)))?;
            let mut url = Url::parse(&spec.url)
                .map_err(|e| HttpClientError::InvalidUrl(format!("{e}: {}", spec.url)))?;

            if let Some(Auth::ApiKey {
                key,
                key_name,
                location: ApiKeyLocation::Query,
            }) = &spec.auth
            {
                url.query_pairs_mut().append_pair(key_name, key);
            }

            let host = url.host_str().map(str::to_owned);
            let headers = self.build_headers(&spec, host.as_deref())?;

            let mut builder = self.client.request(method, url).headers(headers);
            if let Some(Auth::Basic { username, password }) = &spec.auth {
                builder = builder.basic_auth(username, Some(password));
            }
            if let Some(body) = spec.body.as_ref().filter(|b| !b.is_empty()) {
                builder = builder.body(body.content.clone());
            }

            let start = Instant::now();
            let response = builder.send().await.map_err(|e| self.map_error(&e))?;

            let status = response.status();
            let mut response_headers = ResponseHeaders::new();
            for (name, value) in response.headers() {
                response_headers
                    .entry(name.as_str().to_string())
                    .or_default()
                    .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
            }

            if self.cookies_enabled(&spec)
                && let Some(host) = &host
            {
                for set_cookie in response.headers().get_all(SET_COOKIE) {
                    if let Ok(value) = set_cookie.to_str() {
                        self.cookies.store(host, value);
                    }
                }
            }

            let body = response.bytes().await.map_err(|e| self.map_error(&e))?.to_vec();
            let duration = start.elapsed();

            debug!(
                status = status.as_u16(),
                size = body.len(),
                duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
                "response received"
            );

            let status_text = match status.canonical_reason() {
                Some(reason) => format!("{} {reason}", status.as_u16()),
                None => status.as_u16().to_string(),
            };

            Ok(ResponseSpec::new(
                status.as_u16(),
                status_text,
                response_headers,
                body,
                duration,
            ))
        })
    }
}

fn header_name(name: &str) -> Result<HeaderName, HttpClientError> {
    HeaderName::from_bytes(name.trim().as_bytes())
        .map_err(|e| HttpClientError::InvalidRequest(format!("invalid header name {name:?}: {e}")))
}

fn header_value(value: &str) -> Result<HeaderValue, HttpClientError> {
    HeaderValue::from_str(value)
        .map_err(|e| HttpClientError::InvalidRequest(format!("invalid header value: {e}")))
}

/// Joins an error and its sources into one message.
fn error_chain(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_client_creation() {
        let client = ReqwestHttpClient::new(ClientConfig::default()).unwrap();
        assert!(client.config().auto_manage_cookies);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = ClientConfig {
            read_timeout: Duration::ZERO,
            ..ClientConfig::default()
        };
        assert!(matches!(
            ReqwestHttpClient::new(config),
            Err(HttpClientError::Other(_))
        ));
    }

    #[test]
    fn test_cookie_jar_replaces_by_name() {
        let jar = CookieJar::default();
        jar.store("example.com", "session=abc; Path=/; HttpOnly");
        jar.store("example.com", "theme=dark");
        jar.store("example.com", "session=xyz");
        jar.store("other.com", "id=1");
        jar.store("example.com", "garbage");

        assert_eq!(
            jar.header_value("example.com").as_deref(),
            Some("session=xyz; theme=dark")
        );
        assert_eq!(jar.header_value("other.com").as_deref(), Some("id=1"));
        assert_eq!(jar.header_value("missing.com"), None);

        jar.clear();
        assert_eq!(jar.header_value("example.com"), None);
    }

    #[test]
    fn test_content_type_overrides_user_header() {
        let client = ReqwestHttpClient::new(ClientConfig::default()).unwrap();
        let request = RequestSpec::post("http://h")
            .with_header("Content-Type", "text/plain")
            .with_body(relay_domain::RequestBody::json("{}"));

        let headers = client.build_headers(&request, Some("h")).unwrap();
        assert_eq!(headers.get_all(CONTENT_TYPE).iter().count(), 1);
        assert_eq!(headers[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_invalid_header_name() {
        let client = ReqwestHttpClient::new(ClientConfig::default()).unwrap();
        let request = RequestSpec::get("http://h").with_header("bad header", "x");
        assert!(matches!(
            client.build_headers(&request, None),
            Err(HttpClientError::InvalidRequest(_))
        ));
    }
}
