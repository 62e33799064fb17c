//! Scripted HTTP client shared by use case tests.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::Mutex;
use relay_domain::{ResponseHeaders, ResponseSpec};

use crate::ports::{HttpClient, HttpClientError, HttpFuture};
use crate::variable_resolver::ResolvedRequest;

/// Answers 200 to every URL unless told otherwise, after a short delay.
pub struct MockHttpClient {
    statuses: HashMap<String, u16>,
    failures: HashMap<String, HttpClientError>,
    delay: Duration,
    seen: Mutex<Vec<ResolvedRequest>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            statuses: HashMap::new(),
            failures: HashMap::new(),
            delay: Duration::from_millis(2),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.statuses.insert(url.to_string(), status);
        self
    }

    pub fn with_failure(mut self, url: &str, error: HttpClientError) -> Self {
        self.failures.insert(url.to_string(), error);
        self
    }

    pub fn seen_urls(&self) -> Vec<String> {
        self.seen
            .lock()
            .iter()
            .map(|r| r.url.clone())
            .collect()
    }
}

impl HttpClient for MockHttpClient {
    fn execute(&self, request: &ResolvedRequest) -> HttpFuture<'_> {
        self.seen.lock().push(request.clone());
        let url = request.url.clone();

        Box::pin(async move {
            tokio::time::sleep(self.delay).await;
            if let Some(error) = self.failures.get(&url) {
                return Err(error.clone());
            }
            let status = self.statuses.get(&url).copied().unwrap_or(200);
            Ok(ResponseSpec::new(
                status,
                status.to_string(),
                ResponseHeaders::new(),
                b"ok".to_vec(),
                self.delay,
            ))
        })
    }
}
