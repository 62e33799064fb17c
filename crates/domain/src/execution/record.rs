//! Per-request and per-batch execution records

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Statistics;
use crate::request::RequestSpec;
use crate::response::ResponseSpec;

/// What happened to a single request: a response or an error, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionOutcome {
    /// The server answered (any status)
    Response(ResponseSpec),
    /// Resolution or transport failed
    Error(String),
}

/// The record of executing one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestExecution {
    /// The request as sent; the stored template when resolution failed
    pub request: RequestSpec,
    /// Response or error
    pub outcome: ExecutionOutcome,
    /// Time spent on the HTTP exchange; zero when nothing was sent
    #[serde(with = "crate::duration_millis")]
    pub duration: Duration,
    /// When the record was produced
    pub timestamp: DateTime<Utc>,
    /// False when the request never reached the HTTP client
    #[serde(default = "dispatched_default")]
    pub dispatched: bool,
}

const fn dispatched_default() -> bool {
    true
}

impl RequestExecution {
    /// Records a received response.
    #[must_use]
    pub fn from_response(request: RequestSpec, response: ResponseSpec, duration: Duration) -> Self {
        Self {
            request,
            outcome: ExecutionOutcome::Response(response),
            duration,
            timestamp: Utc::now(),
            dispatched: true,
        }
    }

    /// Records a failure that happened after the request was dispatched.
    #[must_use]
    pub fn failed(request: RequestSpec, error: impl Into<String>, duration: Duration) -> Self {
        Self {
            request,
            outcome: ExecutionOutcome::Error(error.into()),
            duration,
            timestamp: Utc::now(),
            dispatched: true,
        }
    }

    /// Records a request that was never sent. Duration is zero.
    #[must_use]
    pub fn not_dispatched(request: RequestSpec, error: impl Into<String>) -> Self {
        Self {
            request,
            outcome: ExecutionOutcome::Error(error.into()),
            duration: Duration::ZERO,
            timestamp: Utc::now(),
            dispatched: false,
        }
    }

    /// Returns the response, if one was received.
    #[must_use]
    pub const fn response(&self) -> Option<&ResponseSpec> {
        match &self.outcome {
            ExecutionOutcome::Response(response) => Some(response),
            ExecutionOutcome::Error(_) => None,
        }
    }

    /// Returns the error message, if the request failed before a response.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            ExecutionOutcome::Response(_) => None,
            ExecutionOutcome::Error(message) => Some(message),
        }
    }

    /// Returns true for a 2xx response.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        match &self.outcome {
            ExecutionOutcome::Response(response) => response.is_success(),
            ExecutionOutcome::Error(_) => false,
        }
    }
}

/// The outcome of running a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Name of the executed collection
    pub collection_name: String,
    /// Name of the environment the caller ran against
    pub environment_name: String,
    /// Batch start
    pub start_time: DateTime<Utc>,
    /// Batch end
    pub end_time: DateTime<Utc>,
    /// Wall-clock time of the whole batch
    #[serde(with = "crate::duration_millis")]
    pub total_duration: Duration,
    /// One record per processed item, in processing order
    pub requests: Vec<RequestExecution>,
    /// Aggregates over `requests`
    pub statistics: Statistics,
}

impl ExecutionResult {
    /// Builds a result, computing statistics from the records.
    #[must_use]
    pub fn new(
        collection_name: impl Into<String>,
        environment_name: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        total_duration: Duration,
        requests: Vec<RequestExecution>,
    ) -> Self {
        let statistics = Statistics::from_executions(&requests);
        Self {
            collection_name: collection_name.into(),
            environment_name: environment_name.into(),
            start_time,
            end_time,
            total_duration,
            requests,
            statistics,
        }
    }
}
