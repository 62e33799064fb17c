//! Single request execution use case.

use std::sync::Arc;
use std::time::Instant;

use relay_domain::{DomainError, RequestExecution, RequestSpec};
use tracing::{debug, warn};

use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::HttpClient;
use crate::variable_resolver::VariableResolver;

/// Use case for sending one request template outside of a collection run.
pub struct ExecuteRequest<C> {
    client: Arc<C>,
    resolver: VariableResolver,
}

impl<C: HttpClient> ExecuteRequest<C> {
    /// Creates a new `ExecuteRequest` use case.
    #[must_use]
    pub const fn new(client: Arc<C>, resolver: VariableResolver) -> Self {
        Self { client, resolver }
    }

    /// Checks method, URL and that every placeholder is bound.
    ///
    /// # Errors
    ///
    /// - `ApplicationError::InvalidRequest` if method or URL is missing
    /// - `ApplicationError::VariableNotFound` for the first unbound placeholder
    pub fn validate(&self, request: &RequestSpec) -> ApplicationResult<()> {
        request.validate().map_err(|e| match e {
            DomainError::InvalidRequest(reason) => ApplicationError::InvalidRequest(reason),
            other => ApplicationError::Domain(other),
        })?;
        self.resolver.validate_request(request)
    }

    /// Resolves and sends the request.
    ///
    /// A transport failure after dispatch is recorded in the returned
    /// execution rather than returned as an error.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails, a placeholder is unbound or the
    /// resolved URL is malformed.
    pub async fn execute(&self, request: &RequestSpec) -> ApplicationResult<RequestExecution> {
        self.validate(request)?;
        let resolved = self.resolver.resolve_request(request)?;
        resolved.parse_url()?;

        debug!(method = %resolved.method, url = %resolved.url, "executing request");
        let started = Instant::now();
        let outcome = self.client.execute(&resolved).await;
        let duration = started.elapsed();

        Ok(match outcome {
            Ok(response) => RequestExecution::from_response(resolved.into_spec(), response, duration),
            Err(e) => {
                warn!(url = %resolved.url, error = %e, "request failed");
                let error = ApplicationError::RequestFailed(e).to_string();
                RequestExecution::failed(resolved.into_spec(), error, duration)
            }
        })
    }
}
