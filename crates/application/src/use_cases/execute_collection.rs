//! Collection execution engine.
//!
//! Runs the items of a collection one at a time: each request is resolved
//! against the bound environments, dispatched through the [`HttpClient`] port
//! and recorded. Failures never stop the batch.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use relay_domain::{Collection, CollectionItem, ExecutionResult, RequestExecution};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::ApplicationError;
use crate::ports::HttpClient;
use crate::variable_resolver::VariableResolver;

/// Records produced by [`CollectionExecutor::execute_all_async`], in collection order.
///
/// Dropping the stream stops the producer before it sends the next record;
/// a request already in flight still completes.
#[derive(Debug)]
pub struct ExecutionStream {
    receiver: mpsc::Receiver<RequestExecution>,
}

impl ExecutionStream {
    /// Waits for the next record. Returns `None` once every item was processed.
    pub async fn next(&mut self) -> Option<RequestExecution> {
        self.receiver.recv().await
    }

    /// Drains the stream into a vector.
    pub async fn into_vec(mut self) -> Vec<RequestExecution> {
        let mut records = Vec::new();
        while let Some(record) = self.next().await {
            records.push(record);
        }
        records
    }
}

/// Executes collections against an HTTP client.
pub struct CollectionExecutor<C> {
    client: Arc<C>,
    resolver: VariableResolver,
}

impl<C: HttpClient + 'static> CollectionExecutor<C> {
    /// Creates an executor.
    #[must_use]
    pub const fn new(client: Arc<C>, resolver: VariableResolver) -> Self {
        Self { client, resolver }
    }

    /// Returns the resolver.
    #[must_use]
    pub const fn resolver(&self) -> &VariableResolver {
        &self.resolver
    }

    /// Returns the resolver for rebinding environments between runs.
    pub const fn resolver_mut(&mut self) -> &mut VariableResolver {
        &mut self.resolver
    }

    /// Executes every item in collection order.
    pub async fn execute_all(&self, collection: &Collection, environment_name: &str) -> ExecutionResult {
        self.execute_selective(collection, environment_name, &[]).await
    }

    /// Executes the named items in the order given.
    ///
    /// An empty `item_names` selects every item. Unknown names are skipped and
    /// a duplicated item name selects its first occurrence.
    pub async fn execute_selective(
        &self,
        collection: &Collection,
        environment_name: &str,
        item_names: &[String],
    ) -> ExecutionResult {
        let items = select_items(collection, item_names);
        info!(
            collection = %collection.name,
            environment = environment_name,
            items = items.len(),
            "starting collection run"
        );

        let start_time = Utc::now();
        let started = Instant::now();
        let mut records = Vec::with_capacity(items.len());

        for item in items {
            records.push(execute_item(self.client.as_ref(), &self.resolver, item).await);
        }

        let result = ExecutionResult::new(
            &collection.name,
            environment_name,
            start_time,
            Utc::now(),
            started.elapsed(),
            records,
        );
        info!(
            collection = %collection.name,
            total = result.statistics.total,
            success = result.statistics.success,
            failed = result.statistics.failed,
            duration_ms = u64::try_from(result.total_duration.as_millis()).unwrap_or(u64::MAX),
            "collection run finished"
        );
        result
    }

    /// Executes every item on a background task, yielding records as they finish.
    ///
    /// Must be called from within a Tokio runtime. No statistics are computed;
    /// use [`relay_domain::Statistics::from_executions`] on the collected records.
    #[must_use]
    pub fn execute_all_async(&self, collection: &Collection, environment_name: &str) -> ExecutionStream {
        let (sender, receiver) = mpsc::channel(1);
        let client = Arc::clone(&self.client);
        let resolver = self.resolver.clone();
        let items = collection.items.clone();
        let collection_name = collection.name.clone();
        let environment_name = environment_name.to_string();

        tokio::spawn(async move {
            info!(
                collection = %collection_name,
                environment = %environment_name,
                items = items.len(),
                "starting streamed collection run"
            );
            for item in &items {
                let record = execute_item(client.as_ref(), &resolver, item).await;
                if sender.send(record).await.is_err() {
                    debug!(collection = %collection_name, "stream dropped, stopping run");
                    return;
                }
            }
            info!(collection = %collection_name, "streamed collection run finished");
        });

        ExecutionStream { receiver }
    }
}

fn select_items<'a>(collection: &'a Collection, item_names: &[String]) -> Vec<&'a CollectionItem> {
    if item_names.is_empty() {
        return collection.items.iter().collect();
    }
    item_names
        .iter()
        .filter_map(|name| {
            let item = collection.find_item(name);
            if item.is_none() {
                debug!(item = %name, "no item with this name, skipping");
            }
            item
        })
        .collect()
}

async fn execute_item<C: HttpClient + ?Sized>(
    client: &C,
    resolver: &VariableResolver,
    item: &CollectionItem,
) -> RequestExecution {
    let resolved = match resolver.resolve_request(&item.request) {
        Ok(resolved) => resolved,
        Err(e) => {
            warn!(item = %item.name, error = %e, "variable resolution failed");
            return RequestExecution::not_dispatched(
                item.request.clone(),
                format!("failed to resolve variables: {e}"),
            );
        }
    };

    debug!(item = %item.name, method = %resolved.method, url = %resolved.url, "dispatching request");
    let started = Instant::now();
    let outcome = client.execute(&resolved).await;
    let duration = started.elapsed();

    match outcome {
        Ok(response) => {
            debug!(
                item = %item.name,
                status = response.status,
                duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
                "response received"
            );
            RequestExecution::from_response(resolved.into_spec(), response, duration)
        }
        Err(e) => {
            warn!(item = %item.name, error = %e, "request failed");
            let error = ApplicationError::RequestFailed(e).to_string();
            RequestExecution::failed(resolved.into_spec(), error, duration)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::ports::HttpClientError;
    use crate::test_support::MockHttpClient;
    use pretty_assertions::assert_eq;
    use relay_domain::{Environment, RequestSpec, Statistics};
    use std::time::Duration;

    fn executor(client: MockHttpClient, vars: &[(&str, &str)]) -> CollectionExecutor<MockHttpClient> {
        let global = Environment::with_variables("global", vars.iter().copied()).into_shared();
        CollectionExecutor::new(Arc::new(client), VariableResolver::new(global))
    }

    fn sample() -> Collection {
        Collection::new("api")
            .with_item("one", RequestSpec::get("http://h/one"))
            .with_item("two", RequestSpec::get("http://h/two"))
            .with_item("three", RequestSpec::get("http://h/three"))
    }

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[tokio::test]
    async fn test_execute_all_runs_every_item() {
        let exec = executor(MockHttpClient::new(), &[]);
        let result = exec.execute_all(&sample(), "dev").await;

        assert_eq!(result.collection_name, "api");
        assert_eq!(result.environment_name, "dev");
        assert_eq!(result.statistics.total, 3);
        assert_eq!(result.statistics.success, 3);
        assert_eq!(result.statistics.failed, 0);
        assert!(result.statistics.avg_time > Duration::ZERO);
        assert!(result.statistics.min_time <= result.statistics.max_time);
        assert!(result.end_time >= result.start_time);
    }

    #[tokio::test]
    async fn test_empty_selection_matches_execute_all() {
        let exec = executor(MockHttpClient::new(), &[]);
        let selective = exec.execute_selective(&sample(), "dev", &[]).await;
        let all = exec.execute_all(&sample(), "dev").await;
        assert_eq!(selective.statistics.total, all.statistics.total);
    }

    #[tokio::test]
    async fn test_selection_follows_given_order() {
        let client = Arc::new(MockHttpClient::new());
        let global = Environment::new("global").into_shared();
        let exec = CollectionExecutor::new(Arc::clone(&client), VariableResolver::new(global));

        let result = exec
            .execute_selective(&sample(), "dev", &names(&["three", "missing", "one"]))
            .await;

        assert_eq!(result.statistics.total, 2);
        assert_eq!(client.seen_urls(), vec!["http://h/three", "http://h/one"]);
    }

    #[tokio::test]
    async fn test_unknown_selection_is_empty() {
        let exec = executor(MockHttpClient::new(), &[]);
        let result = exec.execute_selective(&sample(), "dev", &names(&["X"])).await;

        assert!(result.requests.is_empty());
        assert_eq!(result.statistics, Statistics::default());
    }

    #[tokio::test]
    async fn test_duplicate_item_names_pick_first() {
        let collection = Collection::new("dup")
            .with_item("same", RequestSpec::get("http://h/first"))
            .with_item("same", RequestSpec::get("http://h/second"));
        let client = Arc::new(MockHttpClient::new());
        let exec = CollectionExecutor::new(
            Arc::clone(&client),
            VariableResolver::new(Environment::new("g").into_shared()),
        );

        exec.execute_selective(&collection, "dev", &names(&["same"])).await;
        assert_eq!(client.seen_urls(), vec!["http://h/first"]);
    }

    #[tokio::test]
    async fn test_resolution_failure_is_recorded() {
        let collection = Collection::new("api")
            .with_item("bad", RequestSpec::get("{{missing}}/x"))
            .with_item("good", RequestSpec::get("http://h/one"));
        let exec = executor(MockHttpClient::new(), &[]);
        let result = exec.execute_all(&collection, "dev").await;

        let bad = &result.requests[0];
        assert!(bad.error().unwrap().contains("failed to resolve variables"));
        assert!(bad.error().unwrap().contains("missing"));
        assert_eq!(bad.duration, Duration::ZERO);
        assert!(bad.response().is_none());
        assert_eq!(bad.request.url, "{{missing}}/x");

        assert!(result.requests[1].is_success());
        assert_eq!(result.statistics.failed, 1);
        assert_eq!(result.statistics.success, 1);
        assert!(result.statistics.min_time > Duration::ZERO);
    }

    #[tokio::test]
    async fn test_transport_and_status_failures() {
        let client = MockHttpClient::new()
            .with_status("http://h/two", 500)
            .with_failure(
                "http://h/three",
                HttpClientError::ConnectionRefused {
                    host: "h".to_string(),
                    port: 80,
                },
            );
        let exec = executor(client, &[]);
        let result = exec.execute_all(&sample(), "dev").await;

        assert_eq!(result.statistics.success, 1);
        assert_eq!(result.statistics.failed, 2);
        assert_eq!(result.requests[1].response().unwrap().status, 500);
        assert!(result.requests[1].error().is_none());
        assert!(result.requests[2].response().is_none());
        assert_eq!(
            result.requests[2].error(),
            Some("request failed: connection refused: h:80")
        );
    }

    #[tokio::test]
    async fn test_variables_resolved_per_request() {
        let client = Arc::new(MockHttpClient::new());
        let global = Environment::new("global").into_shared();
        let local = Environment::with_variables("local", [("baseUrl", "http://x/"), ("id", "7")]).into_shared();
        let exec = CollectionExecutor::new(
            Arc::clone(&client),
            VariableResolver::new(global).with_local(local),
        );
        let collection = Collection::new("api").with_item("user", RequestSpec::get("{{baseUrl}}users/{{id}}"));

        let result = exec.execute_all(&collection, "local").await;
        assert_eq!(result.statistics.success, 1);
        assert_eq!(client.seen_urls(), vec!["http://x/users/7"]);
    }

    #[tokio::test]
    async fn test_records_carry_resolved_request() {
        let exec = executor(MockHttpClient::new(), &[("host", "http://h"), ("token", "t")]);
        let collection = Collection::new("api").with_item(
            "a",
            RequestSpec::get("{{host}}/a")
                .with_header("Authorization", "Bearer {{token}}"),
        );

        let result = exec.execute_all(&collection, "dev").await;
        let record = &result.requests[0];
        assert_eq!(record.request.url, "http://h/a");
        assert_eq!(record.request.headers.get("Authorization").map(String::as_str), Some("Bearer t"));
    }

    #[tokio::test]
    async fn test_async_stream_yields_in_order() {
        let exec = executor(MockHttpClient::new().with_status("http://h/two", 404), &[]);
        let mut stream = exec.execute_all_async(&sample(), "dev");

        let mut urls = Vec::new();
        while let Some(record) = stream.next().await {
            urls.push(record.request.url.clone());
        }
        assert_eq!(urls, vec!["http://h/one", "http://h/two", "http://h/three"]);
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_async_statistics_match_sync() {
        let client = MockHttpClient::new().with_status("http://h/one", 503);
        let exec = executor(client, &[]);

        let records = exec.execute_all_async(&sample(), "dev").into_vec().await;
        let streamed = Statistics::from_executions(&records);
        let batch = exec.execute_all(&sample(), "dev").await.statistics;

        assert_eq!(streamed.total, batch.total);
        assert_eq!(streamed.success, batch.success);
        assert_eq!(streamed.failed, batch.failed);
    }

    #[tokio::test]
    async fn test_dropping_stream_stops_producer() {
        let client = Arc::new(MockHttpClient::new());
        let exec = CollectionExecutor::new(
            Arc::clone(&client),
            VariableResolver::new(Environment::new("g").into_shared()),
        );
        let many = (0..20).fold(Collection::new("many"), |c, i| {
            c.with_item(format!("r{i}"), RequestSpec::get(format!("http://h/{i}")))
        });

        let mut stream = exec.execute_all_async(&many, "dev");
        assert!(stream.next().await.is_some());
        drop(stream);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(client.seen_urls().len() < 20);
    }
}
