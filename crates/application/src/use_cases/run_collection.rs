//! Run a stored collection use case.

use std::sync::Arc;

use relay_domain::ExecutionResult;
use tracing::info;

use super::CollectionExecutor;
use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::{CollectionStorage, EnvironmentStorage, HttpClient};
use crate::variable_resolver::VariableResolver;

/// Input for running a collection.
#[derive(Debug, Clone, Default)]
pub struct RunCollectionInput {
    /// Name of the stored collection.
    pub collection_name: String,
    /// Items to run; empty runs all of them.
    pub item_names: Vec<String>,
}

impl RunCollectionInput {
    /// Runs every item of the named collection.
    #[must_use]
    pub fn all(collection_name: impl Into<String>) -> Self {
        Self {
            collection_name: collection_name.into(),
            item_names: Vec::new(),
        }
    }

    /// Restricts the run to the given items.
    #[must_use]
    pub fn with_items(mut self, item_names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.item_names = item_names.into_iter().map(Into::into).collect();
        self
    }
}

/// Loads a collection, binds its environment as the local one and executes it.
pub struct RunCollection<CS, ES, C> {
    collections: CS,
    environments: ES,
    client: Arc<C>,
    resolver: VariableResolver,
}

impl<CS, ES, C> RunCollection<CS, ES, C>
where
    CS: CollectionStorage,
    ES: EnvironmentStorage,
    C: HttpClient + 'static,
{
    /// Creates a new `RunCollection` use case.
    ///
    /// The resolver supplies the global environment; any local environment it
    /// carries is replaced per run.
    #[must_use]
    pub const fn new(collections: CS, environments: ES, client: Arc<C>, resolver: VariableResolver) -> Self {
        Self {
            collections,
            environments,
            client,
            resolver,
        }
    }

    /// Executes the use case.
    ///
    /// # Errors
    ///
    /// - `ApplicationError::InvalidArgument` if the collection name is empty
    /// - `ApplicationError::NotFound` if the collection or its environment is missing
    /// - `ApplicationError::Domain` if the stored collection is invalid
    pub async fn execute(&self, input: RunCollectionInput) -> ApplicationResult<ExecutionResult> {
        if input.collection_name.trim().is_empty() {
            return Err(ApplicationError::InvalidArgument(
                "collection name is required".to_string(),
            ));
        }

        let collection = self.collections.load(&input.collection_name).await?;
        collection.validate()?;

        let mut resolver = self.resolver.clone();
        let environment_name = match &collection.environment_name {
            Some(name) => {
                let environment = self.environments.load(name).await?;
                info!(collection = %collection.name, environment = %name, "bound local environment");
                resolver.set_local(Some(environment.into_shared()));
                name.clone()
            }
            None => {
                resolver.set_local(None);
                resolver.active_environment_name()
            }
        };

        let executor = CollectionExecutor::new(Arc::clone(&self.client), resolver);
        Ok(executor
            .execute_selective(&collection, &environment_name, &input.item_names)
            .await)
    }
}
