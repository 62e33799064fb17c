//! Storage ports

use async_trait::async_trait;
use relay_domain::{Collection, Environment, ExecutionResult, RequestExecution};

use crate::{ApplicationError, ApplicationResult};

/// Port for persisting collections by name.
#[async_trait]
pub trait CollectionStorage: Send + Sync {
    /// Loads a collection by name.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` if no collection has that name.
    async fn load(&self, name: &str) -> ApplicationResult<Collection>;

    /// Saves a collection under its own name, replacing any existing one.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be serialized or written.
    async fn save(&self, collection: &Collection) -> ApplicationResult<()>;

    /// Lists stored collection names, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    async fn list(&self) -> ApplicationResult<Vec<String>>;

    /// Deletes a collection.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` if no collection has that name.
    async fn delete(&self, name: &str) -> ApplicationResult<()>;

    /// Checks if a collection exists.
    async fn exists(&self, name: &str) -> ApplicationResult<bool> {
        Ok(self.list().await?.iter().any(|n| n == name))
    }
}

/// Port for persisting environments by name.
#[async_trait]
pub trait EnvironmentStorage: Send + Sync {
    /// Loads an environment by name.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` if no environment has that name.
    async fn load(&self, name: &str) -> ApplicationResult<Environment>;

    /// Saves an environment under its own name, replacing any existing one.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment cannot be serialized or written.
    async fn save(&self, environment: &Environment) -> ApplicationResult<()>;

    /// Lists stored environment names, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    async fn list(&self) -> ApplicationResult<Vec<String>>;

    /// Deletes an environment.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` if no environment has that name.
    async fn delete(&self, name: &str) -> ApplicationResult<()>;

    /// Checks if an environment exists.
    async fn exists(&self, name: &str) -> ApplicationResult<bool> {
        Ok(self.list().await?.iter().any(|n| n == name))
    }
}

/// Port for the run history: one stored [`ExecutionResult`] per collection run.
///
/// Ids order chronologically; `list` returns the newest first.
#[async_trait]
pub trait HistoryStorage: Send + Sync {
    /// Stores a run and returns its id. Never overwrites an earlier run.
    ///
    /// # Errors
    ///
    /// Returns an error if the result cannot be serialized or written.
    async fn save(&self, result: &ExecutionResult) -> ApplicationResult<String>;

    /// Loads a run by id.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` if no run has that id.
    async fn load(&self, id: &str) -> ApplicationResult<ExecutionResult>;

    /// Lists run ids, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    async fn list(&self) -> ApplicationResult<Vec<String>>;

    /// Removes every stored run.
    ///
    /// # Errors
    ///
    /// Returns an error if an entry cannot be removed.
    async fn clear(&self) -> ApplicationResult<()>;

    /// Loads the most recent run.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` if the history is empty.
    async fn latest(&self) -> ApplicationResult<ExecutionResult> {
        let ids = self.list().await?;
        let Some(id) = ids.first() else {
            return Err(ApplicationError::NotFound("no execution history".to_string()));
        };
        self.load(id).await
    }

    /// Request records of the `limit` newest runs, newest run first.
    ///
    /// Runs that fail to load are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be listed.
    async fn recent_executions(&self, limit: usize) -> ApplicationResult<Vec<RequestExecution>> {
        let mut executions = Vec::new();
        for id in self.list().await?.iter().take(limit) {
            if let Ok(result) = self.load(id).await {
                executions.extend(result.requests);
            }
        }
        Ok(executions)
    }
}
