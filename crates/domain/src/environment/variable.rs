//! Environment variable types

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A collection of variables keyed by name.
pub type VariableMap = HashMap<String, String>;

/// An environment shared between the caller that owns it and the resolvers reading it.
///
/// Writers take the lock for each mutation; resolvers take a read lock per lookup.
pub type SharedEnvironment = Arc<RwLock<Environment>>;

/// A named set of variables.
///
/// Two environments take part in resolution: the process-wide "global"
/// environment and an optional "local" one bound to the loaded collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    /// Environment name (e.g., "global", "staging").
    pub name: String,
    /// Variables keyed by name. Names are case-sensitive.
    #[serde(default)]
    pub variables: VariableMap,
}

impl Environment {
    /// Creates a new empty environment with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: VariableMap::new(),
        }
    }

    /// Creates an environment pre-populated with variables.
    #[must_use]
    pub fn with_variables<K, V>(name: impl Into<String>, variables: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            variables: variables
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Wraps this environment for sharing with a resolver.
    #[must_use]
    pub fn into_shared(self) -> SharedEnvironment {
        Arc::new(RwLock::new(self))
    }

    /// Adds or overwrites a variable.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Gets a variable value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    /// Returns true if the variable is defined.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Removes a variable, returning its previous value.
    pub fn delete(&mut self, name: &str) -> Option<String> {
        self.variables.remove(name)
    }

    /// Removes every variable.
    pub fn clear(&mut self) {
        self.variables.clear();
    }

    /// Returns the number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Returns true if no variables are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Returns variable names sorted alphabetically.
    #[must_use]
    pub fn variable_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.variables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Checks that the environment can be persisted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidEnvironment` if the name is blank.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidEnvironment(
                "environment name is required".to_string(),
            ));
        }
        Ok(())
    }
}
