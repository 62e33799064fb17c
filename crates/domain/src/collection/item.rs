//! Collection and collection item types

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::request::RequestSpec;

/// A named request template within a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionItem {
    /// Item name, used for selective execution
    pub name: String,
    /// The request template
    pub request: RequestSpec,
}

impl CollectionItem {
    /// Creates a new item.
    #[must_use]
    pub fn new(name: impl Into<String>, request: RequestSpec) -> Self {
        Self {
            name: name.into(),
            request,
        }
    }
}

/// An ordered list of request templates executed as one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// Collection name
    pub name: String,
    /// Free-form description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Environment bound as the local environment when the collection runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_name: Option<String>,
    /// Items in execution order
    #[serde(default)]
    pub items: Vec<CollectionItem>,
}

impl Collection {
    /// Creates a new empty collection.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the environment bound when the collection runs.
    #[must_use]
    pub fn with_environment(mut self, environment_name: impl Into<String>) -> Self {
        self.environment_name = Some(environment_name.into());
        self
    }

    /// Appends an item.
    #[must_use]
    pub fn with_item(mut self, name: impl Into<String>, request: RequestSpec) -> Self {
        self.items.push(CollectionItem::new(name, request));
        self
    }

    /// Appends an item.
    pub fn add_item(&mut self, item: CollectionItem) {
        self.items.push(item);
    }

    /// Returns the item names in collection order.
    #[must_use]
    pub fn item_names(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.name.as_str()).collect()
    }

    /// Finds the first item with exactly this name.
    #[must_use]
    pub fn find_item(&self, name: &str) -> Option<&CollectionItem> {
        self.items.iter().find(|item| item.name == name)
    }

    /// Returns the number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the collection has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Checks that the collection and every item are named.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCollection` describing the first problem.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidCollection(
                "collection name is required".to_string(),
            ));
        }
        if let Some(index) = self.items.iter().position(|i| i.name.trim().is_empty()) {
            return Err(DomainError::InvalidCollection(format!(
                "item {index} has no name"
            )));
        }
        Ok(())
    }
}
