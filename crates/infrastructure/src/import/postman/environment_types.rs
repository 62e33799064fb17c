//! Postman Environment Type Definitions

use serde::Deserialize;

/// Root structure for a Postman environment export.
#[derive(Debug, Clone, Deserialize)]
pub struct PostmanEnvironment {
    /// Environment name
    pub name: String,
    /// Environment variables
    #[serde(default)]
    pub values: Vec<PostmanEnvVariable>,
}

/// Postman environment variable
#[derive(Debug, Clone, Deserialize)]
pub struct PostmanEnvVariable {
    /// Variable key/name
    pub key: String,
    /// Variable value
    #[serde(default)]
    pub value: String,
    /// Whether the variable is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,
}

const fn default_true() -> bool {
    true
}
