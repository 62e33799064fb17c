//! Authentication descriptor types

use std::fmt;

use serde::{Deserialize, Serialize};

/// Authentication descriptor for a request.
///
/// Credential fields may contain placeholders. Empty credential fields are
/// left untouched by resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Auth {
    /// HTTP Basic authentication
    Basic {
        /// Username
        #[serde(default)]
        username: String,
        /// Password
        #[serde(default)]
        password: String,
    },
    /// Bearer token sent as `Authorization: Bearer <token>`
    Bearer {
        /// The token
        #[serde(default)]
        token: String,
    },
    /// API key sent in a header or query parameter
    #[serde(rename = "apikey")]
    ApiKey {
        /// The key value
        #[serde(default)]
        key: String,
        /// Header or query parameter name
        key_name: String,
        /// Where to add the key
        #[serde(default)]
        location: ApiKeyLocation,
    },
}

/// Location for API key authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyLocation {
    /// Add to request headers
    #[default]
    Header,
    /// Add to query parameters
    Query,
}

impl fmt::Display for ApiKeyLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Header => f.write_str("header"),
            Self::Query => f.write_str("query"),
        }
    }
}

impl Auth {
    /// Creates a basic authentication.
    #[must_use]
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Creates a bearer token authentication.
    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Creates an API key authentication.
    #[must_use]
    pub fn api_key(
        key_name: impl Into<String>,
        key: impl Into<String>,
        location: ApiKeyLocation,
    ) -> Self {
        Self::ApiKey {
            key: key.into(),
            key_name: key_name.into(),
            location,
        }
    }

    /// Returns the scheme identifier ("basic", "bearer", "apikey").
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Basic { .. } => "basic",
            Self::Bearer { .. } => "bearer",
            Self::ApiKey { .. } => "apikey",
        }
    }

    /// Iterates over the credential fields that take part in variable resolution.
    pub fn credentials(&self) -> impl Iterator<Item = &str> {
        let fields: Vec<&str> = match self {
            Self::Basic { username, password } => vec![username.as_str(), password.as_str()],
            Self::Bearer { token } => vec![token.as_str()],
            Self::ApiKey { key, .. } => vec![key.as_str()],
        };
        fields.into_iter()
    }

    /// Builds a copy with every non-empty credential passed through `f`.
    ///
    /// Empty credentials are copied as-is. The API key name and location are
    /// never transformed.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `f`.
    pub fn try_map_credentials<E>(
        &self,
        mut f: impl FnMut(&str) -> Result<String, E>,
    ) -> Result<Self, E> {
        let mut apply = |value: &str| -> Result<String, E> {
            if value.is_empty() {
                Ok(String::new())
            } else {
                f(value)
            }
        };

        Ok(match self {
            Self::Basic { username, password } => Self::Basic {
                username: apply(username)?,
                password: apply(password)?,
            },
            Self::Bearer { token } => Self::Bearer {
                token: apply(token)?,
            },
            Self::ApiKey {
                key,
                key_name,
                location,
            } => Self::ApiKey {
                key: apply(key)?,
                key_name: key_name.clone(),
                location: *location,
            },
        })
    }
}
