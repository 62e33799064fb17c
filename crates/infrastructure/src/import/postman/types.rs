//! Postman Collection v2.0/v2.1 Type Definitions
//!
//! Only the parts that map onto Relay collections are modelled. Fields use
//! `#[serde(default)]` to tolerate format variations.

#![allow(missing_docs)]

use std::collections::HashMap;

use serde::Deserialize;

/// Root structure for a Postman collection
#[derive(Debug, Clone, Deserialize)]
pub struct PostmanCollection {
    pub info: PostmanInfo,
    #[serde(default)]
    pub item: Vec<PostmanItem>,
    #[serde(default)]
    pub auth: Option<PostmanAuth>,
}

/// Collection metadata
#[derive(Debug, Clone, Deserialize)]
pub struct PostmanInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<PostmanDescription>,
    #[serde(default)]
    pub schema: Option<String>,
}

/// A description is either plain text or an object with a `content` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PostmanDescription {
    Text(String),
    Object {
        #[serde(default)]
        content: String,
    },
}

impl PostmanDescription {
    /// Returns the description text.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) | Self::Object { content: text } => text,
        }
    }
}

/// An item is a folder (has `item`), a request (has `request`), or both
#[derive(Debug, Clone, Deserialize)]
pub struct PostmanItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub item: Option<Vec<Self>>,
    #[serde(default)]
    pub request: Option<PostmanRequest>,
    /// Folder-level auth inherited by nested requests
    #[serde(default)]
    pub auth: Option<PostmanAuth>,
}

/// Postman request definition
#[derive(Debug, Clone, Deserialize)]
pub struct PostmanRequest {
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub url: PostmanUrl,
    #[serde(default)]
    pub header: Vec<PostmanHeader>,
    #[serde(default)]
    pub body: Option<PostmanBody>,
    #[serde(default)]
    pub auth: Option<PostmanAuth>,
}

/// URL can be either a simple string or a structured object
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(untagged)]
pub enum PostmanUrl {
    #[default]
    Empty,
    Simple(String),
    Structured(PostmanUrlStructured),
}

impl PostmanUrl {
    /// Get the raw URL string
    #[must_use]
    pub fn raw(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Simple(s) => s.clone(),
            Self::Structured(s) => s.raw.clone().unwrap_or_default(),
        }
    }
}

/// Structured URL object
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PostmanUrlStructured {
    #[serde(default)]
    pub raw: Option<String>,
}

/// Request header
#[derive(Debug, Clone, Deserialize)]
pub struct PostmanHeader {
    pub key: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub disabled: bool,
}

/// Request body
#[derive(Debug, Clone, Deserialize)]
pub struct PostmanBody {
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub raw: Option<String>,
    #[serde(default)]
    pub urlencoded: Vec<PostmanFormParam>,
    #[serde(default)]
    pub formdata: Vec<PostmanFormParam>,
    #[serde(default)]
    pub options: Option<PostmanBodyOptions>,
}

impl PostmanBody {
    /// Returns the declared raw language (e.g. "json"), if any.
    #[must_use]
    pub fn raw_language(&self) -> Option<&str> {
        self.options
            .as_ref()
            .and_then(|o| o.raw.as_ref())
            .and_then(|r| r.language.as_deref())
    }
}

/// Form parameter shared by `urlencoded` and `formdata` modes
#[derive(Debug, Clone, Deserialize)]
pub struct PostmanFormParam {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(rename = "type", default)]
    pub param_type: Option<String>,
    #[serde(default)]
    pub disabled: bool,
}

/// Body options (e.g., raw language)
#[derive(Debug, Clone, Deserialize)]
pub struct PostmanBodyOptions {
    #[serde(default)]
    pub raw: Option<PostmanRawOptions>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostmanRawOptions {
    #[serde(default)]
    pub language: Option<String>,
}

/// Authentication configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PostmanAuth {
    #[serde(rename = "type")]
    pub auth_type: String,
    #[serde(default)]
    pub basic: Option<PostmanAuthParams>,
    #[serde(default)]
    pub bearer: Option<PostmanAuthParams>,
    #[serde(default)]
    pub apikey: Option<PostmanAuthParams>,
}

/// Auth parameters: a key/value list in v2.1, a plain object in v2.0
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PostmanAuthParams {
    List(Vec<PostmanAuthParam>),
    Map(HashMap<String, serde_json::Value>),
}

impl PostmanAuthParams {
    /// Get a parameter value by key, stringifying non-string values
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match self {
            Self::List(params) => params.iter().find(|p| p.key == key)?.value.as_ref()?,
            Self::Map(map) => map.get(key)?,
        };
        Some(match value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        })
    }
}

/// Auth parameter (key-value pair)
#[derive(Debug, Clone, Deserialize)]
pub struct PostmanAuthParam {
    pub key: String,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}
