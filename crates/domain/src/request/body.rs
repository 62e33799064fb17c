//! HTTP Request body types

use serde::{Deserialize, Serialize};

/// The kind of request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BodyKind {
    /// JSON document
    Json,
    /// XML document
    Xml,
    /// Free-form text
    #[default]
    Raw,
    /// Opaque bytes, never scanned for placeholders
    Binary,
    /// Multipart form data, stored pre-encoded
    #[serde(rename = "formdata")]
    FormData,
    /// Form URL encoded pairs
    #[serde(rename = "urlencoded")]
    UrlEncoded,
}

impl BodyKind {
    /// Returns the identifier used in stored collections.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
            Self::Raw => "raw",
            Self::Binary => "binary",
            Self::FormData => "formdata",
            Self::UrlEncoded => "urlencoded",
        }
    }
}

/// HTTP request body with content and type information.
///
/// Content is stored as bytes and serialized as base64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RequestBody {
    /// The kind of body
    #[serde(rename = "type", default)]
    pub kind: BodyKind,
    /// The body content
    #[serde(default, with = "base64_bytes")]
    pub content: Vec<u8>,
    /// Value for the `Content-Type` header, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl RequestBody {
    /// Creates a body of the given kind.
    #[must_use]
    pub fn new(kind: BodyKind, content: impl Into<Vec<u8>>, content_type: Option<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            content_type,
        }
    }

    /// Creates a JSON body.
    #[must_use]
    pub fn json(content: impl Into<String>) -> Self {
        Self::new(
            BodyKind::Json,
            content.into(),
            Some(mime::APPLICATION_JSON.to_string()),
        )
    }

    /// Creates an XML body.
    #[must_use]
    pub fn xml(content: impl Into<String>) -> Self {
        Self::new(BodyKind::Xml, content.into(), Some("application/xml".to_string()))
    }

    /// Creates a raw text body with an explicit content type.
    #[must_use]
    pub fn raw(content: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self::new(BodyKind::Raw, content.into(), Some(content_type.into()))
    }

    /// Creates a binary body.
    #[must_use]
    pub fn binary(content: impl Into<Vec<u8>>, content_type: impl Into<String>) -> Self {
        Self::new(BodyKind::Binary, content, Some(content_type.into()))
    }

    /// Creates a form URL encoded body from already-encoded content.
    #[must_use]
    pub fn form_urlencoded(content: impl Into<String>) -> Self {
        Self::new(
            BodyKind::UrlEncoded,
            content.into(),
            Some(mime::APPLICATION_WWW_FORM_URLENCODED.to_string()),
        )
    }

    /// Returns whether the content is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Returns true if the content may contain placeholders.
    #[must_use]
    pub const fn is_textual(&self) -> bool {
        !matches!(self.kind, BodyKind::Binary)
    }

    /// Returns the content as UTF-8 text, if it is valid UTF-8.
    #[must_use]
    pub fn content_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.content).ok()
    }

    /// Returns the content type if one was provided.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref().filter(|ct| !ct.is_empty())
    }
}

mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
