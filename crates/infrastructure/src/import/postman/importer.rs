//! Postman Importer - Main Import Logic
//!
//! Folders are flattened depth-first into a single ordered item list: a
//! request item comes before the items nested under it.

use std::path::{Path, PathBuf};

use relay_domain::{
    ApiKeyLocation, Auth, BodyKind, Collection, CollectionItem, Environment, RequestBody,
    RequestSpec,
};
use thiserror::Error;
use tracing::{debug, info};
use url::form_urlencoded::byte_serialize;

use super::environment_types::PostmanEnvironment;
use super::types::{
    PostmanAuth, PostmanAuthParams, PostmanBody, PostmanCollection, PostmanFormParam, PostmanItem,
    PostmanRequest,
};

/// Import configuration options
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Maximum file size in bytes (default: 10MB)
    pub max_file_size: usize,
    /// Maximum folder nesting depth (default: 10)
    pub max_depth: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024,
            max_depth: 10,
        }
    }
}

/// Import error types
#[derive(Debug, Error)]
pub enum ImportError {
    /// The file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
    /// File exceeds the maximum allowed size
    #[error("file too large: {size} bytes exceeds maximum of {max} bytes")]
    FileTooLarge {
        /// Actual file size in bytes
        size: usize,
        /// Maximum allowed size in bytes
        max: usize,
    },
    /// JSON parsing failed
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    /// The JSON is not a Postman export of the expected kind
    #[error("invalid Postman format: {0}")]
    InvalidFormat(String),
    /// Folders are nested deeper than allowed
    #[error("folders nested deeper than {max} levels")]
    TooDeep {
        /// Configured limit
        max: usize,
    },
}

/// Main Postman importer
#[derive(Debug, Clone, Default)]
pub struct PostmanImporter {
    config: ImportConfig,
}

impl PostmanImporter {
    /// Create a new importer with default config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new importer with custom config
    #[must_use]
    pub const fn with_config(config: ImportConfig) -> Self {
        Self { config }
    }

    /// Converts a Postman collection export into a collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is too large, is not JSON, is not a
    /// Postman collection or nests folders too deeply.
    pub fn import_str(&self, content: &str) -> Result<Collection, ImportError> {
        self.check_size(content)?;
        let json: serde_json::Value = serde_json::from_str(content)?;
        if json.get("info").is_none() {
            return Err(ImportError::InvalidFormat(
                "missing \"info\" object".to_string(),
            ));
        }

        let postman: PostmanCollection = serde_json::from_value(json)?;
        if postman.info.name.trim().is_empty() {
            return Err(ImportError::InvalidFormat(
                "collection name is required".to_string(),
            ));
        }

        let mut collection = Collection::new(&postman.info.name);
        if let Some(description) = &postman.info.description {
            collection.description = description.text().to_string();
        }
        self.flatten(&postman.item, postman.auth.as_ref(), 0, &mut collection.items)?;

        info!(
            collection = %collection.name,
            items = collection.items.len(),
            "imported Postman collection"
        );
        Ok(collection)
    }

    /// Reads and converts a Postman collection file.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::Io` if the file cannot be read, otherwise as
    /// [`import_str`](Self::import_str).
    pub fn import_file(&self, path: &Path) -> Result<Collection, ImportError> {
        self.import_str(&read_file(path)?)
    }

    /// Converts a Postman environment export. Disabled variables are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is too large or not a Postman environment.
    pub fn import_environment_str(&self, content: &str) -> Result<Environment, ImportError> {
        self.check_size(content)?;
        let postman: PostmanEnvironment = serde_json::from_str(content)?;
        if postman.name.trim().is_empty() {
            return Err(ImportError::InvalidFormat(
                "environment name is required".to_string(),
            ));
        }

        Ok(Environment::with_variables(
            postman.name,
            postman
                .values
                .into_iter()
                .filter(|v| v.enabled)
                .map(|v| (v.key, v.value)),
        ))
    }

    /// Reads and converts a Postman environment file.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::Io` if the file cannot be read, otherwise as
    /// [`import_environment_str`](Self::import_environment_str).
    pub fn import_environment_file(&self, path: &Path) -> Result<Environment, ImportError> {
        self.import_environment_str(&read_file(path)?)
    }

    const fn check_size(&self, content: &str) -> Result<(), ImportError> {
        if content.len() > self.config.max_file_size {
            return Err(ImportError::FileTooLarge {
                size: content.len(),
                max: self.config.max_file_size,
            });
        }
        Ok(())
    }

    fn flatten(
        &self,
        items: &[PostmanItem],
        inherited_auth: Option<&PostmanAuth>,
        depth: usize,
        out: &mut Vec<CollectionItem>,
    ) -> Result<(), ImportError> {
        if depth > self.config.max_depth {
            return Err(ImportError::TooDeep {
                max: self.config.max_depth,
            });
        }

        for item in items {
            let scope_auth = item.auth.as_ref().or(inherited_auth);

            if let Some(request) = &item.request {
                out.push(CollectionItem::new(
                    &item.name,
                    convert_request(request, scope_auth),
                ));
            }
            if let Some(children) = &item.item {
                self.flatten(children, scope_auth, depth + 1, out)?;
            }
        }
        Ok(())
    }
}

fn read_file(path: &Path) -> Result<String, ImportError> {
    std::fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn convert_request(request: &PostmanRequest, inherited_auth: Option<&PostmanAuth>) -> RequestSpec {
    let method = match request.method.trim() {
        "" => "GET".to_string(),
        method => method.to_uppercase(),
    };

    let mut spec = RequestSpec::new(method, request.url.raw());
    for header in request.header.iter().filter(|h| !h.disabled) {
        spec.headers.insert(header.key.clone(), header.value.clone());
    }
    spec.body = request.body.as_ref().and_then(convert_body);
    spec.auth = request
        .auth
        .as_ref()
        .or(inherited_auth)
        .and_then(convert_auth);
    spec
}

fn convert_body(body: &PostmanBody) -> Option<RequestBody> {
    match body.mode.to_lowercase().as_str() {
        "raw" => {
            let raw = body.raw.clone().unwrap_or_default();
            let language = body.raw_language().map(str::to_lowercase);
            Some(match language.as_deref() {
                Some("json") => RequestBody::json(raw),
                Some("xml") => RequestBody::xml(raw),
                Some(_) => RequestBody::raw(raw, mime::TEXT_PLAIN.as_ref()),
                None => sniff_raw(raw),
            })
        }
        "urlencoded" => Some(RequestBody::form_urlencoded(encode_pairs(&body.urlencoded))),
        "formdata" => Some(RequestBody::new(
            BodyKind::FormData,
            encode_pairs(&body.formdata),
            Some(mime::MULTIPART_FORM_DATA.to_string()),
        )),
        mode => {
            debug!(mode, "unsupported Postman body mode, dropping body");
            None
        }
    }
}

/// Picks JSON, XML or plain text from the raw content itself.
fn sniff_raw(raw: String) -> RequestBody {
    let trimmed = raw.trim_start();
    if (trimmed.starts_with('{') || trimmed.starts_with('['))
        && serde_json::from_str::<serde_json::Value>(&raw).is_ok()
    {
        RequestBody::json(raw)
    } else if trimmed.starts_with('<') {
        RequestBody::xml(raw)
    } else {
        RequestBody::raw(raw, mime::TEXT_PLAIN.as_ref())
    }
}

fn encode_pairs(params: &[PostmanFormParam]) -> String {
    params
        .iter()
        .filter(|p| !p.disabled && p.param_type.as_deref() != Some("file"))
        .map(|p| {
            let key: String = byte_serialize(p.key.as_bytes()).collect();
            let value: String = byte_serialize(p.value.as_deref().unwrap_or_default().as_bytes()).collect();
            format!("{key}={value}")
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn convert_auth(auth: &PostmanAuth) -> Option<Auth> {
    let get = |params: Option<&PostmanAuthParams>, key: &str| {
        params.and_then(|p| p.get(key)).unwrap_or_default()
    };

    match auth.auth_type.to_lowercase().as_str() {
        "basic" => Some(Auth::basic(
            get(auth.basic.as_ref(), "username"),
            get(auth.basic.as_ref(), "password"),
        )),
        "bearer" => Some(Auth::bearer(get(auth.bearer.as_ref(), "token"))),
        "apikey" => {
            let location = match get(auth.apikey.as_ref(), "in").as_str() {
                "query" => ApiKeyLocation::Query,
                _ => ApiKeyLocation::Header,
            };
            Some(Auth::api_key(
                get(auth.apikey.as_ref(), "key"),
                get(auth.apikey.as_ref(), "value"),
                location,
            ))
        }
        other => {
            debug!(auth_type = other, "unsupported Postman auth type, dropping auth");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_collection() -> &'static str {
        r#"{
            "info": {
                "name": "Users API",
                "description": "User management",
                "schema": "https://schema.getpostman.com/json/collection/v2.1.0/collection.json"
            },
            "auth": {"type": "bearer", "bearer": [{"key": "token", "value": "{{token}}"}]},
            "item": [
                {
                    "name": "List users",
                    "request": {
                        "method": "get",
                        "url": {"raw": "{{baseUrl}}/users?page=1", "host": ["{{baseUrl}}"]},
                        "header": [
                            {"key": "Accept", "value": "application/json"},
                            {"key": "X-Debug", "value": "1", "disabled": true}
                        ]
                    }
                },
                {
                    "name": "Admin",
                    "auth": {"type": "basic", "basic": [
                        {"key": "username", "value": "admin"},
                        {"key": "password", "value": "secret"}
                    ]},
                    "item": [
                        {
                            "name": "Create user",
                            "request": {
                                "method": "POST",
                                "url": "{{baseUrl}}/users",
                                "body": {"mode": "raw", "raw": "{\"name\": \"Ada\"}"}
                            }
                        },
                        {
                            "name": "Nested",
                            "item": [
                                {
                                    "name": "Login",
                                    "request": {
                                        "method": "POST",
                                        "url": "{{baseUrl}}/login",
                                        "auth": {"type": "noauth"},
                                        "body": {"mode": "urlencoded", "urlencoded": [
                                            {"key": "user name", "value": "a&b"},
                                            {"key": "skip", "value": "x", "disabled": true},
                                            {"key": "pass", "value": "p=1"}
                                        ]}
                                    }
                                }
                            ]
                        }
                    ]
                },
                {
                    "name": "Key lookup",
                    "request": {
                        "method": "GET",
                        "url": "{{baseUrl}}/keys",
                        "auth": {"type": "apikey", "apikey": [
                            {"key": "key", "value": "X-Api-Key"},
                            {"key": "value", "value": "{{apiKey}}"},
                            {"key": "in", "value": "query"}
                        ]}
                    }
                }
            ]
        }"#
    }

    #[test]
    fn test_import_flattens_depth_first() {
        let collection = PostmanImporter::new().import_str(sample_collection()).unwrap();

        assert_eq!(collection.name, "Users API");
        assert_eq!(collection.description, "User management");
        assert_eq!(
            collection.item_names(),
            vec!["List users", "Create user", "Login", "Key lookup"]
        );
    }

    #[test]
    fn test_request_fields() {
        let collection = PostmanImporter::new().import_str(sample_collection()).unwrap();
        let list = &collection.find_item("List users").unwrap().request;

        assert_eq!(list.method, "GET");
        assert_eq!(list.url, "{{baseUrl}}/users?page=1");
        assert_eq!(list.headers.len(), 1);
        assert_eq!(list.headers["Accept"], "application/json");
        assert_eq!(list.auth, Some(Auth::bearer("{{token}}")));
    }

    #[test]
    fn test_auth_inheritance() {
        let collection = PostmanImporter::new().import_str(sample_collection()).unwrap();

        let create = &collection.find_item("Create user").unwrap().request;
        assert_eq!(create.auth, Some(Auth::basic("admin", "secret")));

        let login = &collection.find_item("Login").unwrap().request;
        assert_eq!(login.auth, None);

        let keys = &collection.find_item("Key lookup").unwrap().request;
        assert_eq!(
            keys.auth,
            Some(Auth::api_key("X-Api-Key", "{{apiKey}}", ApiKeyLocation::Query))
        );
    }

    #[test]
    fn test_bodies() {
        let collection = PostmanImporter::new().import_str(sample_collection()).unwrap();

        let create = collection.find_item("Create user").unwrap().request.body.clone().unwrap();
        assert_eq!(create.kind, BodyKind::Json);
        assert_eq!(create.content_type(), Some("application/json"));

        let login = collection.find_item("Login").unwrap().request.body.clone().unwrap();
        assert_eq!(login.kind, BodyKind::UrlEncoded);
        assert_eq!(login.content_str(), Some("user+name=a%26b&pass=p%3D1"));
        assert_eq!(login.content_type(), Some("application/x-www-form-urlencoded"));
    }

    #[test]
    fn test_raw_sniffing() {
        let body = |raw: &str| PostmanBody {
            mode: "raw".to_string(),
            raw: Some(raw.to_string()),
            urlencoded: Vec::new(),
            formdata: Vec::new(),
            options: None,
        };

        assert_eq!(convert_body(&body("<a/>")).unwrap().kind, BodyKind::Xml);
        assert_eq!(convert_body(&body("[1, 2]")).unwrap().kind, BodyKind::Json);
        let text = convert_body(&body("hello")).unwrap();
        assert_eq!(text.kind, BodyKind::Raw);
        assert_eq!(text.content_type(), Some("text/plain"));
        assert_eq!(convert_body(&body("{broken")).unwrap().kind, BodyKind::Raw);
    }

    #[test]
    fn test_formdata_and_unknown_modes() {
        let json = r#"{
            "info": {"name": "Forms"},
            "item": [
                {"name": "upload", "request": {"method": "POST", "url": "http://x",
                    "body": {"mode": "formdata", "formdata": [
                        {"key": "a", "value": "1", "type": "text"},
                        {"key": "f", "src": "/tmp/file", "type": "file"}
                    ]}}},
                {"name": "gql", "request": {"method": "POST", "url": "http://x",
                    "body": {"mode": "graphql", "graphql": {"query": "{ me }"}}}}
            ]
        }"#;
        let collection = PostmanImporter::new().import_str(json).unwrap();

        let upload = collection.items[0].request.body.clone().unwrap();
        assert_eq!(upload.kind, BodyKind::FormData);
        assert_eq!(upload.content_str(), Some("a=1"));
        assert_eq!(upload.content_type(), Some("multipart/form-data"));
        assert!(collection.items[1].request.body.is_none());
    }

    #[test]
    fn test_rejects_non_collections() {
        let importer = PostmanImporter::new();
        assert!(matches!(importer.import_str("not json"), Err(ImportError::InvalidJson(_))));
        assert!(matches!(
            importer.import_str(r#"{"name": "env", "values": []}"#),
            Err(ImportError::InvalidFormat(_))
        ));
        assert!(matches!(
            importer.import_str(r#"{"info": {"name": ""}}"#),
            Err(ImportError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_size_and_depth_limits() {
        let small = PostmanImporter::with_config(ImportConfig {
            max_file_size: 10,
            ..ImportConfig::default()
        });
        assert!(matches!(
            small.import_str(sample_collection()),
            Err(ImportError::FileTooLarge { .. })
        ));

        let shallow = PostmanImporter::with_config(ImportConfig {
            max_depth: 1,
            ..ImportConfig::default()
        });
        assert!(matches!(
            shallow.import_str(sample_collection()),
            Err(ImportError::TooDeep { max: 1 })
        ));
    }

    #[test]
    fn test_import_environment() {
        let env = PostmanImporter::new()
            .import_environment_str(
                r#"{"name": "Staging", "values": [
                    {"key": "baseUrl", "value": "https://staging"},
                    {"key": "off", "value": "x", "enabled": false}
                ]}"#,
            )
            .unwrap();

        assert_eq!(env.name, "Staging");
        assert_eq!(env.get("baseUrl"), Some("https://staging"));
        assert!(!env.contains("off"));
    }

    #[test]
    fn test_import_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("collection.json");
        std::fs::write(&path, sample_collection()).unwrap();

        let collection = PostmanImporter::new().import_file(&path).unwrap();
        assert_eq!(collection.len(), 4);
        assert!(matches!(
            PostmanImporter::new().import_file(&dir.path().join("missing.json")),
            Err(ImportError::Io { .. })
        ));
    }
}
