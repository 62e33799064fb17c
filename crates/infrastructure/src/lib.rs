//! Relay Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus configuration loading,
//! Postman import, plain-text formatting and tracing setup.

pub mod adapters;
pub mod config;
pub mod format;
pub mod import;
pub mod persistence;
pub mod serialization;
pub mod telemetry;

pub use adapters::{ClientConfig, ReqwestHttpClient};
pub use config::{ConfigError, LogFormat, LoggingConfig, RelayConfig};
pub use format::{format_execution_result, format_request, format_response, format_statistics};
pub use import::{ImportConfig, ImportError, PostmanImporter};
pub use persistence::FileStorage;
pub use serialization::{
    SerializationError, from_json, from_json_bytes, to_json_stable, to_json_stable_bytes,
};
pub use telemetry::init_tracing;
