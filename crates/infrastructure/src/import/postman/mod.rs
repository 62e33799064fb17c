//! Postman Import Module
//!
//! Converts Postman Collection v2.0/v2.1 and Postman Environment exports into
//! Relay collections and environments.

pub mod environment_types;
pub mod importer;
pub mod types;

pub use environment_types::PostmanEnvironment;
pub use importer::{ImportConfig, ImportError, PostmanImporter};
pub use types::PostmanCollection;
