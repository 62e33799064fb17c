//! Importers for third-party collection formats.

pub mod postman;

pub use postman::{ImportConfig, ImportError, PostmanImporter};
