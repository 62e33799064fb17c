//! Relay Domain - Core business types
//!
//! This crate defines the domain model for the Relay request runner:
//! environments, request templates, responses, collections and the
//! records produced by executing them.
//! All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod collection;
pub mod duration_millis;
pub mod environment;
pub mod error;
pub mod execution;
pub mod request;
pub mod response;

pub use auth::{ApiKeyLocation, Auth};
pub use collection::{Collection, CollectionItem};
pub use environment::{Environment, SharedEnvironment};
pub use error::{DomainError, DomainResult};
pub use execution::{ExecutionOutcome, ExecutionResult, RequestExecution, Statistics};
pub use request::{BodyKind, CookieSettings, Headers, RequestBody, RequestSpec, TimeoutSettings};
pub use response::{ResponseHeaders, ResponseSpec};
