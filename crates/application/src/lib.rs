//! Relay Application - Use cases and ports
//!
//! This crate contains the variable resolver, the collection execution
//! engine and the port traits implemented by the infrastructure layer.

pub mod error;
pub mod ports;
pub mod use_cases;
pub mod variable_resolver;

#[cfg(test)]
mod test_support;

pub use error::{ApplicationError, ApplicationResult};
pub use variable_resolver::{ResolvedRequest, VariableResolver};
