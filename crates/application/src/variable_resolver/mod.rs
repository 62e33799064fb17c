//! Variable resolution module
//!
//! Substitutes `{{variable}}` placeholders from the global and local
//! environments.
//!
//! # Usage
//!
//! ```
//! use relay_application::variable_resolver::VariableResolver;
//! use relay_domain::Environment;
//!
//! let global = Environment::with_variables("global", [("host", "localhost")]).into_shared();
//! let resolver = VariableResolver::new(global);
//!
//! assert_eq!(resolver.resolve("http://{{host}}/api").unwrap(), "http://localhost/api");
//! ```

pub mod engine;
pub mod parser;
mod resolved;

pub use engine::VariableResolver;
pub use parser::{VariableReference, extract_variable_names, has_variables, parse_variables};
pub use resolved::ResolvedRequest;
