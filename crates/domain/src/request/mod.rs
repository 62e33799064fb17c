//! HTTP Request domain types

mod body;
mod spec;

pub use body::{BodyKind, RequestBody};
pub use spec::{CookieSettings, Headers, RequestSpec, TimeoutSettings};
