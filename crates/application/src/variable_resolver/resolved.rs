//! Fully resolved request wrapper

use std::ops::Deref;

use relay_domain::RequestSpec;

/// A request whose URL, headers, textual body and auth credentials have had
/// every placeholder substituted.
///
/// Only [`VariableResolver::resolve_request`](super::VariableResolver::resolve_request)
/// constructs this type, so holding one proves resolution succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRequest(RequestSpec);

impl ResolvedRequest {
    pub(crate) const fn new(spec: RequestSpec) -> Self {
        Self(spec)
    }

    /// Returns the resolved request.
    #[must_use]
    pub const fn spec(&self) -> &RequestSpec {
        &self.0
    }

    /// Consumes the wrapper and returns the resolved request.
    #[must_use]
    pub fn into_spec(self) -> RequestSpec {
        self.0
    }
}

impl Deref for ResolvedRequest {
    type Target = RequestSpec;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
