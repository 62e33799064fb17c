//! Variable resolution engine
//!
//! Resolves `{{variable}}` references against the active environment.

use std::collections::HashMap;

use relay_domain::{RequestBody, RequestSpec, SharedEnvironment};
use tracing::debug;

use super::parser::parse_variables;
use super::resolved::ResolvedRequest;
use crate::error::{ApplicationError, ApplicationResult};

/// The variable resolution engine.
///
/// When a local environment is bound it is the only one consulted; the global
/// environment is used otherwise. Each lookup takes a read lock on the active
/// environment.
#[derive(Debug, Clone)]
pub struct VariableResolver {
    global: SharedEnvironment,
    local: Option<SharedEnvironment>,
}

impl VariableResolver {
    /// Creates a resolver with only a global environment.
    #[must_use]
    pub const fn new(global: SharedEnvironment) -> Self {
        Self {
            global,
            local: None,
        }
    }

    /// Binds a local environment.
    #[must_use]
    pub fn with_local(mut self, local: SharedEnvironment) -> Self {
        self.local = Some(local);
        self
    }

    /// Binds or unbinds the local environment.
    pub fn set_local(&mut self, local: Option<SharedEnvironment>) {
        self.local = local;
    }

    /// Replaces the global environment.
    pub fn set_global(&mut self, global: SharedEnvironment) {
        self.global = global;
    }

    /// Returns the local environment, if bound.
    #[must_use]
    pub const fn local(&self) -> Option<&SharedEnvironment> {
        self.local.as_ref()
    }

    /// Returns the global environment.
    #[must_use]
    pub const fn global(&self) -> &SharedEnvironment {
        &self.global
    }

    /// Returns the name of the environment lookups go to.
    #[must_use]
    pub fn active_environment_name(&self) -> String {
        self.active().read().name.clone()
    }

    fn active(&self) -> &SharedEnvironment {
        self.local.as_ref().unwrap_or(&self.global)
    }

    fn lookup(&self, name: &str) -> ApplicationResult<String> {
        let environment = self.active().read();
        environment.get(name).map(str::to_owned).ok_or_else(|| {
            debug!(variable = name, environment = %environment.name, "variable not found");
            ApplicationError::VariableNotFound(name.to_string())
        })
    }

    /// Substitutes every placeholder in `template`.
    ///
    /// Substituted values are not scanned again.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::VariableNotFound` for the first placeholder
    /// whose name is unbound. No partial result is produced.
    pub fn resolve(&self, template: &str) -> ApplicationResult<String> {
        let references = parse_variables(template);
        if references.is_empty() {
            return Ok(template.to_string());
        }

        let mut result = String::with_capacity(template.len());
        let mut last_end = 0;

        for var_ref in &references {
            result.push_str(&template[last_end..var_ref.span.start]);
            result.push_str(&self.lookup(&var_ref.name)?);
            last_end = var_ref.span.end;
        }

        result.push_str(&template[last_end..]);
        Ok(result)
    }

    /// Checks that every placeholder in `template` is bound, without substituting.
    ///
    /// # Errors
    ///
    /// Fails with the same error `resolve` would return.
    pub fn validate(&self, template: &str) -> ApplicationResult<()> {
        parse_variables(template)
            .iter()
            .try_for_each(|var_ref| self.lookup(&var_ref.name).map(drop))
    }

    /// Resolves both keys and values of a map.
    ///
    /// # Errors
    ///
    /// Returns the first resolution error; nothing is returned on failure.
    pub fn resolve_map(
        &self,
        map: &HashMap<String, String>,
    ) -> ApplicationResult<HashMap<String, String>> {
        map.iter()
            .map(|(key, value)| Ok((self.resolve(key)?, self.resolve(value)?)))
            .collect()
    }

    /// Validates both keys and values of a map.
    ///
    /// # Errors
    ///
    /// Returns the first validation error.
    pub fn validate_map(&self, map: &HashMap<String, String>) -> ApplicationResult<()> {
        map.iter().try_for_each(|(key, value)| {
            self.validate(key)?;
            self.validate(value)
        })
    }

    /// Resolves URL, headers, textual body content and auth credentials.
    ///
    /// The template is not modified. Binary bodies and empty credentials are
    /// copied unchanged.
    ///
    /// # Errors
    ///
    /// Returns the first resolution error in any field.
    pub fn resolve_request(&self, request: &RequestSpec) -> ApplicationResult<ResolvedRequest> {
        let mut resolved = request.clone();
        resolved.url = self.resolve(&request.url)?;
        resolved.headers = self.resolve_map(&request.headers)?;

        if let Some(body) = &request.body
            && let Some(text) = resolvable_text(body)
        {
            let content = self.resolve(text)?;
            resolved.body = Some(RequestBody {
                content: content.into_bytes(),
                ..body.clone()
            });
        }

        if let Some(auth) = &request.auth {
            resolved.auth = Some(auth.try_map_credentials(|value| self.resolve(value))?);
        }

        Ok(ResolvedRequest::new(resolved))
    }

    /// Validates URL, headers, textual body content and non-empty credentials.
    ///
    /// # Errors
    ///
    /// Returns the first validation error in any field.
    pub fn validate_request(&self, request: &RequestSpec) -> ApplicationResult<()> {
        self.validate(&request.url)?;
        self.validate_map(&request.headers)?;

        if let Some(text) = request.body.as_ref().and_then(resolvable_text) {
            self.validate(text)?;
        }

        if let Some(auth) = &request.auth {
            for credential in auth.credentials().filter(|c| !c.is_empty()) {
                self.validate(credential)?;
            }
        }
        Ok(())
    }
}

fn resolvable_text(body: &RequestBody) -> Option<&str> {
    if body.is_empty() || !body.is_textual() {
        return None;
    }
    body.content_str()
}
