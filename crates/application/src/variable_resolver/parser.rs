//! Placeholder parser for `{{variable}}` syntax
//!
//! Parses strings to extract variable references with their positions.

use std::ops::Range;

/// A placeholder found in a template string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableReference {
    /// The variable name, trimmed of surrounding whitespace.
    pub name: String,

    /// Byte range of the whole `{{ ... }}` token in the original string.
    pub span: Range<usize>,
}

impl VariableReference {
    /// Creates a new variable reference.
    #[must_use]
    pub fn new(name: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// Parses a string and extracts all placeholders, in order of appearance.
///
/// A placeholder is `{{`, one or more characters other than `}`, then `}}`;
/// the name is trimmed of surrounding whitespace and whitespace-only names are
/// skipped. A `{{` that does not close this way is literal text and scanning
/// resumes one byte later. There is no nesting and no escaping.
///
/// # Examples
///
/// ```
/// use relay_application::variable_resolver::parser::parse_variables;
///
/// let refs = parse_variables("{{base_url}}/users/{{ id }}");
/// assert_eq!(refs.len(), 2);
/// assert_eq!(refs[0].name, "base_url");
/// assert_eq!(refs[1].name, "id");
/// ```
#[must_use]
pub fn parse_variables(input: &str) -> Vec<VariableReference> {
    let mut references = Vec::new();
    let mut pos = 0;

    while let Some(offset) = input[pos..].find("{{") {
        let start = pos + offset;
        let name_start = start + 2;
        let Some(close) = input[name_start..].find('}') else {
            break;
        };
        let name_end = name_start + close;

        if name_end > name_start && input[name_end + 1..].starts_with('}') {
            let trimmed = input[name_start..name_end].trim();
            if !trimmed.is_empty() {
                references.push(VariableReference::new(trimmed, start..name_end + 2));
            }
            pos = name_end + 2;
        } else {
            pos = start + 1;
        }
    }

    references
}

/// Returns true if the input appears to contain a placeholder.
#[must_use]
pub fn has_variables(input: &str) -> bool {
    input.contains("{{") && input.contains("}}")
}

/// Extracts just the variable names, in order, duplicates included.
#[must_use]
pub fn extract_variable_names(input: &str) -> Vec<String> {
    parse_variables(input)
        .into_iter()
        .map(|r| r.name)
        .collect()
}
