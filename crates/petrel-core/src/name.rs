//! The package-name grammar.
//!
//! A valid name is a non-empty ASCII string of letters, digits, `-` and
//! `_`. The same grammar applies to package names and to each
//! colon-separated segment of a dependency key.

use crate::error::{Result, ValidationError};

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Check a single name against the grammar.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || !name.chars().all(is_name_char) {
        return Err(ValidationError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Check a dependency key, where `:` separates sub-package segments.
///
/// Every segment must individually satisfy the name grammar, so keys such
/// as `foo:bar` are fine while `foo::bar` and `foo:` are not.
pub fn validate_dependency_name(key: &str) -> Result<()> {
    for segment in key.split(':') {
        validate_name(segment).map_err(|_| ValidationError::InvalidName(key.to_string()))?;
    }
    Ok(())
}
