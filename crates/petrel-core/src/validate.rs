//! Validation of fetched package descriptions.
//!
//! Every `package.json` read from a repository passes through
//! [`validate_package_info`] before it may be admitted to the catalog.

use semver::Version;
use serde_json::Value;

use crate::error::{Result, ValidationError};
use crate::name::validate_dependency_name;

fn require_nonempty_string(info: &Value, field: &'static str) -> Result<()> {
    match info.get(field).and_then(|v| v.as_str()) {
        Some(s) if !s.is_empty() => Ok(()),
        _ => Err(ValidationError::MissingRequiredField(field)),
    }
}

/// Validate a package description and normalize its `name` field.
///
/// `expected_name` is the stored package name when admitting to an
/// existing package; `None` when the description is being probed to create
/// a package, in which case the (lowercased) name is taken from the
/// document. `release` is the tag version when the description was read
/// at a release ref; a legacy `version` field, if present, must match it.
///
/// Returns the normalized package name.
pub fn validate_package_info(
    info: &mut Value,
    expected_name: Option<&str>,
    release: Option<&Version>,
) -> Result<String> {
    if !info.is_object() {
        return Err(ValidationError::MalformedDescription);
    }

    require_nonempty_string(info, "description")?;
    require_nonempty_string(info, "license")?;

    let name = info
        .get("name")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .ok_or(ValidationError::MissingRequiredField("name"))?
        .to_lowercase();
    info["name"] = Value::String(name.clone());

    if let Some(expected) = expected_name {
        if name != expected {
            return Err(ValidationError::NameMismatch {
                expected: expected.to_string(),
                found: name,
            });
        }
    }

    if let Some(deps) = info.get("dependencies") {
        if let Some(deps) = deps.as_object() {
            for key in deps.keys() {
                validate_dependency_name(key)?;
            }
        }
    }

    if let Some(release) = release {
        if let Some(field) = info.get("version").and_then(|v| v.as_str()) {
            // compared verbatim against the v-stripped tag
            if field != release.to_string() {
                return Err(ValidationError::VersionMismatch {
                    expected: release.to_string(),
                    found: field.to_string(),
                });
            }
        }
    }

    Ok(name)
}
