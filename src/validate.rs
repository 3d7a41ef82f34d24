//! Client-side form validation.
//!
//! Drafts and patches are validated before any store call is made.

use std::fmt::Display;

/// Error type for rejected input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Missing { field: &'static str },
    #[error("{field} must be between {min} and {max} (got {actual})")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        actual: i64,
    },
    #[error("{field} is malformed: {reason}")]
    Malformed { field: &'static str, reason: String },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Missing { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::Malformed { field, .. } => field,
        }
    }

    pub fn malformed(field: &'static str, reason: impl Display) -> Self {
        ValidationError::Malformed {
            field,
            reason: reason.to_string(),
        }
    }
}

/// Input that can be checked before it is sent to the store.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Patches often carry nothing to check.
impl Validate for crate::Row {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// Fails unless `value` has non-whitespace content.
pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Missing { field })
    } else {
        Ok(())
    }
}

/// Like [`require`], but an absent value passes.
pub fn require_if_present(field: &'static str, value: Option<&str>) -> Result<(), ValidationError> {
    value.map_or(Ok(()), |value| require(field, value))
}

/// Fails unless `min <= value <= max`.
pub fn within(
    field: &'static str,
    value: impl Into<i64>,
    min: i64,
    max: i64,
) -> Result<(), ValidationError> {
    let actual = value.into();
    if (min..=max).contains(&actual) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            min,
            max,
            actual,
        })
    }
}

/// Rough shape check: `local@domain.tld`, no whitespace.
pub fn email(field: &'static str, value: &str) -> Result<(), ValidationError> {
    require(field, value)?;
    let value = value.trim();

    let Some((local, domain)) = value.split_once('@') else {
        return Err(ValidationError::malformed(field, "missing @"));
    };
    if local.is_empty() || value.chars().any(char::is_whitespace) {
        return Err(ValidationError::malformed(field, "not an email address"));
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() && !domain.contains('@') => Ok(()),
        _ => Err(ValidationError::malformed(field, "domain needs a dot")),
    }
}

/// An absolute `http(s)://host...` link.
pub fn url(field: &'static str, value: &str) -> Result<(), ValidationError> {
    require(field, value)?;
    let value = value.trim();

    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"))
        .ok_or_else(|| ValidationError::malformed(field, "must start with http:// or https://"))?;
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() || value.chars().any(char::is_whitespace) {
        return Err(ValidationError::malformed(field, "not a link"));
    }
    Ok(())
}
