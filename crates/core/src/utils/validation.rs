//! Input validation helpers shared by the domain models.

use crate::errors::{Result, ValidationError};

/// Returns the trimmed value, or `MissingField` when it is absent or blank.
pub fn required_text<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationError::MissingField(field.to_string()).into()),
    }
}

/// Rejects text longer than `max` characters.
pub fn check_max_len(value: &str, field: &str, max: usize) -> Result<()> {
    if value.chars().count() > max {
        return Err(ValidationError::InvalidInput(format!(
            "{} must be at most {} characters",
            field, max
        ))
        .into());
    }
    Ok(())
}

/// Trims an optional free-text field; blank becomes `None`.
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
