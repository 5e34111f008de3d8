//! Field-level rules shared by user creation and the patch handlers.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::contract::model::Patch;
use crate::domain::error::DomainError;

/// No leading/trailing whitespace, and no tab, newline, carriage return or
/// backspace anywhere. Whitespace classes are ASCII-only, so a leading
/// no-break space is kept as content.
static STRICT_STRING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^ \t\n\x0B\x0C\r](?:[^\t\n\r\x08]*[^ \t\n\x0B\x0C\r])?$")
        .expect("valid strict string regex")
});

/// ASCII word characters only.
static PATCH_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]{1,100}$").expect("valid patch path regex"));

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s.]+(?:\.[^@\s.]+)+$").expect("valid email regex")
});

/// Strict string rule: 1..=`max_len` characters, matching [`STRICT_STRING`].
pub fn validate_strict_string(field: &str, value: &str, max_len: usize) -> Result<(), DomainError> {
    let len = value.chars().count();
    if len == 0 {
        return Err(DomainError::validation(field, "must not be empty"));
    }
    if len > max_len {
        return Err(DomainError::validation(
            field,
            format!("too long: {len} characters (max: {max_len})"),
        ));
    }
    if !STRICT_STRING.is_match(value) {
        return Err(DomainError::validation(
            field,
            "must not start or end with whitespace or contain control characters",
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), DomainError> {
    if email.trim().is_empty() {
        return Err(DomainError::validation("email", "must not be blank"));
    }
    if !EMAIL.is_match(email) {
        return Err(DomainError::validation(
            "email",
            format!("'{email}' is not a valid address"),
        ));
    }
    Ok(())
}

pub fn validate_birthdate(birthdate: NaiveDate, today: NaiveDate) -> Result<(), DomainError> {
    if birthdate > today {
        return Err(DomainError::validation(
            "birthdate",
            format!("{birthdate} is in the future"),
        ));
    }
    Ok(())
}

/// Paths are plain field tokens of 1-100 ASCII word characters.
pub fn validate_patch(patch: &Patch) -> Result<(), DomainError> {
    if !PATCH_PATH.is_match(&patch.path) {
        return Err(DomainError::invalid_patch(format!(
            "path '{}' must be 1-100 word characters",
            patch.path
        )));
    }
    Ok(())
}
