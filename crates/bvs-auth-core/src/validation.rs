//! Input validation
//!
//! Runs before any store access. Failures are [`AuthError::Validation`].

use crate::password::MAX_PASSWORD_BYTES;
use crate::AuthError;

/// Minimum password length, in characters
pub const MIN_PASSWORD_LEN: usize = 8;

const MAX_EMAIL_LEN: usize = 254;

fn invalid(msg: impl Into<String>) -> AuthError {
    AuthError::Validation(msg.into())
}

/// `local@domain.tld`, no whitespace
pub fn validate_email(email: &str) -> Result<(), AuthError> {
    if email.is_empty() || email.len() > MAX_EMAIL_LEN || email.chars().any(char::is_whitespace) {
        return Err(invalid("Invalid email"));
    }

    let (local, domain) = email.split_once('@').ok_or_else(|| invalid("Invalid email"))?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid("Invalid email"));
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return Err(invalid("Invalid email"));
    }

    Ok(())
}

/// At least [`MIN_PASSWORD_LEN`] characters and at most
/// [`MAX_PASSWORD_BYTES`] bytes
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(invalid(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(invalid(format!(
            "Password must be at most {MAX_PASSWORD_BYTES} bytes"
        )));
    }
    Ok(())
}

/// Names, when given, must not be empty
pub fn validate_name(field: &str, value: &str) -> Result<(), AuthError> {
    if value.is_empty() {
        return Err(invalid(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Absolute http(s) URL with a host
pub fn validate_avatar_url(url: &str) -> Result<(), AuthError> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| invalid("Invalid avatar URL"))?;

    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() || url.chars().any(char::is_whitespace) {
        return Err(invalid("Invalid avatar URL"));
    }
    Ok(())
}

/// Shared checks for optional profile fields
pub fn validate_profile(
    first_name: Option<&str>,
    last_name: Option<&str>,
    avatar_url: Option<&str>,
) -> Result<(), AuthError> {
    if let Some(first_name) = first_name {
        validate_name("firstName", first_name)?;
    }
    if let Some(last_name) = last_name {
        validate_name("lastName", last_name)?;
    }
    if let Some(avatar_url) = avatar_url {
        validate_avatar_url(avatar_url)?;
    }
    Ok(())
}
