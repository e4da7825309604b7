//! Input format checks shared by all flows.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::types::MIN_PASSWORD_LEN;
use crate::error::AuthServiceError;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]{3,20}$").unwrap());

static OTP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{6}$").unwrap());

/// Normalize an email for lookup and store keys.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_email(email: &str) -> Result<(), AuthServiceError> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(AuthServiceError::Validation(
            "Invalid email format".to_owned(),
        ))
    }
}

pub fn validate_username(username: &str) -> Result<(), AuthServiceError> {
    if USERNAME_RE.is_match(username) {
        Ok(())
    } else {
        Err(AuthServiceError::Validation(
            "Username must be 3-20 characters: letters, digits, or underscore".to_owned(),
        ))
    }
}

pub fn validate_password(password: &str) -> Result<(), AuthServiceError> {
    if password.len() >= MIN_PASSWORD_LEN {
        Ok(())
    } else {
        Err(AuthServiceError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )))
    }
}

pub fn validate_otp(otp: &str) -> Result<(), AuthServiceError> {
    if OTP_RE.is_match(otp) {
        Ok(())
    } else {
        Err(AuthServiceError::Validation(
            "Verification code must be 6 digits".to_owned(),
        ))
    }
}
