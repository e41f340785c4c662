//! Request shape validation, run before any service logic. Failures carry
//! the offending field so clients can surface per-field messages.

use serde::Serialize;

/// Raw one-time and refresh tokens are 64 hex chars; anything shorter than
/// this is rejected before touching a store.
pub const MIN_TOKEN_LEN: usize = 20;

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self { field, reason: reason.into() }
    }
}

/// Pure shape/format checks on an incoming request body.
pub trait ValidateRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>>;
}

/// Returns the failure reason, or `None` when the email looks plausible.
pub fn check_email(email: &str) -> Option<String> {
    match models::user::validate_email(email) {
        Ok(()) => None,
        Err(_) => Some("must be a valid email address".to_string()),
    }
}

/// Minimum length plus lowercase, uppercase, digit, and symbol classes.
pub fn check_password_complexity(password: &str) -> Option<String> {
    if password.len() < MIN_PASSWORD_LEN {
        return Some(format!("must be at least {} characters", MIN_PASSWORD_LEN));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Some("must contain a lowercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Some("must contain an uppercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Some("must contain a digit".to_string());
    }
    if !password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        return Some("must contain a symbol".to_string());
    }
    None
}

pub fn check_token(token: &str) -> Option<String> {
    if token.trim().len() < MIN_TOKEN_LEN {
        Some(format!("must be at least {} characters", MIN_TOKEN_LEN))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_complexity_each_class_enforced() {
        assert!(check_password_complexity("Sh0rt!").is_some());
        assert!(check_password_complexity("alllower1!x").is_some());
        assert!(check_password_complexity("ALLUPPER1!X").is_some());
        assert!(check_password_complexity("NoDigits!!aa").is_some());
        assert!(check_password_complexity("NoSymbol12aa").is_some());
        assert!(check_password_complexity("G00d-enough").is_none());
    }

    #[test]
    fn token_shape_floor() {
        assert!(check_token("short").is_some());
        assert!(check_token(&"a".repeat(64)).is_none());
    }

    #[test]
    fn email_shape_delegates() {
        assert!(check_email("nope").is_some());
        assert!(check_email("a@b.co").is_none());
    }
}
