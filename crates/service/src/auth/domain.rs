use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{
    check_email, check_password_complexity, check_token, FieldError, ValidateRequest,
};

pub use models::user::Role;

/// Domain account (business view). The hash stays inside the service layer;
/// it is never serialized outward.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub email_verified_at: Option<DateTime<Utc>>,
}

/// Registration input
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
}

/// Login input
#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
    #[serde(skip)]
    pub client_addr: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshInput {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyEmailInput {
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResendVerificationInput {
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestPasswordResetInput {
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResetPasswordInput {
    pub token: String,
    pub new_password: String,
}

/// Login/refresh result: the account plus both halves of the token pair.
/// `refresh_token` is the raw value, surfaced here exactly once.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: Account,
    pub access_token: Option<String>,
    pub refresh_token: String,
    pub refresh_expires_at: DateTime<Utc>,
}

impl ValidateRequest for RegisterInput {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errs = Vec::new();
        if let Some(reason) = check_email(&self.email) {
            errs.push(FieldError::new("email", reason));
        }
        if let Some(reason) = check_password_complexity(&self.password) {
            errs.push(FieldError::new("password", reason));
        }
        if errs.is_empty() { Ok(()) } else { Err(errs) }
    }
}

impl ValidateRequest for LoginInput {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errs = Vec::new();
        if let Some(reason) = check_email(&self.email) {
            errs.push(FieldError::new("email", reason));
        }
        if self.password.is_empty() {
            errs.push(FieldError::new("password", "must not be empty"));
        }
        if errs.is_empty() { Ok(()) } else { Err(errs) }
    }
}

impl ValidateRequest for RefreshInput {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        match check_token(&self.refresh_token) {
            Some(reason) => Err(vec![FieldError::new("refresh_token", reason)]),
            None => Ok(()),
        }
    }
}

impl ValidateRequest for VerifyEmailInput {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        match check_token(&self.token) {
            Some(reason) => Err(vec![FieldError::new("token", reason)]),
            None => Ok(()),
        }
    }
}

impl ValidateRequest for ResendVerificationInput {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        match check_email(&self.email) {
            Some(reason) => Err(vec![FieldError::new("email", reason)]),
            None => Ok(()),
        }
    }
}

impl ValidateRequest for RequestPasswordResetInput {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        match check_email(&self.email) {
            Some(reason) => Err(vec![FieldError::new("email", reason)]),
            None => Ok(()),
        }
    }
}

impl ValidateRequest for ResetPasswordInput {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errs = Vec::new();
        if let Some(reason) = check_token(&self.token) {
            errs.push(FieldError::new("token", reason));
        }
        if let Some(reason) = check_password_complexity(&self.new_password) {
            errs.push(FieldError::new("new_password", reason));
        }
        if errs.is_empty() { Ok(()) } else { Err(errs) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_input_collects_both_field_errors() {
        let input = RegisterInput { email: "nope".into(), password: "weak".into() };
        let errs = input.validate().unwrap_err();
        let fields: Vec<_> = errs.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["email", "password"]);
    }

    #[test]
    fn register_input_accepts_strong_credentials() {
        let input = RegisterInput { email: "a@b.co".into(), password: "Str0ng-pass".into() };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn reset_input_checks_token_shape() {
        let input = ResetPasswordInput { token: "short".into(), new_password: "Str0ng-pass".into() };
        let errs = input.validate().unwrap_err();
        assert_eq!(errs[0].field, "token");
    }
}
